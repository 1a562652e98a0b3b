use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::components::cookie_consent::open_cookie_settings;

#[derive(Properties, PartialEq)]
struct PolicySectionProps {
    title: AttrValue,
    children: Children,
}

#[function_component(PolicySection)]
fn policy_section(props: &PolicySectionProps) -> Html {
    html! {
        <section>
            <h2>{props.title.clone()}</h2>
            { for props.children.iter() }
        </section>
    }
}

fn bullet_list(items: &[&str]) -> Html {
    html! {
        <ul>
            { for items.iter().map(|item| html! { <li>{*item}</li> }) }
        </ul>
    }
}

#[function_component(BackHome)]
fn back_home() -> Html {
    let navigator = use_navigator();
    let onclick = Callback::from(move |_: MouseEvent| {
        if let Some(navigator) = navigator.as_ref() {
            navigator.push(&Route::Landing);
        }
    });
    html! {
        <button class="back-home" {onclick}>{"Back to Home"}</button>
    }
}

#[function_component(Terms)]
pub fn terms() -> Html {
    use_effect_with_deps(
        move |_| {
            if let Some(window) = web_sys::window() {
                window.scroll_to_with_x_and_y(0.0, 0.0);
            }
            || ()
        },
        (),
    );

    let on_cookie_settings = Callback::from(|e: MouseEvent| {
        e.prevent_default();
        open_cookie_settings();
    });

    html! {
        <div class="legal-page">
            <style>
                {r#"
                    .legal-page {
                        min-height: 100vh;
                        background: #fff;
                        color: #111;
                        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
                    }
                    .legal-page nav {
                        position: fixed;
                        top: 0;
                        width: 100%;
                        z-index: 50;
                        background: rgba(255, 255, 255, 0.8);
                        backdrop-filter: blur(12px);
                        border-bottom: 1px solid #f3f4f6;
                        height: 4rem;
                        display: flex;
                        align-items: center;
                        padding: 0 1.5rem;
                    }
                    .legal-content {
                        max-width: 56rem;
                        margin: 0 auto;
                        padding: 8rem 1.5rem 6rem;
                        color: #4b5563;
                        line-height: 1.7;
                    }
                    .legal-content h1 {
                        font-size: clamp(1.9rem, 4vw, 3rem);
                        font-weight: 500;
                        color: #111;
                        letter-spacing: -0.02em;
                    }
                    .legal-content h2 {
                        font-size: 1.5rem;
                        font-weight: 500;
                        color: #111;
                        margin-top: 2.5rem;
                    }
                    .legal-content h3 {
                        font-size: 1.2rem;
                        font-weight: 500;
                        color: #111;
                    }
                    .legal-content ul {
                        padding-left: 1.5rem;
                    }
                    .legal-content a {
                        color: #111;
                    }
                    .back-home {
                        background: #111;
                        color: #fff;
                        border: none;
                        border-radius: 6px;
                        padding: 0.6rem 1.25rem;
                        cursor: pointer;
                        margin: 2rem 0;
                        transition: transform 0.3s ease;
                    }
                    .back-home:hover {
                        transform: scale(1.05);
                    }
                "#}
            </style>

            <nav>
                <Link<Route> to={Route::Landing}>
                    <img src="/assets/logo.svg" alt="GridGPT Logo" height="28" />
                </Link<Route>>
            </nav>

            <div class="legal-content">
                <BackHome />
                <h1>{"Privacy Policy for gridGPT"}</h1>
                <p>{"Effective Date: January 6, 2026"}</p>
                <p>
                    {"Welcome to gridGPT! Your privacy matters to us. This Privacy Policy explains how we collect, use, disclose, and protect your personal information when you use our services available at "}
                    <a href="https://gridgpt.tech">{"https://gridgpt.tech"}</a>
                    {" (\"Service,\" \"we,\" \"us,\" or \"our\")."}
                </p>
                <p>{"By accessing or using the Service, you agree to this Privacy Policy and consent to the data practices described below."}</p>

                <PolicySection title="1. Information We Collect">
                    <p>{"We collect information that you voluntarily provide to us, as well as information that is automatically collected when you use the Service."}</p>
                    <h3>{"A. Personal Information You Provide"}</h3>
                    <p>{"We may collect personal information when you:"}</p>
                    { bullet_list(&[
                        "Create an account",
                        "Use features of the Service",
                        "Contact support or communicate with us",
                    ]) }
                    <p>{"This may include:"}</p>
                    { bullet_list(&[
                        "Name",
                        "Email address",
                        "Username",
                        "Payment and billing information",
                        "Any other information you choose to provide",
                    ]) }
                    <p>{"We use this information to operate the Service, manage accounts, process payments, communicate with users, and provide customer support."}</p>
                    <h3>{"B. Automatically Collected Information"}</h3>
                    <p>{"When you access or use gridGPT, we may automatically collect:"}</p>
                    { bullet_list(&[
                        "IP address",
                        "Device identifiers, browser type, and operating system",
                        "Usage data such as pages visited, actions taken, and feature interactions",
                        "Log files and diagnostic data",
                    ]) }
                    <p>{"This information is used for analytics, performance optimization, product improvement, and security purposes."}</p>
                </PolicySection>

                <PolicySection title="2. Cookies and Tracking Technologies">
                    <p>{"We use cookies and similar technologies to:"}</p>
                    { bullet_list(&[
                        "Remember user preferences",
                        "Understand how users interact with the Service",
                        "Improve functionality and performance",
                    ]) }
                    <p>
                        {"You can control cookies through your browser settings or our "}
                        <a href="#" onclick={on_cookie_settings}>{"cookie settings"}</a>
                        {". Please note that disabling cookies may limit certain features of the Service."}
                    </p>
                </PolicySection>

                <PolicySection title="3. How We Use Your Information">
                    <p>{"We use collected information to:"}</p>
                    { bullet_list(&[
                        "Provide, maintain, and improve gridGPT",
                        "Create and manage user accounts",
                        "Process subscriptions and payments",
                        "Communicate with users about updates, features, and support",
                        "Monitor and prevent fraud, abuse, or security incidents",
                        "Comply with applicable laws and regulations",
                    ]) }
                </PolicySection>

                <PolicySection title="4. Sharing of Information">
                    <p>{"We do not sell your personal data."}</p>
                    <p>{"We may share information only in the following circumstances:"}</p>
                    <ul>
                        <li><strong>{"Service Providers:"}</strong>{" trusted third parties who assist us with hosting, payments, analytics, or infrastructure"}</li>
                        <li><strong>{"Legal Requirements:"}</strong>{" when required by law, regulation, or legal process"}</li>
                        <li><strong>{"Business Transfers:"}</strong>{" in connection with a merger, acquisition, or sale of assets"}</li>
                    </ul>
                    <p>{"All third parties are required to safeguard your data and use it only for authorized purposes."}</p>
                </PolicySection>

                <PolicySection title="5. Data Retention">
                    <p>{"We retain personal information only for as long as necessary to:"}</p>
                    { bullet_list(&[
                        "Provide the Service",
                        "Fulfill legal and contractual obligations",
                        "Resolve disputes",
                        "Enforce agreements",
                    ]) }
                    <p>{"When data is no longer needed, it is securely deleted or anonymized."}</p>
                </PolicySection>

                <PolicySection title="6. Your Rights">
                    <p>{"Depending on your location, you may have the right to:"}</p>
                    { bullet_list(&[
                        "Access your personal data",
                        "Correct or update inaccurate information",
                        "Request deletion of your personal data",
                        "Object to or restrict certain data processing",
                        "Withdraw consent where applicable",
                    ]) }
                    <p>{"To exercise these rights, please contact us using the details below."}</p>
                </PolicySection>

                <PolicySection title="7. Data Security">
                    <p>{"We implement reasonable administrative, technical, and organizational safeguards to protect your personal information. However, no system is completely secure, and we cannot guarantee absolute security."}</p>
                </PolicySection>

                <PolicySection title="8. International Data Transfers">
                    <p>{"Your information may be transferred to and processed in countries outside of your country of residence. By using the Service, you consent to such transfers in accordance with this Privacy Policy."}</p>
                </PolicySection>

                <PolicySection title="9. Children's Privacy">
                    <p>{"gridGPT is not intended for individuals under the age of 13 (or the minimum legal age in your jurisdiction). We do not knowingly collect personal information from children."}</p>
                </PolicySection>

                <PolicySection title="10. Changes to This Privacy Policy">
                    <p>{"We may update this Privacy Policy from time to time. Any changes will be posted on gridgpt.tech with an updated Effective Date. Continued use of the Service after changes means you accept the revised Policy."}</p>
                </PolicySection>

                <PolicySection title="11. Contact Us">
                    <p>{"If you have any questions about this Privacy Policy or our data practices, please contact us:"}</p>
                    <ul>
                        <li>{"Email: "}<a href="mailto:support@gridgpt.com">{"support@gridgpt.com"}</a></li>
                        <li>{"Website: "}<a href="https://gridgpt.tech">{"https://gridgpt.tech"}</a></li>
                    </ul>
                </PolicySection>

                <BackHome />
            </div>
        </div>
    }
}
