use yew::prelude::*;
use yew_router::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use gloo_timers::callback::Timeout;
use serde_json::json;

use crate::Route;
use crate::components::accordion::AccordionItem;
use crate::components::cookie_consent::open_cookie_settings;
use crate::components::role_rotator::RoleRotator;
use crate::components::source_grid::SourceGrid;
use crate::components::tilt::Tilt;
use crate::consent::ConsentHandle;
use crate::waitlist::{self, WaitlistError};

// Fraction of the viewport an element's top must pass before it reveals.
const REVEAL_THRESHOLD: f64 = 0.8;

fn reveal_visible_sections() {
    let Some(window) = web_sys::window() else { return };
    let Some(document) = window.document() else { return };
    let viewport = window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0);

    let pending = document.get_elements_by_class_name("reveal");
    // The collection is live; collect first since we mutate class lists.
    let elements: Vec<web_sys::Element> = (0..pending.length())
        .filter_map(|i| pending.item(i))
        .collect();
    for element in elements {
        if element.get_bounding_client_rect().top() < viewport * REVEAL_THRESHOLD {
            let _ = element.class_list().add_1("visible");
        }
    }
}

// How long a submission result stays under the form.
const STATUS_MS: u32 = 6_000;

/// Delayed status reset. Arming it again drops, and so cancels, the
/// previous timer.
#[derive(Default)]
struct StatusTimer(Option<Timeout>);

impl StatusTimer {
    fn arm(&mut self, millis: u32, on_fire: impl FnOnce() + 'static) {
        self.0 = Some(Timeout::new(millis, on_fire));
    }
}

#[derive(Properties, PartialEq)]
pub struct WaitlistFormProps {
    pub source: AttrValue,
    #[prop_or_default]
    pub dark: bool,
}

#[function_component(WaitlistForm)]
pub fn waitlist_form(props: &WaitlistFormProps) -> Html {
    let consent = use_context::<ConsentHandle>();
    let input_ref = use_node_ref();
    let status = use_state(|| None::<Result<String, String>>);
    let submitting = use_state(|| false);
    let clear_timer = use_mut_ref(StatusTimer::default);

    let onsubmit = {
        let clear_timer = clear_timer.clone();
        let input_ref = input_ref.clone();
        let status = status.clone();
        let submitting = submitting.clone();
        let source = props.source.to_string();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting {
                return;
            }
            let Some(input) = input_ref.cast::<HtmlInputElement>() else { return };
            let email = input.value();

            let status = status.clone();
            let submitting = submitting.clone();
            let source = source.clone();
            let consent = consent.clone();
            let clear_timer = clear_timer.clone();
            submitting.set(true);
            spawn_local(async move {
                match waitlist::submit(&email, &source).await {
                    Ok(_) => {
                        input.set_value("");
                        status.set(Some(Ok("You're on the list. We'll be in touch soon.".to_string())));
                        if let Some(consent) = consent {
                            consent.pixel().track_event("Lead", Some(json!({ "source": source })));
                            consent
                                .tag_manager()
                                .push_to_data_layer(json!({ "event": "waitlist_signup", "source": source }));
                        }
                    }
                    Err(WaitlistError::Validation(msg)) => status.set(Some(Err(msg))),
                    Err(e @ WaitlistError::Network(_)) => {
                        status.set(Some(Err(format!("Something went wrong ({}). Please try again.", e))))
                    }
                }
                submitting.set(false);

                let status = status.clone();
                clear_timer
                    .borrow_mut()
                    .arm(STATUS_MS, move || status.set(None));
            });
        })
    };

    html! {
        <form class={classes!("waitlist-form", props.dark.then(|| "dark"))} {onsubmit}>
            <input
                ref={input_ref}
                type="email"
                placeholder="Enter your email"
                aria-label="Email address"
            />
            <button type="submit" disabled={*submitting}>
                { if *submitting { "Joining..." } else { "Join the waitlist" } }
            </button>
            {
                match &*status {
                    Some(Ok(msg)) => html! { <p class="waitlist-status ok">{msg}</p> },
                    Some(Err(msg)) => html! { <p class="waitlist-status error">{msg}</p> },
                    None => html! {},
                }
            }
        </form>
    }
}

fn scroll_to_waitlist() {
    if let Some(target) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("waitlist"))
    {
        target.scroll_into_view();
    }
}

const PIPELINE: [(&str, &str, &str); 4] = [
    ("01", "Define", "Set precise targeting criteria for your ideal prospect."),
    ("02", "Scan", "Engine pulls prospects from LinkedIn & business databases."),
    ("03", "Verify", "Filters out junk to ensure fresh, valid contact data."),
    ("04", "Enrich", "Adds personal context for tailored outreach messages."),
];

const FAQS: [(&str, &str); 4] = [
    ("How do you ensure lead quality?", "We use a multi-stage verification process that checks email deliverability, social presence, and recent company activity signals."),
    ("How do I set up my ICP?", "During onboarding, we'll ask you about your ideal customer size, industry, and role. You can also upload a list of current customers for lookalike modeling."),
    ("Does the system learn from feedback?", "Yes. Every time you reject or accept a lead, our algorithm adjusts your profile to improve future recommendations."),
    ("When will I get access?", "We are rolling out invites weekly to ensure stability. Join the waitlist to be notified immediately when a spot opens."),
];

fn vimeo(id: &str, title: &'static str, background: bool) -> Html {
    let src = format!(
        "https://player.vimeo.com/video/{}?badge=0&autopause=0&player_id=0&app_id=58479&autoplay=1&loop=1&muted=1{}",
        id,
        if background { "&background=1" } else { "" }
    );
    html! {
        <div class="video-frame">
            <iframe
                {src}
                frameborder="0"
                allow="autoplay; fullscreen; picture-in-picture; clipboard-write; encrypted-media; web-share"
                referrerpolicy="strict-origin-when-cross-origin"
                {title}
            ></iframe>
        </div>
    }
}

#[function_component(Landing)]
pub fn landing() -> Html {
    // Scroll to top only on initial mount
    {
        use_effect_with_deps(
            move |_| {
                if let Some(window) = web_sys::window() {
                    window.scroll_to_with_x_and_y(0.0, 0.0);
                }
                || ()
            },
            (),
        );
    }

    // Scroll-triggered reveal of sections
    {
        use_effect_with_deps(
            move |_| {
                let window = web_sys::window();
                let scroll_callback = Closure::wrap(Box::new(reveal_visible_sections) as Box<dyn FnMut()>);

                if let Some(window) = window.as_ref() {
                    let _ = window.add_event_listener_with_callback(
                        "scroll",
                        scroll_callback.as_ref().unchecked_ref(),
                    );
                }
                // Initial check for whatever is already on screen
                reveal_visible_sections();

                move || {
                    if let Some(window) = window {
                        let _ = window.remove_event_listener_with_callback(
                            "scroll",
                            scroll_callback.as_ref().unchecked_ref(),
                        );
                    }
                }
            },
            (),
        );
    }

    let on_join_click = Callback::from(|e: MouseEvent| {
        e.prevent_default();
        scroll_to_waitlist();
    });

    let on_cookie_settings = Callback::from(|e: MouseEvent| {
        e.prevent_default();
        open_cookie_settings();
    });

    html! {
        <div class="landing-page">
            <style>
                {r#"
                    .landing-page {
                        min-height: 100vh;
                        background: #fff;
                        color: #111;
                        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
                    }
                    .landing-nav {
                        position: fixed;
                        top: 0;
                        width: 100%;
                        z-index: 50;
                        background: rgba(255, 255, 255, 0.8);
                        backdrop-filter: blur(12px);
                        border-bottom: 1px solid #f3f4f6;
                    }
                    .landing-nav-inner, .section-inner {
                        max-width: 72rem;
                        margin: 0 auto;
                        padding: 0 1.5rem;
                    }
                    .landing-nav-inner {
                        height: 4rem;
                        display: flex;
                        align-items: center;
                        justify-content: space-between;
                    }
                    .btn-dark {
                        background: #111;
                        color: #fff;
                        border: none;
                        border-radius: 6px;
                        padding: 0.6rem 1.25rem;
                        cursor: pointer;
                        font-size: 0.9rem;
                    }
                    .hero {
                        position: relative;
                        padding: 8rem 1.5rem 5rem;
                        overflow: hidden;
                    }
                    .hero-bg {
                        position: absolute;
                        inset: 0;
                        width: 100%;
                        height: 100%;
                        object-fit: cover;
                        opacity: 0.6;
                    }
                    .hero-grid {
                        position: relative;
                        z-index: 1;
                        max-width: 72rem;
                        margin: 0 auto;
                        display: grid;
                        grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
                        gap: 3rem;
                        align-items: center;
                    }
                    .hero h1 {
                        font-size: clamp(2rem, 5vw, 3.75rem);
                        font-weight: 500;
                        line-height: 1.1;
                        letter-spacing: -0.02em;
                    }
                    .hero p {
                        font-size: 1.2rem;
                        color: #6b7280;
                        font-weight: 300;
                        max-width: 28rem;
                    }
                    .role-rotator {
                        display: inline-grid;
                    }
                    .role-item {
                        grid-area: 1 / 1;
                        opacity: 0;
                        transform: translateY(20px);
                        transition: opacity 0.5s ease, transform 0.5s ease;
                    }
                    .role-item.active {
                        opacity: 1;
                        transform: translateY(0);
                    }
                    .hero-preview {
                        width: 100%;
                        border-radius: 12px;
                        transform: rotateY(-12deg) rotateX(2deg);
                        box-shadow: 0 20px 50px rgba(255, 255, 255, 0.3);
                    }
                    section.block {
                        padding: 5rem 0;
                        border-top: 1px solid #f3f4f6;
                    }
                    section.dark {
                        background: #0a0a0a;
                        color: #fff;
                    }
                    section h2 {
                        font-size: clamp(1.75rem, 4vw, 3rem);
                        font-weight: 500;
                        letter-spacing: -0.02em;
                    }
                    .reveal {
                        opacity: 0;
                        transform: translateY(30px);
                        transition: opacity 0.8s ease, transform 0.8s ease;
                    }
                    .reveal.visible {
                        opacity: 1;
                        transform: translateY(0);
                    }
                    .points {
                        display: grid;
                        gap: 2.5rem;
                    }
                    .points p {
                        font-size: 1.15rem;
                        color: #4b5563;
                    }
                    .points strong {
                        color: #111;
                    }
                    .source-grid {
                        display: grid;
                        grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
                        gap: 1rem;
                        margin-top: 2.5rem;
                    }
                    .source-card {
                        border: 1px solid #e5e7eb;
                        border-radius: 12px;
                        padding: 1.25rem;
                        text-align: center;
                    }
                    .source-card img {
                        height: 32px;
                        margin-bottom: 0.75rem;
                    }
                    .source-count {
                        font-size: 1.5rem;
                        font-variant-numeric: tabular-nums;
                        font-weight: 600;
                    }
                    .source-caption, .source-name {
                        font-size: 0.8rem;
                        color: #6b7280;
                    }
                    .video-frame {
                        position: relative;
                        padding: 61.43% 0 0 0;
                        border-radius: 16px;
                        overflow: hidden;
                        background: #111;
                    }
                    .video-frame iframe {
                        position: absolute;
                        inset: 0;
                        width: 100%;
                        height: 100%;
                    }
                    .pipeline {
                        display: grid;
                        grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
                        gap: 2rem;
                        margin-top: 3rem;
                    }
                    .pipeline-step .step-number {
                        font-size: 0.75rem;
                        color: #6b7280;
                        letter-spacing: 0.1em;
                    }
                    .pipeline-step p {
                        color: #9ca3af;
                    }
                    .features {
                        display: grid;
                        grid-template-columns: repeat(auto-fit, minmax(260px, 1fr));
                        gap: 1.5rem;
                        margin-top: 3rem;
                    }
                    .feature-card {
                        border: 1px solid #e5e7eb;
                        border-radius: 20px;
                        padding: 2rem;
                    }
                    .feature-card .big {
                        font-size: 4.5rem;
                        font-weight: 500;
                        letter-spacing: -0.04em;
                    }
                    .feature-card .unit {
                        font-size: 1.5rem;
                        font-weight: 700;
                        margin-left: 0.5rem;
                    }
                    .feature-card p {
                        color: #6b7280;
                        font-size: 1.1rem;
                    }
                    .waitlist-form {
                        display: flex;
                        flex-wrap: wrap;
                        gap: 0.75rem;
                        max-width: 32rem;
                        margin-top: 1.5rem;
                    }
                    .waitlist-form input {
                        flex: 1;
                        min-width: 200px;
                        height: 3rem;
                        padding: 0 1rem;
                        border-radius: 6px;
                        border: 1px solid #d1d5db;
                    }
                    .waitlist-form button {
                        height: 3rem;
                        padding: 0 1.75rem;
                        border-radius: 6px;
                        border: none;
                        background: #111;
                        color: #fff;
                        cursor: pointer;
                    }
                    .waitlist-form.dark input {
                        background: rgba(255, 255, 255, 0.1);
                        border-color: rgba(255, 255, 255, 0.2);
                        color: #fff;
                    }
                    .waitlist-form.dark button {
                        background: #fff;
                        color: #000;
                    }
                    .waitlist-status {
                        width: 100%;
                        font-size: 0.9rem;
                        margin: 0;
                    }
                    .waitlist-status.ok { color: #16a34a; }
                    .waitlist-status.error { color: #dc2626; }
                    .accordion-item {
                        border-bottom: 1px solid #e5e7eb;
                    }
                    .accordion-trigger {
                        width: 100%;
                        display: flex;
                        justify-content: space-between;
                        align-items: center;
                        padding: 1.25rem 0;
                        background: none;
                        border: none;
                        font-size: 1.1rem;
                        text-align: left;
                        cursor: pointer;
                    }
                    .accordion-content {
                        max-height: 0;
                        overflow: hidden;
                        color: #6b7280;
                        transition: max-height 0.3s ease;
                    }
                    .accordion-item.open .accordion-content {
                        max-height: 20rem;
                        padding-bottom: 1.25rem;
                    }
                    .landing-footer {
                        border-top: 1px solid #f3f4f6;
                        padding: 2rem 1.5rem;
                        font-size: 0.85rem;
                        color: #6b7280;
                    }
                    .landing-footer .section-inner {
                        display: flex;
                        flex-wrap: wrap;
                        justify-content: space-between;
                        gap: 1rem;
                    }
                    .landing-footer a {
                        color: inherit;
                        text-decoration: none;
                        margin-left: 1.5rem;
                    }
                "#}
            </style>

            <nav class="landing-nav">
                <div class="landing-nav-inner">
                    <Link<Route> to={Route::Landing} classes="nav-logo">
                        <img src="/assets/logo.svg" alt="gridGPT" height="28" />
                    </Link<Route>>
                    <button class="btn-dark" onclick={on_join_click.clone()}>{"Join the waitlist"}</button>
                </div>
            </nav>

            <header class="hero">
                <img class="hero-bg" src="/assets/hero-bg.png" alt="" />
                <div class="hero-grid">
                    <div>
                        <h1>
                            {"10 Quality Leads"}<br />{"Every Day"}
                        </h1>
                        <p>
                            {"Build to deliver verified contacts you can confidently message - meet your most promising prospects today."}
                        </p>
                        <p class="hero-roles">
                            {"Built for "}<RoleRotator />
                        </p>
                        <button class="btn-dark" onclick={on_join_click.clone()}>{"Join the waitlist"}</button>
                    </div>
                    <Tilt rotation_factor={8.0} perspective={2000}>
                        <img class="hero-preview" src="/assets/dashboard-preview.png" alt="Platform Preview" />
                    </Tilt>
                </div>
            </header>

            <section class="block">
                <div class="section-inner">
                    <h2 class="reveal">{"These leads were found for you"}</h2>
                    <div class="points">
                        <div class="reveal">
                            <p>{"Sourced with "}<strong>{"your requirements"}</strong>{" in mind from 100+ verified sources."}</p>
                        </div>
                        <div class="reveal">
                            <p>{"Pulled from "}<strong>{"social platforms and business databases"}</strong>{", filtered to "}<strong>{"fit"}</strong>{"."}</p>
                        </div>
                        <div class="reveal">
                            <p>{"Then enriched with "}<strong>{"context"}</strong>{" so your first message is always personal and does not sound templated."}</p>
                        </div>
                    </div>
                    <SourceGrid />
                    <div class="reveal" style="margin-top: 3rem;">
                        { vimeo("1148118071", "table-animation", true) }
                    </div>
                </div>
            </section>

            <section class="block">
                <div class="section-inner">
                    <h2 class="reveal">{"Meet our engine"}</h2>
                    <p class="reveal">
                        {"…that delivers quality leads in minutes. We don’t just find emails – we verify fit to your criteria and add the context you need for successful outreach."}
                    </p>
                    <div class="reveal">
                        { vimeo("1148118000", "agent-prepare", true) }
                    </div>
                </div>
            </section>

            <section class="block dark">
                <div class="section-inner">
                    <h2 class="reveal">{"How the Engine Works"}</h2>
                    <p class="reveal">{"A continuous pipeline from definition to delivery."}</p>
                    <div class="pipeline">
                        { for PIPELINE.iter().map(|(step, title, desc)| html! {
                            <div class="pipeline-step reveal" key={*step}>
                                <div class="step-number">{*step}</div>
                                <h4>{*title}</h4>
                                <p>{*desc}</p>
                            </div>
                        }) }
                    </div>
                    <div class="reveal" style="margin-top: 4rem;">
                        <h2>{"You get actionable Leads"}</h2>
                        <p>{"A personalized list lands in your inbox, Sheet/CSV, or CRM."}</p>
                        { vimeo("1148118015", "ai-agent-chat", true) }
                    </div>
                </div>
            </section>

            <section class="block">
                <div class="section-inner">
                    <h2 class="reveal">{"Why this works"}</h2>
                    <p class="reveal">{"Quality over quantity. We focus on the factors that actually convert."}</p>
                    <div class="features">
                        <div class="feature-card reveal">
                            <div><span class="big">{"2"}</span><span class="unit">{"minutes"}</span></div>
                            <p>{"to set your ICP criteria and generate your first lead list."}</p>
                        </div>
                        <div class="feature-card reveal">
                            <div><span class="big">{"8/10"}</span><span class="unit">{"leads"}</span></div>
                            <p>{"Our target after 14 days of feedback. At least 80% of leads match your ICP. Guaranteed."}</p>
                        </div>
                        <div class="feature-card reveal">
                            <div><span class="big">{"3"}</span><span class="unit">{"minutes/day"}</span></div>
                            <p>{"to review leads with quick feedback."}</p>
                        </div>
                        <div class="feature-card reveal">
                            <div><span class="big">{"83%"}</span></div>
                            <p>{"Users report higher reply rates when using our AI-written first lines + context notes."}</p>
                        </div>
                        <div class="feature-card reveal">
                            <div><span class="big">{"10"}</span><span class="unit">{"leads"}</span></div>
                            <p>{"delivered to your inbox daily - ready to contact."}</p>
                        </div>
                    </div>
                </div>
            </section>

            <section class="block dark" id="waitlist">
                <div class="section-inner">
                    { vimeo("1148118051", "sent-mail", false) }
                    <h2 class="reveal">{"Your leads are waiting for you. Get to know them!"}</h2>
                    <p>{"Sign up for a waitlist. Be the first to boost your outreach game."}</p>
                    <WaitlistForm source="cta" dark={true} />
                </div>
            </section>

            <section class="block">
                <div class="section-inner">
                    <h2>{"Frequently Asked Questions"}</h2>
                    { for FAQS.iter().map(|(question, answer)| html! {
                        <AccordionItem key={*question} question={question.to_string()}>
                            <p>{*answer}</p>
                        </AccordionItem>
                    }) }
                </div>
            </section>

            <footer class="landing-footer">
                <div class="section-inner">
                    <div>{"© 2025 gridGPT. All rights reserved."}</div>
                    <div>
                        <Link<Route> to={Route::Terms}>{"Privacy"}</Link<Route>>
                        <Link<Route> to={Route::Terms}>{"Terms"}</Link<Route>>
                        <a href="#" onclick={on_cookie_settings}>{"Cookie settings"}</a>
                        <a href="https://twitter.com" target="_blank" rel="noopener noreferrer">{"Twitter"}</a>
                    </div>
                </div>
            </footer>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_steps_are_numbered_in_order() {
        let numbers: Vec<&str> = PIPELINE.iter().map(|(n, _, _)| *n).collect();
        assert_eq!(numbers, vec!["01", "02", "03", "04"]);
    }

    #[test]
    fn faq_questions_are_unique() {
        let mut questions: Vec<&str> = FAQS.iter().map(|(q, _)| *q).collect();
        questions.sort();
        questions.dedup();
        assert_eq!(questions.len(), FAQS.len());
    }
}
