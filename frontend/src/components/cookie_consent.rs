use yew::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use log::{info, warn};

use crate::config::COOKIE_SETTINGS_EVENT;
use crate::consent::orchestrator::ConsentPhase;
use crate::consent::{ConsentDecision, ConsentHandle};

/// Open the cookie preferences modal from anywhere on the page.
pub fn open_cookie_settings() {
    let Some(window) = web_sys::window() else {
        return;
    };
    match web_sys::CustomEvent::new(COOKIE_SETTINGS_EVENT) {
        Ok(event) => {
            let _ = window.dispatch_event(&event);
        }
        Err(_) => warn!("[Consent] Could not create {} event", COOKIE_SETTINGS_EVENT),
    }
}

#[derive(Clone, Copy)]
enum Choice {
    AcceptAll,
    RejectNonessential,
    Save(ConsentDecision),
}

impl Choice {
    fn decision(&self) -> ConsentDecision {
        match self {
            Choice::AcceptAll => ConsentDecision::accept_all(),
            Choice::RejectNonessential => ConsentDecision::reject_nonessential(),
            Choice::Save(decision) => *decision,
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct CookieConsentProps {
    pub consent: ConsentHandle,
}

#[function_component(CookieConsent)]
pub fn cookie_consent(props: &CookieConsentProps) -> Html {
    let show_banner = use_state(|| false);
    let show_modal = use_state(|| false);
    let preferences = use_state(ConsentDecision::default);

    // Restore a saved decision on mount, otherwise prompt
    {
        let consent = props.consent.clone();
        let show_banner = show_banner.clone();
        let preferences = preferences.clone();
        use_effect_with_deps(
            move |_| {
                let engine = consent.engine();
                spawn_local(async move {
                    match engine.restore().await {
                        Some(record) => preferences.set(record.decision()),
                        None => {
                            info!("[Consent] No saved consent, showing banner");
                            show_banner.set(true);
                        }
                    }
                });
                || ()
            },
            (),
        );
    }

    // Footer links and the terms page open the modal through a window event
    {
        let consent = props.consent.clone();
        let show_modal = show_modal.clone();
        let preferences = preferences.clone();
        use_effect_with_deps(
            move |_| {
                let window = web_sys::window();
                let listener = Closure::wrap(Box::new(move || {
                    // The in-memory decision survives blocked storage
                    let decided = match consent.phase() {
                        ConsentPhase::Decided(decision) => Some(decision),
                        ConsentPhase::NoDecision => consent.current().map(|r| r.decision()),
                    };
                    if let Some(decision) = decided {
                        preferences.set(decision);
                    }
                    show_modal.set(true);
                }) as Box<dyn FnMut()>);

                if let Some(window) = window.as_ref() {
                    let _ = window.add_event_listener_with_callback(
                        COOKIE_SETTINGS_EVENT,
                        listener.as_ref().unchecked_ref(),
                    );
                }

                move || {
                    if let Some(window) = window {
                        let _ = window.remove_event_listener_with_callback(
                            COOKIE_SETTINGS_EVENT,
                            listener.as_ref().unchecked_ref(),
                        );
                    }
                }
            },
            (),
        );
    }

    let decide = {
        let consent = props.consent.clone();
        let show_banner = show_banner.clone();
        let show_modal = show_modal.clone();
        let preferences = preferences.clone();
        Callback::from(move |choice: Choice| {
            preferences.set(choice.decision());
            show_banner.set(false);
            show_modal.set(false);
            let engine = consent.engine();
            spawn_local(async move {
                match choice {
                    Choice::AcceptAll => engine.accept_all().await,
                    Choice::RejectNonessential => engine.reject_nonessential().await,
                    Choice::Save(decision) => engine.save_preferences(decision).await,
                }
            });
        })
    };

    let on_accept_all = {
        let decide = decide.clone();
        Callback::from(move |_: MouseEvent| decide.emit(Choice::AcceptAll))
    };

    let on_reject = {
        let decide = decide.clone();
        Callback::from(move |_: MouseEvent| decide.emit(Choice::RejectNonessential))
    };

    let on_save = {
        let decide = decide.clone();
        let preferences = preferences.clone();
        Callback::from(move |_: MouseEvent| decide.emit(Choice::Save(*preferences)))
    };

    let on_manage = {
        let show_modal = show_modal.clone();
        Callback::from(move |_: MouseEvent| show_modal.set(true))
    };

    // Closing without a stored decision falls back to the banner
    let on_close = {
        let consent = props.consent.clone();
        let show_banner = show_banner.clone();
        let show_modal = show_modal.clone();
        Callback::from(move |_: MouseEvent| {
            let undecided = consent.phase() == ConsentPhase::NoDecision && !consent.store().has_decision();
            show_banner.set(undecided);
            show_modal.set(false);
        })
    };

    let toggle_analytics = {
        let preferences = preferences.clone();
        Callback::from(move |_: MouseEvent| {
            preferences.set(ConsentDecision {
                analytics: !preferences.analytics,
                ..*preferences
            });
        })
    };

    let toggle_marketing = {
        let preferences = preferences.clone();
        Callback::from(move |_: MouseEvent| {
            preferences.set(ConsentDecision {
                marketing: !preferences.marketing,
                ..*preferences
            });
        })
    };

    if !*show_banner && !*show_modal {
        return html! {};
    }

    html! {
        <>
            <style>
                {r#"
                    .cookie-banner {
                        position: fixed;
                        bottom: 0;
                        left: 0;
                        right: 0;
                        z-index: 100;
                        background: #fff;
                        border-top: 1px solid #e5e7eb;
                        box-shadow: 0 -8px 24px rgba(0, 0, 0, 0.08);
                    }
                    .cookie-banner-inner {
                        max-width: 72rem;
                        margin: 0 auto;
                        padding: 1.25rem 1.5rem;
                        display: flex;
                        flex-wrap: wrap;
                        gap: 1rem;
                        align-items: center;
                        justify-content: space-between;
                    }
                    .cookie-banner h3 {
                        font-size: 1rem;
                        font-weight: 600;
                        color: #111;
                        margin: 0 0 0.25rem 0;
                    }
                    .cookie-banner p {
                        font-size: 0.875rem;
                        color: #4b5563;
                        max-width: 40rem;
                        margin: 0;
                    }
                    .cookie-actions {
                        display: flex;
                        gap: 0.75rem;
                        flex-wrap: wrap;
                    }
                    .cookie-btn {
                        font-size: 0.875rem;
                        padding: 0.5rem 1rem;
                        border-radius: 6px;
                        border: 1px solid #d1d5db;
                        background: #fff;
                        color: #111;
                        cursor: pointer;
                    }
                    .cookie-btn.ghost {
                        border-color: transparent;
                        color: #4b5563;
                    }
                    .cookie-btn.primary {
                        background: #111;
                        border-color: #111;
                        color: #fff;
                    }
                    .cookie-modal-backdrop {
                        position: fixed;
                        inset: 0;
                        z-index: 110;
                        background: rgba(0, 0, 0, 0.5);
                        display: flex;
                        align-items: center;
                        justify-content: center;
                        padding: 1rem;
                    }
                    .cookie-modal {
                        background: #fff;
                        border-radius: 12px;
                        max-width: 28rem;
                        width: 100%;
                        padding: 1.5rem;
                        position: relative;
                    }
                    .cookie-modal-close {
                        position: absolute;
                        top: 0.75rem;
                        right: 0.75rem;
                        border: none;
                        background: none;
                        font-size: 1.25rem;
                        cursor: pointer;
                        color: #6b7280;
                    }
                    .cookie-category {
                        display: flex;
                        align-items: center;
                        justify-content: space-between;
                        padding: 0.75rem;
                        background: #f9fafb;
                        border-radius: 8px;
                        margin-bottom: 0.75rem;
                    }
                    .cookie-category h4 {
                        font-size: 0.875rem;
                        margin: 0;
                        color: #111;
                    }
                    .cookie-category p {
                        font-size: 0.75rem;
                        color: #6b7280;
                        margin: 0.125rem 0 0 0;
                    }
                    .cookie-switch {
                        width: 2.5rem;
                        height: 1.4rem;
                        border-radius: 999px;
                        border: none;
                        background: #d1d5db;
                        position: relative;
                        cursor: pointer;
                        flex-shrink: 0;
                    }
                    .cookie-switch::after {
                        content: "";
                        position: absolute;
                        top: 0.15rem;
                        left: 0.15rem;
                        width: 1.1rem;
                        height: 1.1rem;
                        border-radius: 50%;
                        background: #fff;
                        transition: transform 0.2s ease;
                    }
                    .cookie-switch.on {
                        background: #111;
                    }
                    .cookie-switch.on::after {
                        transform: translateX(1.1rem);
                    }
                    .cookie-switch:disabled {
                        opacity: 0.7;
                        cursor: not-allowed;
                    }
                    .cookie-modal-footer {
                        display: flex;
                        gap: 0.5rem;
                        justify-content: flex-end;
                        flex-wrap: wrap;
                        margin-top: 1rem;
                    }
                "#}
            </style>

            {
                if *show_banner && !*show_modal {
                    html! {
                <div class="cookie-banner" role="dialog" aria-label="Cookie consent">
                    <div class="cookie-banner-inner">
                        <div>
                            <h3>{"We use cookies"}</h3>
                            <p>
                                {"We use cookies to improve your experience, analyze site traffic, and show you personalized content. You can accept all cookies, reject non-essential ones, or customize your preferences."}
                            </p>
                        </div>
                        <div class="cookie-actions">
                            <button class="cookie-btn ghost" onclick={on_manage}>{"Manage"}</button>
                            <button class="cookie-btn" onclick={on_reject.clone()}>{"Reject non-essential"}</button>
                            <button class="cookie-btn primary" onclick={on_accept_all.clone()}>{"Accept all"}</button>
                        </div>
                    </div>
                </div>
                    }
                } else {
                    html! {}
                }
            }

            {
                if *show_modal {
                    html! {
                <div class="cookie-modal-backdrop">
                    <div class="cookie-modal" role="dialog" aria-label="Cookie preferences">
                        <button class="cookie-modal-close" onclick={on_close} aria-label="Close">{"×"}</button>
                        <h2>{"Cookie Preferences"}</h2>
                        <p>{"Manage your cookie preferences. You can enable or disable different types of cookies below."}</p>

                        <div class="cookie-category">
                            <div>
                                <h4>{"Necessary"}</h4>
                                <p>{"Essential for the website to function. Cannot be disabled."}</p>
                            </div>
                            <button class="cookie-switch on" disabled={true} aria-checked="true"></button>
                        </div>

                        <div class="cookie-category">
                            <div>
                                <h4>{"Analytics"}</h4>
                                <p>{"Help us understand how visitors interact with our website."}</p>
                            </div>
                            <button
                                class={classes!("cookie-switch", preferences.analytics.then(|| "on"))}
                                role="switch"
                                aria-checked={preferences.analytics.to_string()}
                                onclick={toggle_analytics}
                            ></button>
                        </div>

                        <div class="cookie-category">
                            <div>
                                <h4>{"Marketing"}</h4>
                                <p>{"Used to track visitors and display relevant ads."}</p>
                            </div>
                            <button
                                class={classes!("cookie-switch", preferences.marketing.then(|| "on"))}
                                role="switch"
                                aria-checked={preferences.marketing.to_string()}
                                onclick={toggle_marketing}
                            ></button>
                        </div>

                        <div class="cookie-modal-footer">
                            <button class="cookie-btn" onclick={on_reject}>{"Reject all"}</button>
                            <button class="cookie-btn" onclick={on_accept_all}>{"Accept all"}</button>
                            <button class="cookie-btn primary" onclick={on_save}>{"Save preferences"}</button>
                        </div>
                    </div>
                </div>
                    }
                } else {
                    html! {}
                }
            }
        </>
    }
}
