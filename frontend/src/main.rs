use yew::prelude::*;
use yew_router::prelude::*;
use log::{info, Level};

mod config;
mod consent;
mod waitlist;
mod components {
    pub mod accordion;
    pub mod cookie_consent;
    pub mod role_rotator;
    pub mod source_grid;
    pub mod tilt;
}
mod pages {
    pub mod landing;
    pub mod not_found;
    pub mod terms;
}

use components::cookie_consent::CookieConsent;
use consent::ConsentHandle;
use pages::{
    landing::Landing,
    not_found::NotFound,
    terms::Terms,
};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Landing,
    #[at("/terms")]
    Terms,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Landing => {
            info!("Rendering Landing page");
            html! { <Landing /> }
        },
        Route::Terms => {
            info!("Rendering Terms page");
            html! { <Terms /> }
        },
        Route::NotFound => {
            info!("Rendering NotFound page");
            html! { <NotFound /> }
        },
    }
}

/// Reports client-side navigations to the pixel. The first render is skipped
/// because pixel initialization already tracks the landing view.
#[function_component(PageViewTracker)]
fn page_view_tracker() -> Html {
    let consent = use_context::<ConsentHandle>();
    let path = use_location().map(|l| l.path().to_string()).unwrap_or_default();
    let first = use_mut_ref(|| true);

    use_effect_with_deps(
        move |_| {
            let initial = std::mem::replace(&mut *first.borrow_mut(), false);
            if !initial {
                if let Some(consent) = consent {
                    consent.pixel().track_page_view();
                }
            }
            || ()
        },
        path,
    );

    html! {}
}

#[function_component]
fn App() -> Html {
    let consent = use_memo(|_| ConsentHandle::for_window(), ());

    html! {
        <ContextProvider<ConsentHandle> context={(*consent).clone()}>
            <BrowserRouter>
                <PageViewTracker />
                <Switch<Route> render={switch} />
            </BrowserRouter>
            <CookieConsent consent={(*consent).clone()} />
        </ContextProvider<ConsentHandle>>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging; a second init only happens on hot reload
    if console_log::init_with_level(Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
