//! Single-flight loading of third-party `<script>` tags.
//!
//! Each script gets one `ScriptLoader` owning its state. Concurrent `load()`
//! calls share one injection and one outcome; a failed load clears the
//! in-flight handle so a later decision can retry.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture, Shared};
use js_sys::Promise;
use log::{error, info};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use super::error::LoadError;
use super::vendor::VendorBridge;

/// Shared outcome of one load attempt. Cloning it is how concurrent callers
/// join the attempt already in flight.
pub type LoadHandle = Shared<LocalBoxFuture<'static, Result<(), LoadError>>>;

pub type InjectFuture = LocalBoxFuture<'static, Result<(), LoadError>>;

/// Puts a script element into the document and reports when it has run.
pub trait ScriptInjector {
    fn inject(&self, src: &str) -> InjectFuture;
}

/// A loader the orchestrator can drive.
pub trait Loader {
    fn is_loaded(&self) -> bool;
    fn load(&self) -> LoadHandle;
}

/// A loader whose tracking can be suspended after load.
pub trait RevocableLoader: Loader {
    fn grant(&self);
    fn revoke(&self);
    fn is_revoked(&self) -> bool;
}

/// Per-vendor behaviour around the generic load sequence.
pub trait VendorScript: 'static {
    /// Log prefix, e.g. `GoogleTags`
    const NAME: &'static str;

    fn src(&self) -> String;

    /// Globals the script expects to already exist when it executes.
    fn bootstrap(&self, bridge: &dyn VendorBridge);

    /// One-time setup after the script has loaded.
    fn initialize(&self, bridge: &dyn VendorBridge);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderPhase {
    Unloaded,
    Loading,
    Loaded,
}

#[derive(Default)]
pub struct LoaderState {
    loaded: Cell<bool>,
    in_flight: RefCell<Option<LoadHandle>>,
    revoked: Cell<bool>,
}

impl LoaderState {
    pub fn phase(&self) -> LoaderPhase {
        if self.loaded.get() {
            LoaderPhase::Loaded
        } else if self.in_flight.borrow().is_some() {
            LoaderPhase::Loading
        } else {
            LoaderPhase::Unloaded
        }
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked.get()
    }

    pub(crate) fn set_revoked(&self, revoked: bool) {
        self.revoked.set(revoked);
    }

    #[cfg(test)]
    pub fn reset(&self) {
        self.loaded.set(false);
        self.revoked.set(false);
        self.in_flight.borrow_mut().take();
    }
}

pub struct ScriptLoader<V: VendorScript> {
    vendor: Rc<V>,
    pub(crate) bridge: Rc<dyn VendorBridge>,
    injector: Rc<dyn ScriptInjector>,
    pub(crate) state: Rc<LoaderState>,
}

impl<V: VendorScript> ScriptLoader<V> {
    pub fn new(vendor: V, bridge: Rc<dyn VendorBridge>, injector: Rc<dyn ScriptInjector>) -> Self {
        Self {
            vendor: Rc::new(vendor),
            bridge,
            injector,
            state: Rc::new(LoaderState::default()),
        }
    }

    pub fn phase(&self) -> LoaderPhase {
        self.state.phase()
    }

    #[cfg(test)]
    pub fn state(&self) -> &LoaderState {
        &self.state
    }

    fn start(&self) -> LoadHandle {
        self.vendor.bootstrap(&*self.bridge);
        let injection = self.injector.inject(&self.vendor.src());

        let vendor = self.vendor.clone();
        let bridge = self.bridge.clone();
        let state = self.state.clone();

        async move {
            match injection.await {
                Ok(()) => {
                    state.loaded.set(true);
                    state.revoked.set(false);
                    state.in_flight.borrow_mut().take();
                    vendor.initialize(&*bridge);
                    info!("[{}] Script loaded", V::NAME);
                    Ok(())
                }
                Err(e) => {
                    state.in_flight.borrow_mut().take();
                    error!("[{}] {}", V::NAME, e);
                    Err(e)
                }
            }
        }
        .boxed_local()
        .shared()
    }
}

impl<V: VendorScript> Loader for ScriptLoader<V> {
    fn is_loaded(&self) -> bool {
        self.state.loaded.get()
    }

    fn load(&self) -> LoadHandle {
        if self.state.loaded.get() {
            return future::ready(Ok(())).boxed_local().shared();
        }

        let pending = self.state.in_flight.borrow().clone();
        if let Some(handle) = pending {
            return handle;
        }

        let handle = self.start();
        *self.state.in_flight.borrow_mut() = Some(handle.clone());
        handle
    }
}

/// Injects `<script async>` elements into the live document.
pub struct DomScriptInjector;

impl ScriptInjector for DomScriptInjector {
    fn inject(&self, src: &str) -> InjectFuture {
        let src = src.to_string();
        match insert_script(&src) {
            Ok(promise) => async move {
                JsFuture::from(promise)
                    .await
                    .map(|_| ())
                    .map_err(|_| LoadError::Network(src))
            }
            .boxed_local(),
            Err(e) => future::ready(Err(e)).boxed_local(),
        }
    }
}

// The returned promise settles from the element's load/error events.
pub(super) fn insert_script(src: &str) -> Result<Promise, LoadError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| LoadError::Injection("no document".to_string()))?;

    let script = document
        .create_element("script")?
        .dyn_into::<web_sys::HtmlScriptElement>()
        .map_err(|_| LoadError::Injection("not a script element".to_string()))?;
    script.set_async(true);
    script.set_src(src);

    let promise = Promise::new(&mut |resolve, reject| {
        script.set_onload(Some(&resolve));
        script.set_onerror(Some(&reject));
    });

    // Vendors ask for insertion ahead of the first script on the page.
    let first_script = document.get_elements_by_tag_name("script").item(0);
    match first_script.and_then(|first| first.parent_node().map(|parent| (first, parent))) {
        Some((first, parent)) => {
            parent.insert_before(&script, Some(&*first))?;
        }
        None => {
            let head = document
                .head()
                .ok_or_else(|| LoadError::Injection("no <head>".to_string()))?;
            head.append_child(&script)?;
        }
    }

    Ok(promise)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consent::testing::{FakeInjector, RecordingBridge};
    use futures::executor::block_on;
    use serde_json::json;

    struct Probe;

    impl VendorScript for Probe {
        const NAME: &'static str = "Probe";

        fn src(&self) -> String {
            "https://cdn.example/probe.js".to_string()
        }

        fn bootstrap(&self, bridge: &dyn VendorBridge) {
            bridge.push_data_layer(json!({"event": "probe.bootstrap"}));
        }

        fn initialize(&self, bridge: &dyn VendorBridge) {
            bridge.push_data_layer(json!({"event": "probe.init"}));
        }
    }

    fn loader(injector: Rc<FakeInjector>) -> (ScriptLoader<Probe>, Rc<RecordingBridge>) {
        let bridge = Rc::new(RecordingBridge::default());
        (ScriptLoader::new(Probe, bridge.clone(), injector), bridge)
    }

    #[test]
    fn concurrent_loads_share_one_injection() {
        let injector = Rc::new(FakeInjector::holding());
        let (loader, bridge) = loader(injector.clone());

        let first = loader.load();
        let second = loader.load();
        assert_eq!(injector.injected(), vec!["https://cdn.example/probe.js"]);
        assert_eq!(loader.phase(), LoaderPhase::Loading);

        injector.complete_all(Ok(()));
        let (a, b) = block_on(async { futures::join!(first, second) });

        assert_eq!(a, Ok(()));
        assert_eq!(b, Ok(()));
        assert_eq!(loader.phase(), LoaderPhase::Loaded);
        // Bootstrap and init ran exactly once.
        assert_eq!(
            bridge.data_layer(),
            vec![json!({"event": "probe.bootstrap"}), json!({"event": "probe.init"})]
        );
    }

    #[test]
    fn loading_after_success_is_a_no_op() {
        let injector = Rc::new(FakeInjector::succeeding());
        let (loader, _) = loader(injector.clone());

        assert_eq!(block_on(loader.load()), Ok(()));
        assert_eq!(block_on(loader.load()), Ok(()));
        assert_eq!(injector.injected().len(), 1);
        assert!(loader.is_loaded());
    }

    #[test]
    fn failure_clears_in_flight_and_allows_retry() {
        let injector = Rc::new(FakeInjector::failing());
        let (loader, bridge) = loader(injector.clone());

        let outcome = block_on(loader.load());
        assert_eq!(
            outcome,
            Err(LoadError::Network("https://cdn.example/probe.js".to_string()))
        );
        assert_eq!(loader.phase(), LoaderPhase::Unloaded);
        assert!(!bridge
            .data_layer()
            .contains(&json!({"event": "probe.init"})));

        injector.succeed_from_now_on();
        assert_eq!(block_on(loader.load()), Ok(()));
        assert_eq!(injector.injected().len(), 2);
        assert_eq!(loader.phase(), LoaderPhase::Loaded);
    }

    #[test]
    fn concurrent_callers_share_a_failure() {
        let injector = Rc::new(FakeInjector::holding());
        let (loader, _) = loader(injector.clone());

        let first = loader.load();
        let second = loader.load();
        injector.complete_all(Err(LoadError::Network("offline".to_string())));

        let (a, b) = block_on(async { futures::join!(first, second) });
        assert!(a.is_err());
        assert_eq!(a, b);
        assert_eq!(injector.injected().len(), 1);
    }

    #[test]
    fn successful_load_clears_a_stale_revocation() {
        let injector = Rc::new(FakeInjector::succeeding());
        let (loader, _) = loader(injector);
        assert!(!loader.state().is_revoked());

        loader.state().set_revoked(true);
        block_on(loader.load()).unwrap();
        assert!(!loader.state().is_revoked());
    }

    #[test]
    fn reset_returns_to_unloaded() {
        let injector = Rc::new(FakeInjector::succeeding());
        let (loader, _) = loader(injector);
        block_on(loader.load()).unwrap();

        loader.state().reset();
        assert_eq!(loader.phase(), LoaderPhase::Unloaded);
    }
}
