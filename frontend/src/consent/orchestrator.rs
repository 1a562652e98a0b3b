use std::cell::Cell;
use std::rc::Rc;

use log::{error, info, warn};

use super::loader::{Loader, RevocableLoader};
use super::signals::ConsentModeBridge;
use super::store::{ConsentStore, KeyValueStorage};
use super::vendor::VendorBridge;
use super::{ConsentDecision, ConsentRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentPhase {
    NoDecision,
    Decided(ConsentDecision),
}

/// Turns a consent decision into stored state, consent signals and script
/// loads, in that order.
///
/// Two decisions applied concurrently are not serialized: loaders still
/// inject each script at most once, but whichever signal update lands last
/// wins. The banner closes on the first click, so this does not come up in
/// practice.
pub struct ConsentOrchestrator<S, G, P> {
    store: ConsentStore<S>,
    signals: ConsentModeBridge,
    tag_manager: G,
    pixel: P,
    phase: Cell<ConsentPhase>,
}

impl<S, G, P> ConsentOrchestrator<S, G, P>
where
    S: KeyValueStorage,
    G: Loader,
    P: RevocableLoader,
{
    pub fn new(store: ConsentStore<S>, bridge: Rc<dyn VendorBridge>, tag_manager: G, pixel: P) -> Self {
        Self {
            store,
            signals: ConsentModeBridge::new(bridge),
            tag_manager,
            pixel,
            phase: Cell::new(ConsentPhase::NoDecision),
        }
    }

    pub fn store(&self) -> &ConsentStore<S> {
        &self.store
    }

    pub fn tag_manager(&self) -> &G {
        &self.tag_manager
    }

    pub fn pixel(&self) -> &P {
        &self.pixel
    }

    pub fn phase(&self) -> ConsentPhase {
        self.phase.get()
    }

    /// The stored decision, if any.
    pub fn current(&self) -> Option<ConsentRecord> {
        self.store.read()
    }

    /// Re-apply the stored decision at startup. `None` means the visitor has
    /// not decided yet and should be prompted.
    pub async fn restore(&self) -> Option<ConsentRecord> {
        let record = self.store.read()?;
        info!("[Consent] Restoring saved consent");
        self.apply_consent(record.decision()).await;
        Some(record)
    }

    pub async fn accept_all(&self) {
        self.apply_consent(ConsentDecision::accept_all()).await;
    }

    pub async fn reject_nonessential(&self) {
        self.apply_consent(ConsentDecision::reject_nonessential()).await;
    }

    pub async fn save_preferences(&self, decision: ConsentDecision) {
        self.apply_consent(decision).await;
    }

    pub async fn apply_consent(&self, decision: ConsentDecision) {
        if !self.store.write(decision) {
            warn!("[Consent] Decision applies to this page view only");
        }
        self.phase.set(ConsentPhase::Decided(decision));

        // Signals go out before any vendor script can read them.
        self.signals.update_signals(decision);

        if decision.allows_tracking() && !self.tag_manager.is_loaded() {
            match self.tag_manager.load().await {
                // GTM may reset consent defaults when it boots; assert ours again.
                Ok(()) => self.signals.update_signals(decision),
                Err(e) => error!("[Consent] Failed to load Google: {}", e),
            }
        }

        if decision.marketing && !self.pixel.is_loaded() {
            if let Err(e) = self.pixel.load().await {
                error!("[Consent] Failed to load Meta Pixel: {}", e);
            }
        } else if !decision.marketing && self.pixel.is_loaded() {
            self.pixel.revoke();
        }

        if decision.marketing && self.pixel.is_loaded() {
            self.pixel.grant();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consent::error::LoadError;
    use crate::consent::loader::{LoadHandle, ScriptLoader};
    use crate::consent::pixel::MetaPixel;
    use crate::consent::signals::consent_update_payload;
    use crate::consent::tags::TagManager;
    use crate::consent::testing::{FakeInjector, MemoryStorage, RecordingBridge};
    use futures::executor::block_on;
    use futures::future::{self, FutureExt};
    use serde_json::json;
    use std::cell::RefCell;

    /// Loader double that records calls and never touches a document.
    #[derive(Default)]
    struct StubLoader {
        loaded: Cell<bool>,
        fail: Cell<bool>,
        loads: Cell<usize>,
        revoked: Cell<bool>,
        log: RefCell<Vec<&'static str>>,
    }

    impl Loader for StubLoader {
        fn is_loaded(&self) -> bool {
            self.loaded.get()
        }

        fn load(&self) -> LoadHandle {
            self.loads.set(self.loads.get() + 1);
            let outcome = if self.fail.get() {
                Err(LoadError::Network("stub".to_string()))
            } else {
                self.loaded.set(true);
                Ok(())
            };
            future::ready(outcome).boxed_local().shared()
        }
    }

    impl RevocableLoader for StubLoader {
        fn grant(&self) {
            self.log.borrow_mut().push("grant");
            self.revoked.set(false);
        }

        fn revoke(&self) {
            self.log.borrow_mut().push("revoke");
            self.revoked.set(true);
        }

        fn is_revoked(&self) -> bool {
            self.revoked.get()
        }
    }

    type Stubbed = ConsentOrchestrator<MemoryStorage, StubLoader, StubLoader>;

    fn stubbed() -> (Stubbed, Rc<RecordingBridge>) {
        let bridge = Rc::new(RecordingBridge::default());
        let orchestrator = ConsentOrchestrator::new(
            ConsentStore::new(MemoryStorage::default()),
            bridge.clone(),
            StubLoader::default(),
            StubLoader::default(),
        );
        (orchestrator, bridge)
    }

    type Wired = ConsentOrchestrator<MemoryStorage, ScriptLoader<TagManager>, ScriptLoader<MetaPixel>>;

    fn wired(injector: Rc<FakeInjector>) -> (Wired, Rc<RecordingBridge>) {
        let bridge = Rc::new(RecordingBridge::default());
        let orchestrator = ConsentOrchestrator::new(
            ConsentStore::new(MemoryStorage::default()),
            bridge.clone(),
            ScriptLoader::new(TagManager::new("GTM-TEST"), bridge.clone(), injector.clone()),
            ScriptLoader::new(MetaPixel::new("1234"), bridge.clone(), injector),
        );
        (orchestrator, bridge)
    }

    fn signal_updates(bridge: &RecordingBridge) -> Vec<serde_json::Value> {
        bridge
            .gtag_calls()
            .into_iter()
            .filter(|call| call.first() == Some(&json!("consent")))
            .map(|call| call[2].clone())
            .collect()
    }

    #[test]
    fn reject_from_fresh_session_loads_nothing() {
        let (orchestrator, bridge) = stubbed();
        assert_eq!(orchestrator.phase(), ConsentPhase::NoDecision);
        assert!(block_on(orchestrator.restore()).is_none());

        block_on(orchestrator.reject_nonessential());

        let record = orchestrator.current().unwrap();
        assert!(!record.analytics);
        assert!(!record.marketing);
        assert_eq!(orchestrator.tag_manager().loads.get(), 0);
        assert_eq!(orchestrator.pixel().loads.get(), 0);
        assert_eq!(
            signal_updates(&bridge),
            vec![consent_update_payload(ConsentDecision::reject_nonessential())]
        );
        assert_eq!(
            orchestrator.phase(),
            ConsentPhase::Decided(ConsentDecision::reject_nonessential())
        );
    }

    #[test]
    fn accept_all_loads_each_script_once_with_all_signals_granted() {
        let injector = Rc::new(FakeInjector::succeeding());
        let (orchestrator, bridge) = wired(injector.clone());

        block_on(orchestrator.accept_all());

        assert_eq!(
            injector.injected(),
            vec![
                "https://www.googletagmanager.com/gtm.js?id=GTM-TEST",
                "https://connect.facebook.net/en_US/fbevents.js",
            ]
        );
        let updates = signal_updates(&bridge);
        // Initial update plus the re-assertion after GTM loaded.
        assert_eq!(updates.len(), 2);
        for update in updates {
            assert!(update
                .as_object()
                .unwrap()
                .values()
                .all(|v| v == &json!("granted")));
        }
    }

    #[test]
    fn applying_the_same_decision_twice_is_idempotent() {
        let injector = Rc::new(FakeInjector::succeeding());
        let (orchestrator, _) = wired(injector.clone());

        block_on(orchestrator.accept_all());
        let first = orchestrator.current().unwrap();
        block_on(orchestrator.accept_all());
        let second = orchestrator.current().unwrap();

        assert_eq!(injector.injected().len(), 2);
        assert_eq!(first.decision(), second.decision());
        assert_eq!(first.version, second.version);
    }

    #[test]
    fn signals_are_sent_before_any_load() {
        let injector = Rc::new(FakeInjector::holding());
        let (orchestrator, bridge) = wired(injector.clone());

        let mut apply = orchestrator.apply_consent(ConsentDecision::accept_all()).boxed_local();
        // Drive the sequence up to its first suspension point.
        assert!((&mut apply).now_or_never().is_none());
        assert_eq!(signal_updates(&bridge).len(), 1);
        assert_eq!(injector.injected().len(), 1);

        injector.complete_all(Ok(()));
        assert!((&mut apply).now_or_never().is_none());
        // GTM done: signals re-asserted, pixel now in flight.
        assert_eq!(signal_updates(&bridge).len(), 2);
        assert_eq!(injector.injected().len(), 2);

        injector.complete_all(Ok(()));
        block_on(apply);
        assert!(orchestrator.pixel().is_loaded());
    }

    #[test]
    fn analytics_only_loads_tag_manager_but_not_pixel() {
        let (orchestrator, _) = stubbed();
        block_on(orchestrator.save_preferences(ConsentDecision {
            analytics: true,
            marketing: false,
        }));

        assert_eq!(orchestrator.tag_manager().loads.get(), 1);
        assert_eq!(orchestrator.pixel().loads.get(), 0);
    }

    #[test]
    fn tag_manager_failure_does_not_stop_the_pixel() {
        let (orchestrator, bridge) = stubbed();
        orchestrator.tag_manager().fail.set(true);

        block_on(orchestrator.accept_all());

        assert_eq!(orchestrator.pixel().loads.get(), 1);
        assert!(orchestrator.pixel().is_loaded());
        // No re-assertion without a successful GTM load.
        assert_eq!(signal_updates(&bridge).len(), 1);
    }

    #[test]
    fn failed_load_is_retried_on_next_decision() {
        let (orchestrator, _) = stubbed();
        orchestrator.tag_manager().fail.set(true);
        block_on(orchestrator.accept_all());

        orchestrator.tag_manager().fail.set(false);
        block_on(orchestrator.accept_all());

        assert_eq!(orchestrator.tag_manager().loads.get(), 2);
        assert!(orchestrator.tag_manager().is_loaded());
    }

    #[test]
    fn withdrawing_marketing_revokes_then_regrants_pixel() {
        let (orchestrator, _) = stubbed();
        block_on(orchestrator.accept_all());

        block_on(orchestrator.save_preferences(ConsentDecision {
            analytics: true,
            marketing: false,
        }));
        assert!(orchestrator.pixel().is_revoked());

        block_on(orchestrator.accept_all());
        assert!(!orchestrator.pixel().is_revoked());
        assert_eq!(orchestrator.pixel().loads.get(), 1);
        assert_eq!(
            *orchestrator.pixel().log.borrow(),
            vec!["grant", "revoke", "grant"]
        );
    }

    #[test]
    fn withdrawn_marketing_blocks_real_pixel_events() {
        let injector = Rc::new(FakeInjector::succeeding());
        let (orchestrator, bridge) = wired(injector);
        block_on(orchestrator.accept_all());

        block_on(orchestrator.reject_nonessential());
        bridge.clear_calls();
        orchestrator.pixel().track_event("Lead", None);

        assert!(bridge.fbq_calls().is_empty());
    }

    #[test]
    fn blocked_storage_still_applies_for_the_session() {
        let bridge = Rc::new(RecordingBridge::default());
        let orchestrator = ConsentOrchestrator::new(
            ConsentStore::new(MemoryStorage::blocked()),
            bridge.clone(),
            StubLoader::default(),
            StubLoader::default(),
        );

        block_on(orchestrator.accept_all());

        assert!(orchestrator.current().is_none());
        assert_eq!(orchestrator.tag_manager().loads.get(), 1);
        assert_eq!(orchestrator.pixel().loads.get(), 1);
        assert_eq!(
            orchestrator.phase(),
            ConsentPhase::Decided(ConsentDecision::accept_all())
        );
    }

    #[test]
    fn restore_reapplies_saved_decision() {
        let (orchestrator, bridge) = stubbed();
        orchestrator.store().write(ConsentDecision {
            analytics: true,
            marketing: false,
        });

        let restored = block_on(orchestrator.restore()).unwrap();

        assert!(restored.analytics);
        assert_eq!(orchestrator.tag_manager().loads.get(), 1);
        assert_eq!(orchestrator.pixel().loads.get(), 0);
        assert!(!signal_updates(&bridge).is_empty());
    }
}
