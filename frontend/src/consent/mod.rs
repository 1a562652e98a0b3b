//! Cookie consent engine.
//!
//! Persists the visitor's decision, projects it onto Google Consent Mode
//! signals, and gates loading of Google Tag Manager and the Meta Pixel.
//! Nothing third-party is loaded without an explicit decision.

pub mod error;
pub mod loader;
pub mod orchestrator;
pub mod pixel;
pub mod signals;
pub mod store;
pub mod tags;
pub mod vendor;

#[cfg(test)]
pub(crate) mod testing;


use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use loader::{DomScriptInjector, ScriptInjector, ScriptLoader};
use orchestrator::ConsentOrchestrator;
use pixel::MetaPixel;
use store::{BrowserStorage, ConsentStore};
use tags::TagManager;
use vendor::{VendorBridge, WindowBridge};

/// The two user-configurable consent flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsentDecision {
    pub analytics: bool,
    pub marketing: bool,
}

impl ConsentDecision {
    pub fn accept_all() -> Self {
        Self { analytics: true, marketing: true }
    }

    pub fn reject_nonessential() -> Self {
        Self { analytics: false, marketing: false }
    }

    /// Whether anything beyond strictly necessary storage is allowed.
    pub fn allows_tracking(&self) -> bool {
        self.analytics || self.marketing
    }
}

/// The persisted decision, as stored under the consent key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRecord {
    pub necessary: bool,
    pub analytics: bool,
    pub marketing: bool,
    pub version: u32,
    pub updated_at: DateTime<Utc>,
}

impl ConsentRecord {
    pub fn decision(&self) -> ConsentDecision {
        ConsentDecision {
            analytics: self.analytics,
            marketing: self.marketing,
        }
    }
}

pub type SiteConsent =
    ConsentOrchestrator<BrowserStorage, ScriptLoader<TagManager>, ScriptLoader<MetaPixel>>;

/// Shared handle to the page's consent engine, passed down through props
/// and context.
#[derive(Clone)]
pub struct ConsentHandle(Rc<SiteConsent>);

impl ConsentHandle {
    /// Wire the engine to the real browser globals.
    pub fn for_window() -> Self {
        let bridge: Rc<dyn VendorBridge> = Rc::new(WindowBridge);
        let injector: Rc<dyn ScriptInjector> = Rc::new(DomScriptInjector);

        let tag_manager = ScriptLoader::new(TagManager::from_config(), bridge.clone(), injector.clone());
        let pixel = ScriptLoader::new(MetaPixel::from_config(), bridge.clone(), injector);

        Self(Rc::new(ConsentOrchestrator::new(
            ConsentStore::new(BrowserStorage),
            bridge,
            tag_manager,
            pixel,
        )))
    }

    pub fn engine(&self) -> Rc<SiteConsent> {
        self.0.clone()
    }
}

impl PartialEq for ConsentHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for ConsentHandle {
    type Target = SiteConsent;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
