//! Google Tag Manager, loaded only once analytics or marketing consent exists.

use chrono::Utc;
use log::{debug, info};
use serde_json::{json, Value};

use super::loader::{Loader, ScriptLoader, VendorScript};
use super::vendor::VendorBridge;
use crate::config;

pub struct TagManager {
    container_id: String,
}

impl TagManager {
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
        }
    }

    pub fn from_config() -> Self {
        Self::new(config::GTM_ID)
    }
}

impl VendorScript for TagManager {
    const NAME: &'static str = "GoogleTags";

    fn src(&self) -> String {
        format!("https://www.googletagmanager.com/gtm.js?id={}", self.container_id)
    }

    // gtm.js reads its start timestamp off the data layer.
    fn bootstrap(&self, bridge: &dyn VendorBridge) {
        bridge.push_data_layer(json!({
            "gtm.start": Utc::now().timestamp_millis(),
            "event": "gtm.js",
        }));
    }

    fn initialize(&self, _bridge: &dyn VendorBridge) {
        info!("[GoogleTags] GTM container {} ready", self.container_id);
    }
}

impl ScriptLoader<TagManager> {
    /// Queue an event for Tag Manager. Dropped unless GTM has loaded, so
    /// nothing collects on the page before consent.
    pub fn push_to_data_layer(&self, event: Value) {
        if !self.is_loaded() {
            debug!("[GoogleTags] Event not pushed (GTM not loaded): {}", event);
            return;
        }
        self.bridge.push_data_layer(event);
    }
}
