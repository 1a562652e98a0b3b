//! Meta Pixel, loaded only with marketing consent.
//!
//! Revoking consent does not unload `fbevents.js`; the vendor offers no way
//! to do that. Revoke tells the pixel to stop and makes `track_event` drop
//! everything until consent is granted again.

use log::{debug, info, warn};
use serde_json::{json, Value};

use super::loader::{Loader, RevocableLoader, ScriptLoader, VendorScript};
use super::vendor::VendorBridge;
use crate::config;

pub struct MetaPixel {
    pixel_id: String,
}

impl MetaPixel {
    pub fn new(pixel_id: impl Into<String>) -> Self {
        Self {
            pixel_id: pixel_id.into(),
        }
    }

    pub fn from_config() -> Self {
        Self::new(config::get_meta_pixel_id())
    }
}

impl VendorScript for MetaPixel {
    const NAME: &'static str = "MetaPixel";

    fn src(&self) -> String {
        "https://connect.facebook.net/en_US/fbevents.js".to_string()
    }

    fn bootstrap(&self, bridge: &dyn VendorBridge) {
        bridge.ensure_fbq();
    }

    fn initialize(&self, bridge: &dyn VendorBridge) {
        let calls = [
            vec![json!("consent"), json!("grant")],
            vec![json!("init"), json!(self.pixel_id)],
            vec![json!("track"), json!("PageView")],
        ];
        for args in calls {
            if let Err(e) = bridge.fbq(args) {
                warn!("[MetaPixel] Initialization call failed: {}", e);
                return;
            }
        }
        info!("[MetaPixel] Pixel loaded and initialized");
    }
}

impl RevocableLoader for ScriptLoader<MetaPixel> {
    fn grant(&self) {
        if !self.is_loaded() || !self.state.is_revoked() {
            return;
        }
        match self.bridge.fbq(vec![json!("consent"), json!("grant")]) {
            Ok(()) => {
                self.state.set_revoked(false);
                info!("[MetaPixel] Consent re-granted");
            }
            Err(e) => warn!("[MetaPixel] Error granting consent: {}", e),
        }
    }

    fn revoke(&self) {
        if !self.is_loaded() || self.state.is_revoked() {
            return;
        }
        // Suppress tracking first; the vendor call is best effort.
        self.state.set_revoked(true);
        match self.bridge.fbq(vec![json!("consent"), json!("revoke")]) {
            Ok(()) => info!("[MetaPixel] Consent revoked"),
            Err(e) => warn!("[MetaPixel] Error revoking consent: {}", e),
        }
    }

    fn is_revoked(&self) -> bool {
        self.state.is_revoked()
    }
}

impl ScriptLoader<MetaPixel> {
    /// Send a pixel event. Silently dropped before load and while revoked.
    pub fn track_event(&self, event_name: &str, params: Option<Value>) {
        if !self.is_loaded() || self.is_revoked() {
            debug!(
                "[MetaPixel] Event not tracked ({:?}, revoked: {}): {}",
                self.phase(),
                self.is_revoked(),
                event_name
            );
            return;
        }

        let mut args = vec![json!("track"), json!(event_name)];
        if let Some(params) = params {
            args.push(params);
        }
        if let Err(e) = self.bridge.fbq(args) {
            warn!("[MetaPixel] Error tracking {}: {}", event_name, e);
        }
    }

    /// For client-side route changes.
    pub fn track_page_view(&self) {
        self.track_event("PageView", None);
    }
}
