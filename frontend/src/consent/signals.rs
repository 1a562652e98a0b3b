//! Google Consent Mode v2 projection of a consent decision.

use std::rc::Rc;

use log::info;
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::vendor::VendorBridge;
use super::ConsentDecision;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentSignal {
    Granted,
    Denied,
}

impl ConsentSignal {
    fn from_flag(granted: bool) -> Self {
        if granted {
            ConsentSignal::Granted
        } else {
            ConsentSignal::Denied
        }
    }
}

/// What a channel is gated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Always,
    Analytics,
    Marketing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SignalChannel {
    FunctionalityStorage,
    SecurityStorage,
    AnalyticsStorage,
    AdStorage,
    AdUserData,
    AdPersonalization,
    PersonalizationStorage,
}

impl SignalChannel {
    pub const ALL: [SignalChannel; 7] = [
        SignalChannel::FunctionalityStorage,
        SignalChannel::SecurityStorage,
        SignalChannel::AnalyticsStorage,
        SignalChannel::AdStorage,
        SignalChannel::AdUserData,
        SignalChannel::AdPersonalization,
        SignalChannel::PersonalizationStorage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalChannel::FunctionalityStorage => "functionality_storage",
            SignalChannel::SecurityStorage => "security_storage",
            SignalChannel::AnalyticsStorage => "analytics_storage",
            SignalChannel::AdStorage => "ad_storage",
            SignalChannel::AdUserData => "ad_user_data",
            SignalChannel::AdPersonalization => "ad_personalization",
            SignalChannel::PersonalizationStorage => "personalization_storage",
        }
    }

    fn gate(&self) -> Gate {
        match self {
            SignalChannel::FunctionalityStorage | SignalChannel::SecurityStorage => Gate::Always,
            SignalChannel::AnalyticsStorage => Gate::Analytics,
            SignalChannel::AdStorage
            | SignalChannel::AdUserData
            | SignalChannel::AdPersonalization
            | SignalChannel::PersonalizationStorage => Gate::Marketing,
        }
    }

    pub fn signal_for(&self, decision: ConsentDecision) -> ConsentSignal {
        ConsentSignal::from_flag(match self.gate() {
            Gate::Always => true,
            Gate::Analytics => decision.analytics,
            Gate::Marketing => decision.marketing,
        })
    }
}

/// The full seven-channel snapshot for a decision, as the `consent update`
/// payload object.
pub fn consent_update_payload(decision: ConsentDecision) -> Value {
    let mut payload = Map::new();
    for channel in SignalChannel::ALL {
        payload.insert(
            channel.as_str().to_string(),
            json!(channel.signal_for(decision)),
        );
    }
    Value::Object(payload)
}

/// Pushes consent decisions to the vendor consent-signal channel (`gtag`).
pub struct ConsentModeBridge {
    bridge: Rc<dyn VendorBridge>,
}

impl ConsentModeBridge {
    pub fn new(bridge: Rc<dyn VendorBridge>) -> Self {
        Self { bridge }
    }

    /// Install the queueing `gtag` fallback if the real one is missing, so no
    /// signal is dropped before Tag Manager attaches.
    pub fn ensure_signal_channel(&self) {
        self.bridge.ensure_gtag();
    }

    /// Dispatch all channels in a single `gtag('consent', 'update', ..)` call.
    pub fn update_signals(&self, decision: ConsentDecision) {
        self.ensure_signal_channel();

        let payload = consent_update_payload(decision);
        info!("[Consent] Google Consent Mode updated: {}", payload);
        self.bridge
            .gtag(vec![json!("consent"), json!("update"), payload]);
    }
}
