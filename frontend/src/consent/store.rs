use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::Value;

use super::error::StorageError;
use super::{ConsentDecision, ConsentRecord};
use crate::config::{CONSENT_STORAGE_KEY, CONSENT_VERSION};

const PROBE_KEY: &str = "__consent_test__";

/// Minimal string key/value storage, shaped after `window.localStorage`.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`, looked up on every call since access can start
/// throwing at any point (storage cleared, permissions changed).
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(storage),
            Ok(None) => Err(StorageError::Unavailable("localStorage is null".to_string())),
            Err(e) => Err(StorageError::Unavailable(super::error::describe_js(&e))),
        }
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::Read(super::error::describe_js(&e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write(super::error::describe_js(&e)))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Write(super::error::describe_js(&e)))
    }
}

// Every field required; `necessary` is ignored on read and always reported true.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    analytics: bool,
    marketing: bool,
    version: u32,
    updated_at: DateTime<Utc>,
}

/// Versioned persistence of the consent record.
pub struct ConsentStore<S> {
    storage: S,
    key: &'static str,
}

impl<S: KeyValueStorage> ConsentStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: CONSENT_STORAGE_KEY,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Write-then-delete probe. Never fails.
    pub fn is_storage_available(&self) -> bool {
        self.storage
            .set_item(PROBE_KEY, "1")
            .and_then(|_| self.storage.remove_item(PROBE_KEY))
            .is_ok()
    }

    /// Load the stored record. Anything short of a complete record at the
    /// current version reads as "no decision yet".
    pub fn read(&self) -> Option<ConsentRecord> {
        if !self.is_storage_available() {
            warn!("[Consent] localStorage unavailable, falling back to in-memory consent");
            return None;
        }

        let raw = match self.storage.get_item(self.key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return None,
            Err(e) => {
                error!("[Consent] Error reading consent: {}", e);
                return None;
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                error!("[Consent] Error reading consent: {}", e);
                return None;
            }
        };

        if value.get("version").and_then(Value::as_u64) != Some(u64::from(CONSENT_VERSION)) {
            info!("[Consent] Version mismatch, treating as no consent");
            return None;
        }

        match serde_json::from_value::<StoredRecord>(value) {
            Ok(stored) => Some(ConsentRecord {
                necessary: true,
                analytics: stored.analytics,
                marketing: stored.marketing,
                version: stored.version,
                updated_at: stored.updated_at,
            }),
            Err(e) => {
                warn!("[Consent] Invalid consent data structure: {}", e);
                None
            }
        }
    }

    /// Persist a decision stamped with the current version and time.
    /// Returns false when it could not be saved; the decision still applies
    /// for this page view.
    pub fn write(&self, decision: ConsentDecision) -> bool {
        let record = ConsentRecord {
            necessary: true,
            analytics: decision.analytics,
            marketing: decision.marketing,
            version: CONSENT_VERSION,
            updated_at: Utc::now(),
        };

        if !self.is_storage_available() {
            warn!("[Consent] localStorage unavailable, consent will not persist");
            return false;
        }

        let result = serde_json::to_string(&record)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set_item(self.key, &json));

        match result {
            Ok(()) => true,
            Err(e) => {
                error!("[Consent] Error writing consent: {}", e);
                false
            }
        }
    }

    pub fn has_decision(&self) -> bool {
        self.read().is_some()
    }
}
