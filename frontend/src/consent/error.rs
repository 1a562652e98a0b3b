//! Error types for the consent engine.
//!
//! None of these cross the engine's public surface into the UI: the store
//! collapses them to "no consent", the orchestrator logs and swallows them.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors from the key/value storage backing the consent record.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is blocked (privacy mode, disabled cookies, no window)
    #[error("storage not available: {0}")]
    Unavailable(String),

    /// The browser refused a read
    #[error("storage read failed: {0}")]
    Read(String),

    /// The browser refused a write (quota, security error)
    #[error("storage write failed: {0}")]
    Write(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to fetch or inject a third-party script.
///
/// `Clone` because a single load outcome is shared by every caller of
/// the in-flight handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The script element fired `error` (network, blocker, CSP)
    #[error("failed to load script {0}")]
    Network(String),

    /// The script element could not be created or inserted
    #[error("failed to inject script: {0}")]
    Injection(String),
}

/// A call into a vendor global (`gtag`, `fbq`) failed or the global was missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VendorError {
    #[error("vendor function {0} is not defined")]
    Missing(&'static str),

    #[error("vendor call threw: {0}")]
    Threw(String),
}

pub(crate) fn describe_js(val: &JsValue) -> String {
    js_sys::JSON::stringify(val)
        .map(String::from)
        .unwrap_or_else(|_| format!("{:?}", val))
}

impl From<JsValue> for LoadError {
    fn from(val: JsValue) -> Self {
        LoadError::Injection(describe_js(&val))
    }
}

impl From<JsValue> for VendorError {
    fn from(val: JsValue) -> Self {
        VendorError::Threw(describe_js(&val))
    }
}
