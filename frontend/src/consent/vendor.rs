//! Access to the ambient globals third-party tag scripts expect to find on
//! `window`: the `dataLayer` queue, the `gtag` dispatcher and the `fbq` shim.

use js_sys::{Array, Function, Reflect};
use log::warn;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};

use super::error::VendorError;

/// Vendor globals as seen by the consent engine.
pub trait VendorBridge {
    /// Make sure `dataLayer` exists and `gtag` queues onto it if no real
    /// implementation is installed yet.
    fn ensure_gtag(&self);

    /// `gtag(...args)`
    fn gtag(&self, args: Vec<Value>);

    /// `dataLayer.push(entry)`, creating the queue if needed.
    fn push_data_layer(&self, entry: Value);

    /// Install the queueing `fbq` shim unless `fbq` already exists.
    fn ensure_fbq(&self);

    fn has_fbq(&self) -> bool;

    /// `fbq(...args)`
    fn fbq(&self, args: Vec<Value>) -> Result<(), VendorError>;
}

// Function bodies evaluated once, the same snippets the vendors publish.
const GTAG_FALLBACK: &str = "window.dataLayer = window.dataLayer || []; window.dataLayer.push(arguments);";

const FBQ_SHIM: &str = r#"
    if (window.fbq) return;
    var n = window.fbq = function () {
        n.callMethod ? n.callMethod.apply(n, arguments) : n.queue.push(arguments);
    };
    if (!window._fbq) window._fbq = n;
    n.push = n;
    n.loaded = false;
    n.version = '2.0';
    n.queue = [];
"#;

/// The real browser `window`.
pub struct WindowBridge;

impl WindowBridge {
    fn global(&self) -> JsValue {
        js_sys::global().into()
    }

    fn function(&self, name: &'static str) -> Option<Function> {
        Reflect::get(&self.global(), &JsValue::from_str(name))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
    }

    fn data_layer(&self) -> Result<Array, JsValue> {
        let global = self.global();
        let key = JsValue::from_str("dataLayer");
        let existing = Reflect::get(&global, &key)?;
        if let Ok(array) = existing.dyn_into::<Array>() {
            return Ok(array);
        }
        let array = Array::new();
        Reflect::set(&global, &key, &array)?;
        Ok(array)
    }

    fn call(&self, name: &'static str, args: Vec<Value>) -> Result<(), VendorError> {
        let function = self.function(name).ok_or(VendorError::Missing(name))?;
        let js_args = Array::new();
        for arg in args {
            js_args.push(&to_js(&arg)?);
        }
        function.apply(&JsValue::NULL, &js_args)?;
        Ok(())
    }
}

// Plain objects, not `Map`s, or the vendor scripts ignore the payload.
fn to_js(value: &Value) -> Result<JsValue, VendorError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| VendorError::Threw(e.to_string()))
}

impl VendorBridge for WindowBridge {
    fn ensure_gtag(&self) {
        if let Err(e) = self.data_layer() {
            warn!("[Consent] Could not create dataLayer: {}", super::error::describe_js(&e));
        }
        if self.function("gtag").is_some() {
            return;
        }
        let fallback = Function::new_no_args(GTAG_FALLBACK);
        if let Err(e) = Reflect::set(&self.global(), &JsValue::from_str("gtag"), &fallback) {
            warn!("[Consent] Could not install gtag fallback: {}", super::error::describe_js(&e));
        }
    }

    fn gtag(&self, args: Vec<Value>) {
        if let Err(e) = self.call("gtag", args) {
            warn!("[Consent] gtag call failed: {}", e);
        }
    }

    fn push_data_layer(&self, entry: Value) {
        let pushed = self
            .data_layer()
            .map_err(VendorError::from)
            .and_then(|layer| to_js(&entry).map(|js| layer.push(&js)));
        if let Err(e) = pushed {
            warn!("[GoogleTags] dataLayer push failed: {}", e);
        }
    }

    fn ensure_fbq(&self) {
        if self.has_fbq() {
            return;
        }
        if let Err(e) = Function::new_no_args(FBQ_SHIM).call0(&JsValue::NULL) {
            warn!("[MetaPixel] Could not install fbq shim: {}", super::error::describe_js(&e));
        }
    }

    fn has_fbq(&self) -> bool {
        self.function("fbq").is_some()
    }

    fn fbq(&self, args: Vec<Value>) -> Result<(), VendorError> {
        self.call("fbq", args)
    }
}
