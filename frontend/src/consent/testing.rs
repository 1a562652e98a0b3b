//! In-memory stand-ins for the browser globals, used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{self, FutureExt};
use serde_json::Value;

use super::error::{LoadError, StorageError, VendorError};
use super::loader::{InjectFuture, ScriptInjector};
use super::store::KeyValueStorage;
use super::vendor::VendorBridge;

#[derive(Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
    blocked: bool,
}

impl MemoryStorage {
    /// Storage that rejects every access, like Safari private mode.
    pub fn blocked() -> Self {
        Self {
            blocked: true,
            ..Self::default()
        }
    }

    pub fn put(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.blocked {
            Err(StorageError::Unavailable("blocked".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.raw(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.put(key, value);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Records every vendor call instead of touching `window`.
#[derive(Default)]
pub struct RecordingBridge {
    gtag_installed: Cell<bool>,
    fbq_installed: Cell<bool>,
    gtag_calls: RefCell<Vec<Vec<Value>>>,
    fbq_calls: RefCell<Vec<Vec<Value>>>,
    data_layer: RefCell<Vec<Value>>,
}

impl RecordingBridge {
    pub fn gtag_installed(&self) -> bool {
        self.gtag_installed.get()
    }

    pub fn gtag_calls(&self) -> Vec<Vec<Value>> {
        self.gtag_calls.borrow().clone()
    }

    pub fn fbq_calls(&self) -> Vec<Vec<Value>> {
        self.fbq_calls.borrow().clone()
    }

    pub fn data_layer(&self) -> Vec<Value> {
        self.data_layer.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.gtag_calls.borrow_mut().clear();
        self.fbq_calls.borrow_mut().clear();
    }
}

impl VendorBridge for RecordingBridge {
    fn ensure_gtag(&self) {
        self.gtag_installed.set(true);
    }

    fn gtag(&self, args: Vec<Value>) {
        self.gtag_calls.borrow_mut().push(args);
    }

    fn push_data_layer(&self, entry: Value) {
        self.data_layer.borrow_mut().push(entry);
    }

    fn ensure_fbq(&self) {
        self.fbq_installed.set(true);
    }

    fn has_fbq(&self) -> bool {
        self.fbq_installed.get()
    }

    fn fbq(&self, args: Vec<Value>) -> Result<(), VendorError> {
        if !self.fbq_installed.get() {
            return Err(VendorError::Missing("fbq"));
        }
        self.fbq_calls.borrow_mut().push(args);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InjectMode {
    Succeed,
    Fail,
    Hold,
}

/// Script injector whose outcome the test controls.
pub struct FakeInjector {
    mode: Cell<InjectMode>,
    injected: RefCell<Vec<String>>,
    pending: RefCell<Vec<oneshot::Sender<Result<(), LoadError>>>>,
    watched: Option<Rc<RecordingBridge>>,
    layer_at_injection: RefCell<Vec<Vec<Value>>>,
}

impl FakeInjector {
    fn with_mode(mode: InjectMode) -> Self {
        Self {
            mode: Cell::new(mode),
            injected: RefCell::new(Vec::new()),
            pending: RefCell::new(Vec::new()),
            watched: None,
            layer_at_injection: RefCell::new(Vec::new()),
        }
    }

    /// Holding injector that snapshots `bridge`'s data layer on every
    /// injection, so tests can see what the script would find on arrival.
    pub fn watching(bridge: Rc<RecordingBridge>) -> Self {
        Self {
            watched: Some(bridge),
            ..Self::with_mode(InjectMode::Hold)
        }
    }

    pub fn layer_at_injection(&self) -> Vec<Vec<Value>> {
        self.layer_at_injection.borrow().clone()
    }

    pub fn succeeding() -> Self {
        Self::with_mode(InjectMode::Succeed)
    }

    pub fn failing() -> Self {
        Self::with_mode(InjectMode::Fail)
    }

    /// Injections stay pending until `complete_all`.
    pub fn holding() -> Self {
        Self::with_mode(InjectMode::Hold)
    }

    pub fn succeed_from_now_on(&self) {
        self.mode.set(InjectMode::Succeed);
    }

    pub fn injected(&self) -> Vec<String> {
        self.injected.borrow().clone()
    }

    pub fn complete_all(&self, outcome: Result<(), LoadError>) {
        for sender in self.pending.borrow_mut().drain(..) {
            let _ = sender.send(outcome.clone());
        }
    }
}

impl ScriptInjector for FakeInjector {
    fn inject(&self, src: &str) -> InjectFuture {
        self.injected.borrow_mut().push(src.to_string());
        if let Some(bridge) = &self.watched {
            self.layer_at_injection.borrow_mut().push(bridge.data_layer());
        }
        match self.mode.get() {
            InjectMode::Succeed => future::ready(Ok(())).boxed_local(),
            InjectMode::Fail => future::ready(Err(LoadError::Network(src.to_string()))).boxed_local(),
            InjectMode::Hold => {
                let (tx, rx) = oneshot::channel();
                self.pending.borrow_mut().push(tx);
                async move {
                    rx.await
                        .unwrap_or_else(|_| Err(LoadError::Network("dropped".to_string())))
                }
                .boxed_local()
            }
        }
    }
}
