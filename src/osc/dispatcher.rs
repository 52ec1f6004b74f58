//! Typed dispatcher - routes inbound OSC messages to registered handlers
//!
//! Each registration pairs a concrete address with the `ValueKind` the handler
//! expects. On arrival the first argument is decoded once against that kind and
//! the handler receives an already-narrowed `DecodedValue`. Registrations are
//! not deduplicated: registering twice fires twice.

use parking_lot::RwLock;
use rosc::OscMessage;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

use super::{DecodedValue, ValueKind};
use crate::error::{Result, SurfaceError};

/// Callback invoked with a decoded value
pub type Handler = Arc<dyn Fn(DecodedValue) + Send + Sync>;

struct Listener {
    kind: ValueKind,
    handler: Handler,
}

/// Inbound registration capability shared by every mirrored entity
#[derive(Default)]
pub struct Dispatcher {
    listeners: RwLock<HashMap<String, Vec<Listener>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for messages at `address` carrying a `kind` value
    pub fn register(&self, address: impl Into<String>, kind: ValueKind, handler: Handler) {
        let address = address.into();
        trace!(address = %address, kind = %kind, "Registering listener");
        self.listeners
            .write()
            .entry(address)
            .or_default()
            .push(Listener { kind, handler });
    }

    pub fn on_number<F>(&self, address: impl Into<String>, f: F)
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.register(
            address,
            ValueKind::Number,
            Arc::new(move |value| {
                if let Some(n) = value.as_number() {
                    f(n)
                }
            }),
        );
    }

    pub fn on_text<F>(&self, address: impl Into<String>, f: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.register(
            address,
            ValueKind::Text,
            Arc::new(move |value| {
                if let DecodedValue::Text(s) = value {
                    f(s)
                }
            }),
        );
    }

    pub fn on_bool<F>(&self, address: impl Into<String>, f: F)
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.register(
            address,
            ValueKind::Boolean,
            Arc::new(move |value| {
                if let Some(b) = value.as_bool() {
                    f(b)
                }
            }),
        );
    }

    /// Deliver one message to every listener on its address, in registration order.
    ///
    /// Returns how many handlers ran. The first listener whose expected kind
    /// does not match the argument stops delivery with `TypeMismatch`.
    pub fn dispatch(&self, msg: &OscMessage) -> Result<usize> {
        // Snapshot handlers so none run under the lock
        let targets: Vec<(ValueKind, Handler)> = match self.listeners.read().get(&msg.addr) {
            Some(listeners) => listeners
                .iter()
                .map(|l| (l.kind, Arc::clone(&l.handler)))
                .collect(),
            None => {
                trace!(address = %msg.addr, "No listener for address");
                return Ok(0);
            }
        };

        let first = msg.args.first();
        let mut fired = 0;
        for (kind, handler) in targets {
            let value = DecodedValue::decode(kind, first).map_err(|actual| {
                SurfaceError::TypeMismatch {
                    address: msg.addr.clone(),
                    expected: kind,
                    actual,
                }
            })?;
            handler(value);
            fired += 1;
        }

        Ok(fired)
    }

    /// Number of listeners registered at `address`
    pub fn listener_count(&self, address: &str) -> usize {
        self.listeners.read().get(address).map_or(0, Vec::len)
    }

    /// Drop every registration
    pub fn clear(&self) {
        self.listeners.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use rosc::OscType;

    fn msg(addr: &str, args: Vec<OscType>) -> OscMessage {
        OscMessage {
            addr: addr.to_string(),
            args,
        }
    }

    #[test]
    fn test_dispatch_table() {
        let dispatcher = Dispatcher::new();
        let seen: Arc<Mutex<Vec<DecodedValue>>> = Arc::new(Mutex::new(Vec::new()));

        for (addr, kind) in [
            ("/bool", ValueKind::Boolean),
            ("/num", ValueKind::Number),
            ("/text", ValueKind::Text),
        ] {
            let seen = Arc::clone(&seen);
            dispatcher.register(addr, kind, Arc::new(move |v| seen.lock().push(v)));
        }

        dispatcher.dispatch(&msg("/bool", vec![OscType::Int(0)])).unwrap();
        dispatcher.dispatch(&msg("/bool", vec![OscType::Int(5)])).unwrap();
        dispatcher.dispatch(&msg("/num", vec![OscType::Double(3.2)])).unwrap();
        dispatcher
            .dispatch(&msg("/text", vec![OscType::String("Kick".into())]))
            .unwrap();

        assert_eq!(
            *seen.lock(),
            vec![
                DecodedValue::Bool(false),
                DecodedValue::Bool(true),
                DecodedValue::Number(3.2),
                DecodedValue::Text("Kick".to_string()),
            ]
        );
    }

    #[test]
    fn test_type_mismatch() {
        let dispatcher = Dispatcher::new();
        dispatcher.on_number("/track/1/volume", |_| panic!("must not fire"));

        let err = dispatcher
            .dispatch(&msg("/track/1/volume", vec![OscType::String("x".into())]))
            .unwrap_err();

        match err {
            SurfaceError::TypeMismatch {
                address,
                expected,
                actual,
            } => {
                assert_eq!(address, "/track/1/volume");
                assert_eq!(expected, ValueKind::Number);
                assert_eq!(actual, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_args_is_mismatch() {
        let dispatcher = Dispatcher::new();
        dispatcher.on_bool("/play", |_| {});

        assert!(matches!(
            dispatcher.dispatch(&msg("/play", vec![])),
            Err(SurfaceError::TypeMismatch { actual: "nothing", .. })
        ));
    }

    #[test]
    fn test_duplicate_registration_fires_twice() {
        let dispatcher = Dispatcher::new();
        let count = Arc::new(Mutex::new(0));

        for _ in 0..2 {
            let count = Arc::clone(&count);
            dispatcher.on_bool("/click", move |_| *count.lock() += 1);
        }

        assert_eq!(dispatcher.listener_count("/click"), 2);
        let fired = dispatcher.dispatch(&msg("/click", vec![OscType::Int(1)])).unwrap();
        assert_eq!(fired, 2);
        assert_eq!(*count.lock(), 2);
    }

    #[test]
    fn test_unregistered_address_is_ignored() {
        let dispatcher = Dispatcher::new();
        let fired = dispatcher
            .dispatch(&msg("/track/9/volume", vec![OscType::Float(0.5)]))
            .unwrap();
        assert_eq!(fired, 0);
    }

    #[test]
    fn test_clear() {
        let dispatcher = Dispatcher::new();
        dispatcher.on_text("/track/1/name", |_| {});
        dispatcher.clear();
        assert_eq!(dispatcher.listener_count("/track/1/name"), 0);
    }
}
