//! Synchronous publish/subscribe messaging.
//!
//! Messages are in-process only: a kind tag plus an optional opaque
//! payload, delivered immediately to every subscribed handler. There is no
//! queueing, persistence, or wire format.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::BusError;

/// An in-process message.
///
/// The payload is opaque to the bus; handlers read it back with
/// [`Message::payload`], naming the type at the call site.
#[derive(Clone)]
pub struct Message {
    kind: String,
    payload: Option<Arc<dyn Any + Send + Sync>>,
}

impl Message {
    /// A message with no payload.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    /// A message carrying a payload.
    #[must_use]
    pub fn with_payload(kind: impl Into<String>, payload: impl Any + Send + Sync) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(Arc::new(payload)),
        }
    }

    /// The message kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The payload downcast to `T`, if one of that type was attached.
    #[must_use]
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload
            .as_deref()
            .and_then(|payload| payload.downcast_ref::<T>())
    }
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Message")
            .field("kind", &self.kind)
            .field("has_payload", &self.payload.is_some())
            .finish()
    }
}

/// Signature of a subscribed message handler.
pub type HandlerFn = Box<dyn FnMut(&Message) -> anyhow::Result<()> + Send>;

/// Synchronous publish/subscribe channel keyed by message kind.
///
/// Handlers for a kind run in subscription order on every publish. Unlike
/// system updates, handler failures are not isolated: the first `Err`
/// aborts delivery and reaches the publisher.
#[derive(Default)]
pub struct MessageBus {
    handlers: HashMap<String, Vec<HandlerFn>>,
}

impl MessageBus {
    /// Create a bus with no subscriptions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Append a handler for `kind`.
    ///
    /// Every handler subscribed to a kind is invoked on every publish of
    /// that kind, in subscription order.
    pub fn subscribe(
        &mut self,
        kind: impl Into<String>,
        handler: impl FnMut(&Message) -> anyhow::Result<()> + Send + 'static,
    ) {
        self.handlers
            .entry(kind.into())
            .or_default()
            .push(Box::new(handler));
    }

    /// Deliver a message to every handler subscribed to its kind,
    /// synchronously and in subscription order.
    ///
    /// With no subscribers the message is dropped with a diagnostic; that
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Handler`] when a handler fails. Handlers later
    /// in the list are not invoked for this publish.
    pub fn publish(&mut self, message: &Message) -> Result<(), BusError> {
        match self.handlers.get_mut(message.kind()) {
            Some(handlers) => {
                for handler in handlers {
                    handler(message).map_err(|source| BusError::Handler {
                        kind: message.kind().to_string(),
                        source,
                    })?;
                }
                Ok(())
            }
            None => {
                debug!(kind = message.kind(), "message dropped, no subscribers");
                Ok(())
            }
        }
    }

    /// Returns the number of handlers subscribed to `kind`.
    #[must_use]
    pub fn subscriber_count(&self, kind: &str) -> usize {
        self.handlers.get(kind).map_or(0, Vec::len)
    }

    /// Returns `true` if at least one handler is subscribed to `kind`.
    #[must_use]
    pub fn has_subscribers(&self, kind: &str) -> bool {
        self.subscriber_count(kind) > 0
    }
}

impl std::fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<(&str, usize)> = self
            .handlers
            .iter()
            .map(|(kind, handlers)| (kind.as_str(), handlers.len()))
            .collect();
        kinds.sort_unstable();
        f.debug_struct("MessageBus").field("handlers", &kinds).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_publish_invokes_handlers_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = MessageBus::new();
        for tag in ["first", "second", "third"] {
            let seen = seen.clone();
            bus.subscribe("tick", move |_| {
                seen.lock().unwrap().push(tag);
                Ok(())
            });
        }
        bus.publish(&Message::new("tick")).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_publish_delivers_once_per_call() {
        let count = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let c = count.clone();
        let mut bus = MessageBus::new();
        bus.subscribe("ping", move |_| {
            c.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        });
        bus.publish(&Message::new("ping")).unwrap();
        bus.publish(&Message::new("ping")).unwrap();
        assert_eq!(count.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn test_publish_without_subscribers_is_not_an_error() {
        let mut bus = MessageBus::new();
        bus.publish(&Message::new("nobody-home")).unwrap();
    }

    #[test]
    fn test_handlers_only_receive_their_kind() {
        let count = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let c = count.clone();
        let mut bus = MessageBus::new();
        bus.subscribe("a", move |_| {
            c.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        });
        bus.publish(&Message::new("b")).unwrap();
        assert_eq!(count.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn test_payload_downcast() {
        #[derive(Debug, PartialEq)]
        struct Damage {
            amount: f32,
        }

        let seen = Arc::new(Mutex::new(None));
        let s = seen.clone();
        let mut bus = MessageBus::new();
        bus.subscribe("hit", move |message| {
            *s.lock().unwrap() = message.payload::<Damage>().map(|d| d.amount);
            Ok(())
        });
        bus.publish(&Message::with_payload("hit", Damage { amount: 12.5 }))
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(12.5));
    }

    #[test]
    fn test_payload_wrong_type_is_none() {
        let message = Message::with_payload("hit", 7u32);
        assert!(message.payload::<String>().is_none());
        assert_eq!(message.payload::<u32>(), Some(&7));
    }

    #[test]
    fn test_handler_failure_reaches_publisher_and_stops_delivery() {
        let later_ran = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = later_ran.clone();
        let mut bus = MessageBus::new();
        bus.subscribe("explode", |_| anyhow::bail!("handler broke"));
        bus.subscribe("explode", move |_| {
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        });
        let err = bus.publish(&Message::new("explode")).unwrap_err();
        assert!(matches!(err, BusError::Handler { kind, .. } if kind == "explode"));
        assert!(!later_ran.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_subscriber_count() {
        let mut bus = MessageBus::new();
        assert!(!bus.has_subscribers("tick"));
        bus.subscribe("tick", |_| Ok(()));
        bus.subscribe("tick", |_| Ok(()));
        assert_eq!(bus.subscriber_count("tick"), 2);
        assert!(bus.has_subscribers("tick"));
    }
}
