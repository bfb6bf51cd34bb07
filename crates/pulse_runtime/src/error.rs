//! Runtime error types.

/// Errors surfaced by the message bus.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// A subscribed handler failed. Delivery stopped at this handler; the
    /// error reaches the publisher.
    #[error("handler for message kind \"{kind}\" failed: {source}")]
    Handler {
        /// The message kind being delivered.
        kind: String,
        /// The handler's failure.
        #[source]
        source: anyhow::Error,
    },
}
