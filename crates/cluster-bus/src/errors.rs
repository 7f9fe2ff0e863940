//! # Bus Errors

use thiserror::Error;

/// Transport failures. All of them are transient from the consumer's view:
/// the session is discarded and rebuilt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Could not establish a connection to the bus.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The bus refused or failed the subscription.
    #[error("Subscribe to '{channel}' failed: {reason}")]
    Subscribe {
        /// Channel that was requested.
        channel: String,
        /// Backend-specific cause.
        reason: String,
    },

    /// The connection or channel was closed underneath the subscriber.
    #[error("Channel closed")]
    Closed,

    /// Publishing a message failed.
    #[error("Publish failed: {0}")]
    Publish(String),
}
