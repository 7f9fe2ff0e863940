//! # Errors
//!
//! Failures that can reach a caller. Message-level problems (malformed bytes,
//! failed authenticity) never do; they are logged and dropped by the router.

use cluster_bus::BusError;
use notification_types::DecodeError;
use thiserror::Error;

/// Invalid configuration input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment value could not be parsed.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    /// The channel name is empty.
    #[error("Pub/sub channel name must not be empty")]
    EmptyChannel,

    /// A zero backoff would spin on a dead bus.
    #[error("Reconnect backoff must be greater than zero")]
    ZeroBackoff,
}

/// Publishing a notification failed.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The notification could not be serialized.
    #[error("Encoding notification failed: {0}")]
    Encode(#[from] DecodeError),

    /// The bus rejected the message.
    #[error(transparent)]
    Bus(#[from] BusError),
}
