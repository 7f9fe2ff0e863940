//! # Decode Errors

use thiserror::Error;

/// Failure to turn transport bytes into a [`crate::Notification`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not a JSON object with the expected field types.
    #[error("Malformed notification: {0}")]
    Malformed(#[from] serde_json::Error),
}
