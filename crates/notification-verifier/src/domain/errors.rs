//! # Verifier Errors

use std::path::PathBuf;
use thiserror::Error;

/// The verification key could not be loaded.
#[derive(Debug, Error)]
pub enum KeyLoadError {
    /// The key file could not be read.
    #[error("Failed to read public key from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key material is not a supported RSA or Ed25519 public key.
    #[error("Invalid public key: {0}")]
    Format(String),
}

/// A signature did not verify.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature is not valid base64.
    #[error("Failed to decode signature: {0}")]
    Encoding(String),

    /// The decoded signature has the wrong length for the key.
    #[error("Invalid signature length: {0} bytes")]
    Length(usize),

    /// The signature does not match the payload under the loaded key.
    #[error("Signature verification failed")]
    Mismatch,
}
