//! # Outbound Ports
//!
//! Where the verification key comes from.

use crate::domain::errors::KeyLoadError;
use crate::domain::keys::PublicKey;
use std::path::PathBuf;

/// Produces the verification key. Called at most once per verifier.
pub trait KeySource: Send + Sync {
    /// Load the key.
    fn load(&self) -> Result<PublicKey, KeyLoadError>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}

/// Reads the key from a file on disk.
#[derive(Debug, Clone)]
pub struct FileKeySource {
    path: PathBuf,
}

impl FileKeySource {
    /// Source backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl KeySource for FileKeySource {
    fn load(&self) -> Result<PublicKey, KeyLoadError> {
        PublicKey::from_file(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
