//! # Notification Verifier Service
//!
//! Implements [`AuthenticityGate`] on top of the domain layer.
//!
//! ## Key Lifecycle
//!
//! ```text
//!            ensure_loaded()            ┌─► Loaded(key)   (frozen)
//! (unset) ────────────────────► load ───┤
//!    │                                  └─► Failed        (frozen, fail-closed)
//!    └── no key source ──────────────────► Unloaded       (frozen, fail-closed)
//! ```
//!
//! The state is written exactly once. Concurrent callers block on the first
//! load and then observe the same result, so a failed load stays failed even
//! if the key file is fixed later.

use crate::domain::errors::SignatureError;
use crate::domain::keys::PublicKey;
use crate::ports::inbound::AuthenticityGate;
use crate::ports::outbound::{FileKeySource, KeySource};
use notification_types::Notification;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use tracing::{debug, error, info, warn};

/// Inputs owned by the node configuration.
#[derive(Debug, Clone, Default)]
pub struct VerifierConfig {
    /// Accept unsigned notifications.
    pub allow_insecure_configs: bool,
    /// Verification key location.
    pub public_key_path: Option<PathBuf>,
}

/// Memoised outcome of the key load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyState {
    /// No key configured.
    Unloaded,
    /// Key loaded and usable.
    Loaded(PublicKey),
    /// Key configured but failed to load.
    Failed,
}

/// Why a notification was judged not authentic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No key configured and insecure mode not allowed.
    NoKey,
    /// The configured key failed to load.
    KeyUnavailable,
    /// The signature did not verify.
    BadSignature(SignatureError),
}

/// Result of assessing one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Gateway-to-gateway status signal, not checked.
    GatewayPeer,
    /// Unsigned, accepted because insecure configs are allowed.
    InsecureAllowed,
    /// Signature verified against the loaded key.
    Verified,
    /// Not authentic.
    Rejected(Rejection),
}

impl Verdict {
    /// Only the three explicit acceptance paths are authentic.
    pub fn is_authentic(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// The authenticity gate.
pub struct NotificationVerifier {
    allow_insecure: bool,
    key_source: Option<Box<dyn KeySource>>,
    key: OnceLock<KeyState>,
    warned_insecure: AtomicBool,
}

impl NotificationVerifier {
    /// Build from configuration. A configured path becomes a [`FileKeySource`].
    pub fn new(config: VerifierConfig) -> Self {
        let key_source = config
            .public_key_path
            .map(|path| Box::new(FileKeySource::new(path)) as Box<dyn KeySource>);
        Self::build(config.allow_insecure_configs, key_source)
    }

    /// Build with a custom key source.
    pub fn with_key_source(allow_insecure: bool, source: impl KeySource + 'static) -> Self {
        Self::build(allow_insecure, Some(Box::new(source)))
    }

    fn build(allow_insecure: bool, key_source: Option<Box<dyn KeySource>>) -> Self {
        Self {
            allow_insecure,
            key_source,
            key: OnceLock::new(),
            warned_insecure: AtomicBool::new(false),
        }
    }

    /// Load the key on first call; later calls return the frozen state.
    pub fn ensure_loaded(&self) -> &KeyState {
        self.key.get_or_init(|| {
            let Some(source) = self.key_source.as_ref() else {
                debug!(prefix = "pub-sub", "No notification verification key configured");
                return KeyState::Unloaded;
            };

            match source.load() {
                Ok(key) => {
                    info!(
                        prefix = "pub-sub",
                        source = %source.describe(),
                        algorithm = key.algorithm(),
                        "Notification verification key loaded"
                    );
                    KeyState::Loaded(key)
                }
                Err(e) => {
                    error!(
                        prefix = "pub-sub",
                        source = %source.describe(),
                        error = %e,
                        "Notification signer: failed loading public key, signed notifications will be rejected"
                    );
                    KeyState::Failed
                }
            }
        })
    }

    /// Current key state without triggering a load.
    pub fn key_state(&self) -> Option<&KeyState> {
        self.key.get()
    }

    /// Whether the insecure-mode warning has been emitted.
    pub fn has_warned_insecure(&self) -> bool {
        self.warned_insecure.load(Ordering::Relaxed)
    }

    /// Walk the authenticity paths for one notification.
    pub fn assess(&self, notification: &Notification) -> Verdict {
        if notification.command.is_gateway_status() {
            return Verdict::GatewayPeer;
        }

        if !notification.is_signed() && self.allow_insecure {
            if !self.warned_insecure.swap(true, Ordering::Relaxed) {
                warn!(prefix = "pub-sub", "Insecure configuration detected (allowing)!");
            }
            return Verdict::InsecureAllowed;
        }

        match self.ensure_loaded() {
            KeyState::Loaded(key) => {
                match key.verify(notification.payload.as_bytes(), &notification.signature) {
                    Ok(()) => Verdict::Verified,
                    Err(e) => {
                        error!(
                            prefix = "pub-sub",
                            command = %notification.command,
                            error = %e,
                            "Could not verify notification"
                        );
                        Verdict::Rejected(Rejection::BadSignature(e))
                    }
                }
            }
            KeyState::Failed => Verdict::Rejected(Rejection::KeyUnavailable),
            KeyState::Unloaded => Verdict::Rejected(Rejection::NoKey),
        }
    }
}

impl AuthenticityGate for NotificationVerifier {
    fn is_authentic(&self, notification: &Notification) -> bool {
        self.assess(notification).is_authentic()
    }
}

impl std::fmt::Debug for NotificationVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationVerifier")
            .field("allow_insecure", &self.allow_insecure)
            .field("key", &self.key.get())
            .finish_non_exhaustive()
    }
}
