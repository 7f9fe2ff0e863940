//! # Notification Signer
//!
//! Publisher side of the scheme: Ed25519 over the raw payload bytes, base64 on
//! the wire. Deterministic, no RNG needed.

use crate::domain::keys::PublicKey;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ed25519_dalek::{Signer, SigningKey};
use notification_types::Notification;

/// Signs notification payloads.
pub struct NotificationSigner {
    signing_key: SigningKey,
}

impl NotificationSigner {
    /// Create from a secret seed (32 bytes).
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Matching verification key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from(self.signing_key.verifying_key())
    }

    /// Base64 signature over `payload`.
    pub fn sign(&self, payload: &str) -> String {
        STANDARD.encode(self.signing_key.sign(payload.as_bytes()).to_bytes())
    }

    /// Replace the notification's signature with one over its payload.
    pub fn sign_notification(&self, notification: Notification) -> Notification {
        let signature = self.sign(&notification.payload);
        notification.with_signature(signature)
    }
}

impl std::fmt::Debug for NotificationSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationSigner")
            .field("public_key", &hex::encode(self.signing_key.verifying_key().as_bytes()))
            .finish_non_exhaustive()
    }
}
