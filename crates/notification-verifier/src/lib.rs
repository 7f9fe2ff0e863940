//! # Notification Verifier
//!
//! Decides, per notification, whether it is authentic enough to act upon.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): key parsing, signing and signature checks, no I/O
//!   beyond reading a key file
//! - **Ports Layer** (`ports/`): the gate consumed by the router, the key source
//!   consumed by the verifier
//! - **Service Layer** (`service.rs`): the authenticity policy and the
//!   load-once key state
//!
//! ## Authenticity Paths
//!
//! ```text
//! gateway status command ─────────────────────────────► authentic
//! no signature + insecure configs allowed ────────────► authentic (warn once)
//! key loaded + signature verifies ────────────────────► authentic
//! anything else ──────────────────────────────────────► NOT authentic
//! ```
//!
//! ## Security Notes
//!
//! - **Fail-closed**: every branch without an explicit "yes" resolves to "no"
//! - **Pinned key failure**: a key that fails to load is never retried; all signed
//!   traffic is rejected until restart

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::errors::{KeyLoadError, SignatureError};
pub use domain::keys::PublicKey;
pub use domain::signer::NotificationSigner;
pub use ports::inbound::AuthenticityGate;
pub use ports::outbound::{FileKeySource, KeySource};
pub use service::{KeyState, NotificationVerifier, Rejection, Verdict, VerifierConfig};
