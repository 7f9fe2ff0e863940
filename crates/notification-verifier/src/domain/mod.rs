//! # Domain Layer
//!
//! Key material and signature checks.

pub mod errors;
pub mod keys;
pub mod signer;
