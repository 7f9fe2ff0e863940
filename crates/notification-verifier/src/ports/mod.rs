//! # Ports Layer
//!
//! - **Inbound**: the gate the router asks
//! - **Outbound**: where the verification key comes from

pub mod inbound;
pub mod outbound;
