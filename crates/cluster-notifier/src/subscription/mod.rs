//! # Subscription Loop
//!
//! Owns the long-lived subscription to the broadcast channel.
//!
//! ## State Machine
//!
//! ```text
//! Disconnected ──connect──► Connecting ──subscribe──► Subscribed
//!      ▲                        │                         │ recv → router (in order)
//!      │                        │ error                   │ error
//!      └──── sleep(backoff) ◄───┴─────────────────────────┘
//! ```
//!
//! One loop body handles every failure path. There is no retry limit and the
//! delay never grows.

pub mod policy;
pub mod runner;

pub use policy::ReconnectPolicy;
pub use runner::{LoopHandle, SubscriptionLoop};
