//! # Notification Router
//!
//! Turns one transport message into at most one handler invocation.
//!
//! ## Steps (per message)
//!
//! 1. Decode. Malformed bytes are logged and dropped.
//! 2. Drop commands on the ignore list silently.
//! 3. Ask the [`AuthenticityGate`](notification_verifier::AuthenticityGate).
//!    Not authentic: log and drop, never retry.
//! 4. Dispatch through the [`HandlerTable`]. Unknown commands reload.

pub mod dispatch;
pub mod handlers;
pub mod stats;

pub use dispatch::{MessageOutcome, NotificationRouter};
pub use handlers::{HandlerTable, HandlerTableBuilder, NotificationHandler, ReloadHandler, Route};
pub use stats::{RouterStats, RouterStatsSnapshot};
