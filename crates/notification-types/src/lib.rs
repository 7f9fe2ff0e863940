//! # Notification Types Crate
//!
//! The data model shared by every crate on the cluster-notification path.
//!
//! ## Design Principles
//!
//! - **Immutable after decode**: a [`Notification`] is read-only input to
//!   verification and routing and lives for one message-handling call.
//! - **Total command space**: decoding never fails on an unknown command; it
//!   becomes [`NotificationCommand::Other`] and routes to the reload reaction.
//! - **Opaque payload**: the payload structure belongs to downstream handlers.

pub mod command;
pub mod errors;
pub mod notification;

pub use command::NotificationCommand;
pub use errors::DecodeError;
pub use notification::Notification;

/// Well-known broadcast channel shared by all fleet members.
pub const DEFAULT_CHANNEL: &str = "tyk.cluster.notifications";
