//! # Inbound Ports
//!
//! The authenticity gate consulted by the notification router.

use notification_types::Notification;

/// Decides whether a notification may be acted upon.
///
/// Implementations must be thread-safe and must never panic: anything that
/// cannot be positively established as authentic yields `false`.
pub trait AuthenticityGate: Send + Sync {
    /// `true` only when the notification passed one of the allowed paths.
    fn is_authentic(&self, notification: &Notification) -> bool;
}
