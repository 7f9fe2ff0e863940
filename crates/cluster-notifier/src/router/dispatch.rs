//! # Dispatch
//!
//! The per-message pipeline. Every failure is absorbed here; nothing a
//! publisher sends can make [`NotificationRouter::on_message`] fail or panic.

use crate::router::handlers::{HandlerTable, Route};
use crate::router::stats::{RouterStats, RouterStatsSnapshot};
use notification_types::{Notification, NotificationCommand};
use notification_verifier::AuthenticityGate;
use std::sync::Arc;
use tracing::{debug, error, info};

/// What happened to one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Bytes did not decode.
    Malformed,
    /// Command is on the ignore list.
    Ignored(NotificationCommand),
    /// Failed the authenticity gate.
    Rejected(NotificationCommand),
    /// Handed to the command's handler.
    Dispatched(NotificationCommand),
    /// Handed to the reload reaction.
    Reloaded(NotificationCommand),
}

/// Decodes, filters, authenticates and dispatches notifications.
pub struct NotificationRouter {
    gate: Arc<dyn AuthenticityGate>,
    handlers: HandlerTable,
    stats: RouterStats,
}

impl NotificationRouter {
    /// Create a router.
    pub fn new(gate: Arc<dyn AuthenticityGate>, handlers: HandlerTable) -> Self {
        Self {
            gate,
            handlers,
            stats: RouterStats::default(),
        }
    }

    /// Handle one transport message.
    ///
    /// Invokes at most one handler, synchronously, and does not inspect its
    /// outcome. The return value is informational only.
    pub fn on_message(&self, raw: &[u8]) -> MessageOutcome {
        self.stats.record_received();

        let notification = match Notification::decode(raw) {
            Ok(notification) => notification,
            Err(e) => {
                error!(
                    prefix = "pub-sub",
                    error = %e,
                    bytes = raw.len(),
                    "Unmarshalling message body failed, malformed"
                );
                self.stats.record_malformed();
                return MessageOutcome::Malformed;
            }
        };

        if notification.command.is_ignored() {
            debug!(prefix = "pub-sub", command = %notification.command, "Ignoring notification");
            self.stats.record_ignored();
            return MessageOutcome::Ignored(notification.command);
        }

        if !self.gate.is_authentic(&notification) {
            error!(
                prefix = "pub-sub",
                command = %notification.command,
                "Payload signature is invalid!"
            );
            self.stats.record_rejected();
            return MessageOutcome::Rejected(notification.command);
        }

        match self.handlers.resolve(&notification.command) {
            Route::Handler(handler) => {
                debug!(prefix = "pub-sub", command = %notification.command, "Dispatching notification");
                handler.handle(&notification.payload);
                self.stats.record_dispatched();
                MessageOutcome::Dispatched(notification.command)
            }
            Route::Reload(reload) => {
                info!(prefix = "pub-sub", command = %notification.command, "Reloading endpoints");
                reload.reload();
                self.stats.record_reload();
                MessageOutcome::Reloaded(notification.command)
            }
        }
    }

    /// Message counters.
    pub fn stats(&self) -> RouterStatsSnapshot {
        self.stats.snapshot()
    }
}
