//! # Reaction Handlers
//!
//! The table mapping a command to the capability that reacts to it. Reactions
//! themselves (applying configuration, zero-conf, mini config, DRL and TLS
//! bookkeeping, reloading) live outside this crate.

use notification_types::NotificationCommand;
use std::collections::HashMap;
use std::sync::Arc;

/// Reacts to one command's payload. Fire-and-forget.
pub trait NotificationHandler: Send + Sync {
    /// Handle the raw payload string.
    fn handle(&self, payload: &str);
}

/// The generic reload reaction, used for every command without a handler.
pub trait ReloadHandler: Send + Sync {
    /// Reload.
    fn reload(&self);
}

impl<F> NotificationHandler for F
where
    F: Fn(&str) + Send + Sync,
{
    fn handle(&self, payload: &str) {
        self(payload);
    }
}

impl<F> ReloadHandler for F
where
    F: Fn() + Send + Sync,
{
    fn reload(&self) {
        self();
    }
}

/// Where a command goes.
pub enum Route<'a> {
    /// A registered handler.
    Handler(&'a dyn NotificationHandler),
    /// The reload reaction.
    Reload(&'a dyn ReloadHandler),
}

/// Command → handler table with a mandatory reload fallback.
///
/// Dispatch is total: every command resolves to exactly one route.
#[derive(Clone)]
pub struct HandlerTable {
    handlers: HashMap<NotificationCommand, Arc<dyn NotificationHandler>>,
    reload: Arc<dyn ReloadHandler>,
}

impl HandlerTable {
    /// Start a table whose fallback is `reload`.
    pub fn builder(reload: impl ReloadHandler + 'static) -> HandlerTableBuilder {
        HandlerTableBuilder {
            handlers: HashMap::new(),
            reload: Arc::new(reload),
        }
    }

    /// Resolve a command to its route.
    pub fn resolve(&self, command: &NotificationCommand) -> Route<'_> {
        match self.handlers.get(command) {
            Some(handler) => Route::Handler(handler.as_ref()),
            None => Route::Reload(self.reload.as_ref()),
        }
    }

    /// Whether a dedicated handler exists for `command`.
    pub fn is_registered(&self, command: &NotificationCommand) -> bool {
        self.handlers.contains_key(command)
    }

    /// Number of dedicated handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// `true` when only the reload fallback is installed.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Builder for [`HandlerTable`].
pub struct HandlerTableBuilder {
    handlers: HashMap<NotificationCommand, Arc<dyn NotificationHandler>>,
    reload: Arc<dyn ReloadHandler>,
}

impl HandlerTableBuilder {
    /// Register a handler for any command. Replaces an earlier registration.
    #[must_use]
    pub fn register(
        mut self,
        command: NotificationCommand,
        handler: impl NotificationHandler + 'static,
    ) -> Self {
        self.handlers.insert(command, Arc::new(handler));
        self
    }

    /// Apply a new node configuration.
    #[must_use]
    pub fn on_config_update(self, handler: impl NotificationHandler + 'static) -> Self {
        self.register(NotificationCommand::ConfigUpdate, handler)
    }

    /// Apply a dashboard zero-conf announcement.
    #[must_use]
    pub fn on_dashboard_zero_conf(self, handler: impl NotificationHandler + 'static) -> Self {
        self.register(NotificationCommand::DashboardZeroConf, handler)
    }

    /// Answer a dashboard request for the mini config.
    #[must_use]
    pub fn on_dashboard_config_request(self, handler: impl NotificationHandler + 'static) -> Self {
        self.register(NotificationCommand::DashboardConfigRequest, handler)
    }

    /// Record a peer's distributed rate limiter status.
    #[must_use]
    pub fn on_drl_status(self, handler: impl NotificationHandler + 'static) -> Self {
        self.register(NotificationCommand::GatewayDrlStatus, handler)
    }

    /// Record a peer's TLS certificate status.
    #[must_use]
    pub fn on_tls_status(self, handler: impl NotificationHandler + 'static) -> Self {
        self.register(NotificationCommand::GatewayTlsStatus, handler)
    }

    /// Finish the table.
    pub fn build(self) -> HandlerTable {
        HandlerTable {
            handlers: self.handlers,
            reload: self.reload,
        }
    }
}
