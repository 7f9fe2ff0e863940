//! # Cluster Notifier
//!
//! Keeps a node eventually consistent with its fleet by consuming the shared
//! cluster-notification channel.
//!
//! ## Flow
//!
//! ```text
//! broadcast channel ──► SubscriptionLoop ──► NotificationRouter
//!                        (reconnects forever)      │ decode
//!                                                  │ ignore list
//!                                                  │ AuthenticityGate
//!                                                  ▼
//!                                            HandlerTable
//!                                  ┌────────┬──────┴───────┬─────────┐
//!                                  ▼        ▼              ▼         ▼
//!                            config   zero-conf ...   DRL/TLS    reload
//! ```
//!
//! Data flows one way. Nothing is published back on the channel by the consumer;
//! [`Notifier`] is a separate publisher for peers that emit notifications.

#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod errors;
pub mod notifier;
pub mod router;
pub mod subscription;
pub mod telemetry;

pub use config::{NotifierConfig, PubSubConfig, SecurityConfig};
pub use errors::{ConfigError, NotifyError};
pub use notifier::Notifier;
pub use router::{
    HandlerTable, HandlerTableBuilder, MessageOutcome, NotificationHandler, NotificationRouter,
    ReloadHandler, Route, RouterStats, RouterStatsSnapshot,
};
pub use subscription::{LoopHandle, ReconnectPolicy, SubscriptionLoop};
