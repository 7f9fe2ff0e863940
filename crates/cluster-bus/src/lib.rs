//! # Cluster Bus - Broadcast Channel Transport
//!
//! The transport side of cluster notifications: a named publish/subscribe
//! channel shared by every node in the fleet.
//!
//! ## Session Model
//!
//! ```text
//! BroadcastClient::connect() ──► BroadcastSession
//!                                     │ subscribe(channel)   (consumes session)
//!                                     ▼
//!                              ChannelSubscription
//!                                     │ recv() ... recv()
//!                                     ▼
//!                                 BusError ──► caller reconnects from scratch
//! ```
//!
//! A session is never reused after a failure. Consumers build a new one per
//! connection attempt, so no stale subscription handle survives a reconnect.
//!
//! ## Backends
//!
//! - [`InMemoryBroadcastBus`]: `tokio::sync::broadcast` per channel, for
//!   single-process use and tests.
//! - `RedisBroadcastClient` (feature `redis`): one pub/sub connection per session.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod errors;
pub mod publisher;
pub mod subscriber;

#[cfg(feature = "redis")]
pub mod redis_backend;

pub use errors::BusError;
pub use publisher::{
    BroadcastPublisher, InMemoryBroadcastBus, InMemoryClient, InMemorySession, InMemorySubscription,
};
pub use subscriber::{BroadcastClient, BroadcastSession, ChannelSubscription};

#[cfg(feature = "redis")]
pub use redis_backend::RedisBroadcastClient;

/// Messages buffered per in-memory subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
