//! # Broadcast Subscriber Ports
//!
//! The three-step client interface consumers drive: connect, subscribe, receive.

use crate::errors::BusError;
use async_trait::async_trait;

/// Entry point to a bus backend.
#[async_trait]
pub trait BroadcastClient: Send + Sync {
    /// Session produced by a successful connect.
    type Session: BroadcastSession;

    /// Establish a fresh connection.
    async fn connect(&self) -> Result<Self::Session, BusError>;
}

/// A live connection that has not yet subscribed.
#[async_trait]
pub trait BroadcastSession: Send {
    /// Subscription produced by a successful subscribe.
    type Subscription: ChannelSubscription;

    /// Subscribe to a channel. Consumes the session.
    async fn subscribe(self, channel: &str) -> Result<Self::Subscription, BusError>;
}

/// An active subscription to exactly one channel.
#[async_trait]
pub trait ChannelSubscription: Send {
    /// Wait for the next message, in delivery order.
    ///
    /// # Errors
    ///
    /// Any error ends the subscription; callers must not call `recv` again.
    async fn recv(&mut self) -> Result<Vec<u8>, BusError>;
}
