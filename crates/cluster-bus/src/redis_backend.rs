//! # Redis Backend
//!
//! Redis pub/sub implementation of the bus ports. Each connect opens a
//! dedicated pub/sub connection; the message stream ends when Redis drops it.

use crate::errors::BusError;
use crate::subscriber::{BroadcastClient, BroadcastSession, ChannelSubscription};
use async_trait::async_trait;
use std::pin::Pin;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

type MessageStream = Pin<Box<dyn Stream<Item = redis::Msg> + Send>>;

/// Consumer-side Redis client.
#[derive(Clone)]
pub struct RedisBroadcastClient {
    client: redis::Client,
}

impl RedisBroadcastClient {
    /// Parse the connection URL. Does not connect.
    pub fn open(url: &str) -> Result<Self, BusError> {
        let client = redis::Client::open(url).map_err(|e| BusError::Connection(e.to_string()))?;
        Ok(Self { client })
    }
}

/// A dedicated pub/sub connection.
pub struct RedisSession {
    pubsub: redis::aio::PubSub,
}

/// Message stream of one subscribed channel.
pub struct RedisSubscription {
    channel: String,
    messages: MessageStream,
}

#[async_trait]
impl BroadcastClient for RedisBroadcastClient {
    type Session = RedisSession;

    async fn connect(&self) -> Result<Self::Session, BusError> {
        let pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| BusError::Connection(e.to_string()))?;
        Ok(RedisSession { pubsub })
    }
}

#[async_trait]
impl BroadcastSession for RedisSession {
    type Subscription = RedisSubscription;

    async fn subscribe(mut self, channel: &str) -> Result<Self::Subscription, BusError> {
        self.pubsub
            .subscribe(channel)
            .await
            .map_err(|e| BusError::Subscribe {
                channel: channel.to_string(),
                reason: e.to_string(),
            })?;
        debug!(channel = channel, "Subscribed to Redis channel");

        Ok(RedisSubscription {
            channel: channel.to_string(),
            messages: Box::pin(self.pubsub.into_on_message()),
        })
    }
}

#[async_trait]
impl ChannelSubscription for RedisSubscription {
    async fn recv(&mut self) -> Result<Vec<u8>, BusError> {
        match self.messages.next().await {
            Some(msg) => Ok(msg.get_payload_bytes().to_vec()),
            None => {
                debug!(channel = %self.channel, "Redis message stream ended");
                Err(BusError::Closed)
            }
        }
    }
}
