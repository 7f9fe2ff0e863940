//! # Broadcast Publisher
//!
//! Defines the publishing side of the bus and the in-memory backend.

use crate::errors::BusError;
use crate::subscriber::{BroadcastClient, BroadcastSession, ChannelSubscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::debug;

/// Trait for publishing raw messages on a named channel.
#[async_trait]
pub trait BroadcastPublisher: Send + Sync {
    /// Publish a message.
    ///
    /// # Returns
    ///
    /// The number of subscribers the backend reports as having received it.
    async fn publish(&self, channel: &str, payload: Vec<u8>) -> Result<usize, BusError>;
}

#[async_trait]
impl<T> BroadcastPublisher for Arc<T>
where
    T: BroadcastPublisher + ?Sized,
{
    async fn publish(&self, channel: &str, payload: Vec<u8>) -> Result<usize, BusError> {
        (**self).publish(channel, payload).await
    }
}

/// In-memory implementation of the broadcast bus.
///
/// Uses one `tokio::sync::broadcast` channel per channel name. Suitable for
/// single-process operation and tests; fleets use a networked backend.
pub struct InMemoryBroadcastBus {
    /// Broadcast sender per channel name.
    channels: RwLock<HashMap<String, broadcast::Sender<Vec<u8>>>>,

    /// Whether new connections are accepted.
    online: AtomicBool,

    /// Total messages published.
    messages_published: AtomicU64,

    /// Per-subscriber buffer.
    capacity: usize,
}

impl InMemoryBroadcastBus {
    /// Create a new bus with default capacity.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new bus with the given per-subscriber capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            channels: RwLock::new(HashMap::new()),
            online: AtomicBool::new(true),
            messages_published: AtomicU64::new(0),
            capacity,
        })
    }

    /// A client handle for consumers.
    #[must_use]
    pub fn client(self: &Arc<Self>) -> InMemoryClient {
        InMemoryClient {
            bus: Arc::clone(self),
        }
    }

    /// Accept or refuse new connections.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Close every open subscription.
    ///
    /// Subscribers still receive messages buffered before the cut, then
    /// observe [`BusError::Closed`].
    pub fn sever(&self) {
        if let Ok(mut channels) = self.channels.write() {
            let count = channels.len();
            channels.clear();
            debug!(channels = count, "All subscriptions severed");
        }
    }

    /// Active subscribers on a channel.
    #[must_use]
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .read()
            .ok()
            .and_then(|channels| channels.get(channel).map(broadcast::Sender::receiver_count))
            .unwrap_or(0)
    }

    /// Total messages published since creation.
    #[must_use]
    pub fn messages_published(&self) -> u64 {
        self.messages_published.load(Ordering::Relaxed)
    }

    fn attach(&self, channel: &str) -> Result<broadcast::Receiver<Vec<u8>>, BusError> {
        let mut channels = self.channels.write().map_err(|_| BusError::Subscribe {
            channel: channel.to_string(),
            reason: "channel registry poisoned".to_string(),
        })?;
        let sender = channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        Ok(sender.subscribe())
    }
}

#[async_trait]
impl BroadcastPublisher for InMemoryBroadcastBus {
    async fn publish(&self, channel: &str, payload: Vec<u8>) -> Result<usize, BusError> {
        self.messages_published.fetch_add(1, Ordering::Relaxed);

        let channels = self
            .channels
            .read()
            .map_err(|_| BusError::Publish("channel registry poisoned".to_string()))?;
        let Some(sender) = channels.get(channel) else {
            debug!(channel = channel, "Message dropped (no subscribers)");
            return Ok(0);
        };

        // A send error only means every receiver is gone.
        let receivers = sender.send(payload).unwrap_or(0);
        debug!(channel = channel, receivers = receivers, "Message published");
        Ok(receivers)
    }
}

/// Consumer-side handle to an [`InMemoryBroadcastBus`].
#[derive(Clone)]
pub struct InMemoryClient {
    bus: Arc<InMemoryBroadcastBus>,
}

/// Connected, not yet subscribed.
pub struct InMemorySession {
    bus: Arc<InMemoryBroadcastBus>,
}

/// Subscription to one in-memory channel.
pub struct InMemorySubscription {
    channel: String,
    receiver: broadcast::Receiver<Vec<u8>>,
}

#[async_trait]
impl BroadcastClient for InMemoryClient {
    type Session = InMemorySession;

    async fn connect(&self) -> Result<Self::Session, BusError> {
        if !self.bus.online.load(Ordering::SeqCst) {
            return Err(BusError::Connection("bus offline".to_string()));
        }
        Ok(InMemorySession {
            bus: Arc::clone(&self.bus),
        })
    }
}

#[async_trait]
impl BroadcastSession for InMemorySession {
    type Subscription = InMemorySubscription;

    async fn subscribe(self, channel: &str) -> Result<Self::Subscription, BusError> {
        let receiver = self.bus.attach(channel)?;
        debug!(channel = channel, "New subscription created");
        Ok(InMemorySubscription {
            channel: channel.to_string(),
            receiver,
        })
    }
}

#[async_trait]
impl ChannelSubscription for InMemorySubscription {
    async fn recv(&mut self) -> Result<Vec<u8>, BusError> {
        loop {
            match self.receiver.recv().await {
                Ok(payload) => return Ok(payload),
                Err(broadcast::error::RecvError::Closed) => return Err(BusError::Closed),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(
                        channel = %self.channel,
                        lagged = count,
                        "Subscriber lagged, some messages dropped"
                    );
                }
            }
        }
    }
}
