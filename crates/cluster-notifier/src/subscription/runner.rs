//! # Subscription Runner
//!
//! Drives the session cycle: connect, subscribe, pump, back off, repeat.

use crate::router::NotificationRouter;
use crate::subscription::policy::ReconnectPolicy;
use cluster_bus::{BroadcastClient, BroadcastSession, BusError, ChannelSubscription};
use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[derive(Debug, Default)]
struct LoopStats {
    attempts: AtomicU64,
    failures: AtomicU64,
    subscriptions: AtomicU64,
    messages: AtomicU64,
}

/// Read-only view of a running loop.
#[derive(Debug, Clone)]
pub struct LoopHandle {
    stats: Arc<LoopStats>,
}

impl LoopHandle {
    /// Sessions started (connect attempts).
    pub fn attempts(&self) -> u64 {
        self.stats.attempts.load(Ordering::Relaxed)
    }

    /// Sessions that ended in an error.
    pub fn failures(&self) -> u64 {
        self.stats.failures.load(Ordering::Relaxed)
    }

    /// Sessions that reached the subscribed state.
    pub fn subscriptions(&self) -> u64 {
        self.stats.subscriptions.load(Ordering::Relaxed)
    }

    /// Messages handed to the router.
    pub fn messages(&self) -> u64 {
        self.stats.messages.load(Ordering::Relaxed)
    }
}

/// Background consumer of one broadcast channel.
///
/// Messages are handled one at a time, in delivery order, on the loop's own
/// task. Session state is rebuilt from scratch on every attempt.
pub struct SubscriptionLoop<C> {
    client: C,
    channel: String,
    router: Arc<NotificationRouter>,
    policy: ReconnectPolicy,
    stats: Arc<LoopStats>,
}

impl<C> SubscriptionLoop<C>
where
    C: BroadcastClient + 'static,
{
    /// Create a loop with the default reconnect policy.
    pub fn new(client: C, channel: impl Into<String>, router: Arc<NotificationRouter>) -> Self {
        Self {
            client,
            channel: channel.into(),
            router,
            policy: ReconnectPolicy::default(),
            stats: Arc::new(LoopStats::default()),
        }
    }

    /// Override the reconnect policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Counters that stay readable after the loop is spawned.
    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            stats: Arc::clone(&self.stats),
        }
    }

    /// Run on a dedicated tokio task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Consume the channel forever. Only ends when the task is dropped.
    pub async fn run(self) {
        info!(
            prefix = "pub-sub",
            channel = %self.channel,
            backoff = ?self.policy.backoff(),
            "Starting cluster notification subscription"
        );

        loop {
            self.stats.attempts.fetch_add(1, Ordering::Relaxed);

            let e = match self.run_session().await {
                Ok(never) => match never {},
                Err(e) => e,
            };
            self.stats.failures.fetch_add(1, Ordering::Relaxed);

            error!(
                prefix = "pub-sub",
                channel = %self.channel,
                error = %e,
                "Connection to the broadcast channel failed, reconnect in {:?}",
                self.policy.backoff()
            );

            tokio::time::sleep(self.policy.backoff()).await;
            warn!(prefix = "pub-sub", channel = %self.channel, "Reconnecting");
        }
    }

    /// One session: fresh connection, fresh subscription, pump until error.
    async fn run_session(&self) -> Result<Infallible, BusError> {
        let session = self.client.connect().await?;
        let mut subscription = session.subscribe(&self.channel).await?;

        self.stats.subscriptions.fetch_add(1, Ordering::Relaxed);
        info!(prefix = "pub-sub", channel = %self.channel, "Subscribed to cluster notifications");

        loop {
            let message = subscription.recv().await?;
            self.stats.messages.fetch_add(1, Ordering::Relaxed);

            let outcome = self.router.on_message(&message);
            debug!(prefix = "pub-sub", outcome = ?outcome, "Notification processed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::HandlerTable;
    use cluster_bus::{BroadcastPublisher, InMemoryBroadcastBus};
    use notification_types::{Notification, NotificationCommand};
    use notification_verifier::{NotificationVerifier, VerifierConfig};
    use parking_lot::Mutex;
    use std::time::Duration;
    use tokio::time::{timeout, Instant};

    const CHANNEL: &str = "test.notifications";

    fn recording_router() -> (Arc<NotificationRouter>, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let table = HandlerTable::builder(|| {})
            .on_config_update(move |payload: &str| sink.lock().push(payload.to_string()))
            .build();
        let gate = Arc::new(NotificationVerifier::new(VerifierConfig {
            allow_insecure_configs: true,
            public_key_path: None,
        }));
        (Arc::new(NotificationRouter::new(gate, table)), seen)
    }

    fn config_update(payload: &str) -> Vec<u8> {
        Notification::new(NotificationCommand::ConfigUpdate, payload)
            .encode()
            .unwrap()
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        timeout(Duration::from_secs(120), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        })
        .await
        .expect("condition not reached");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pumps_messages_in_order() {
        let bus = InMemoryBroadcastBus::new();
        let (router, seen) = recording_router();
        let sub_loop = SubscriptionLoop::new(bus.client(), CHANNEL, router);
        let handle = sub_loop.handle();
        let task = sub_loop.spawn();

        wait_until(|| bus.subscriber_count(CHANNEL) == 1).await;
        for i in 0..5 {
            bus.publish(CHANNEL, config_update(&i.to_string())).await.unwrap();
        }
        wait_until(|| seen.lock().len() == 5).await;

        assert_eq!(*seen.lock(), vec!["0", "1", "2", "3", "4"]);
        assert_eq!(handle.attempts(), 1);
        assert_eq!(handle.failures(), 0);
        assert_eq!(handle.messages(), 5);
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnects_after_fixed_backoff() {
        let bus = InMemoryBroadcastBus::new();
        let (router, _) = recording_router();
        let sub_loop = SubscriptionLoop::new(bus.client(), CHANNEL, router)
            .with_policy(ReconnectPolicy::fixed(Duration::from_secs(10)));
        let handle = sub_loop.handle();
        let task = sub_loop.spawn();

        wait_until(|| handle.subscriptions() == 1).await;
        let severed_at = Instant::now();
        bus.sever();

        wait_until(|| handle.subscriptions() == 2).await;
        let waited = severed_at.elapsed();

        assert!(waited >= Duration::from_secs(10), "reconnected after {waited:?}");
        assert!(waited < Duration::from_secs(11), "reconnected after {waited:?}");
        assert_eq!(handle.failures(), 1);
        assert_eq!(bus.subscriber_count(CHANNEL), 1);
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_bus_retried_indefinitely() {
        let bus = InMemoryBroadcastBus::new();
        bus.set_online(false);
        let (router, _) = recording_router();
        let sub_loop = SubscriptionLoop::new(bus.client(), CHANNEL, router)
            .with_policy(ReconnectPolicy::fixed(Duration::from_secs(1)));
        let handle = sub_loop.handle();
        let task = sub_loop.spawn();

        wait_until(|| handle.failures() >= 20).await;
        assert_eq!(handle.subscriptions(), 0);

        bus.set_online(true);
        wait_until(|| handle.subscriptions() == 1).await;
        assert!(!task.is_finished());
        task.abort();
    }
}
