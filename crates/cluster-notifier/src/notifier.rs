//! # Notifier
//!
//! Publisher for nodes that emit notifications of their own (DRL and TLS
//! status gossip, dashboards). Separate from the consumer: the subscription
//! loop never publishes.

use crate::errors::NotifyError;
use cluster_bus::BroadcastPublisher;
use notification_types::Notification;
use notification_verifier::NotificationSigner;
use tracing::debug;

/// Encodes, optionally signs, and publishes notifications on one channel.
pub struct Notifier<P> {
    publisher: P,
    channel: String,
    signer: Option<NotificationSigner>,
}

impl<P: BroadcastPublisher> Notifier<P> {
    /// Unsigned notifier.
    pub fn new(publisher: P, channel: impl Into<String>) -> Self {
        Self {
            publisher,
            channel: channel.into(),
            signer: None,
        }
    }

    /// Sign every outgoing payload.
    #[must_use]
    pub fn with_signer(mut self, signer: NotificationSigner) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Publish a notification. Returns the receiver count the bus reports.
    pub async fn notify(&self, notification: Notification) -> Result<usize, NotifyError> {
        let notification = match &self.signer {
            Some(signer) => signer.sign_notification(notification),
            None => notification,
        };
        let command = notification.command.clone();
        let encoded = notification.encode()?;

        let receivers = self.publisher.publish(&self.channel, encoded).await?;
        debug!(
            prefix = "pub-sub",
            command = %command,
            receivers = receivers,
            "Notification published"
        );
        Ok(receivers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cluster_bus::{BroadcastClient, BroadcastSession, ChannelSubscription, InMemoryBroadcastBus};
    use notification_types::NotificationCommand;
    use std::sync::Arc;

    const CHANNEL: &str = "notify.test";

    #[tokio::test]
    async fn test_signed_notification_verifies() {
        let bus = InMemoryBroadcastBus::new();
        let mut sub = bus
            .client()
            .connect()
            .await
            .unwrap()
            .subscribe(CHANNEL)
            .await
            .unwrap();

        let signer = NotificationSigner::from_seed([0x5A; 32]);
        let public_key = signer.public_key();
        let notifier = Notifier::new(Arc::clone(&bus), CHANNEL).with_signer(signer);

        let receivers = notifier
            .notify(Notification::new(NotificationCommand::ConfigUpdate, "{}"))
            .await
            .unwrap();
        assert_eq!(receivers, 1);

        let received = Notification::decode(&sub.recv().await.unwrap()).unwrap();
        assert!(received.is_signed());
        assert!(public_key
            .verify(received.payload.as_bytes(), &received.signature)
            .is_ok());
    }

    #[tokio::test]
    async fn test_unsigned_notification() {
        let bus = InMemoryBroadcastBus::new();
        let notifier = Notifier::new(Arc::clone(&bus), CHANNEL);

        let receivers = notifier
            .notify(Notification::new(NotificationCommand::GatewayDrlStatus, "{}"))
            .await
            .unwrap();

        assert_eq!(receivers, 0);
        assert_eq!(bus.messages_published(), 1);
    }
}
