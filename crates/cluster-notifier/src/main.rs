//! # Cluster Notifier
//!
//! Runs the cluster-notification consumer against Redis.
//!
//! ## Startup Sequence
//!
//! 1. Install logging
//! 2. Load and validate configuration (environment)
//! 3. Build the verifier and the reaction table
//! 4. Spawn the subscription loop
//! 5. Wait for Ctrl+C
//!
//! Reactions in this binary only log what they receive; embedders register
//! their own handlers through [`HandlerTable`].

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use cluster_bus::RedisBroadcastClient;
use cluster_notifier::{
    telemetry, HandlerTable, NotificationHandler, NotificationRouter, NotifierConfig,
    SubscriptionLoop,
};
use notification_verifier::NotificationVerifier;

/// Reaction that records the notification in the log.
struct LogReaction {
    name: &'static str,
}

impl NotificationHandler for LogReaction {
    fn handle(&self, payload: &str) {
        info!(
            prefix = "pub-sub",
            reaction = self.name,
            bytes = payload.len(),
            "Notification received"
        );
    }
}

fn reactions() -> HandlerTable {
    HandlerTable::builder(|| info!(prefix = "pub-sub", reaction = "reload", "Reload requested"))
        .on_config_update(LogReaction {
            name: "config-update",
        })
        .on_dashboard_zero_conf(LogReaction {
            name: "dashboard-zero-conf",
        })
        .on_dashboard_config_request(LogReaction {
            name: "send-mini-config",
        })
        .on_drl_status(LogReaction {
            name: "server-status",
        })
        .on_tls_status(LogReaction { name: "tls-status" })
        .build()
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_logging();

    let config = NotifierConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let verifier = Arc::new(NotificationVerifier::new(config.verifier_config()));
    let router = Arc::new(NotificationRouter::new(verifier, reactions()));

    let client = RedisBroadcastClient::open(&config.pubsub.redis_url)
        .context("Invalid Redis URL")?;
    let subscription =
        SubscriptionLoop::new(client, config.pubsub.channel.clone(), Arc::clone(&router))
            .with_policy(config.reconnect_policy());
    let handle = subscription.handle();
    let task = subscription.spawn();

    info!(
        channel = %config.pubsub.channel,
        redis = %config.pubsub.redis_url,
        "Cluster notifier running. Press Ctrl+C to stop."
    );
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    task.abort();
    let stats = router.stats();
    info!(
        sessions = handle.attempts(),
        failures = handle.failures(),
        received = stats.received,
        dispatched = stats.dispatched,
        reloads = stats.reloads,
        rejected = stats.rejected,
        "Shutdown complete"
    );

    Ok(())
}
