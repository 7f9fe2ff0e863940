//! # Notifier Configuration
//!
//! Defaults suitable for a local node, overridden from the environment.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `CN_ALLOW_INSECURE_CONFIGS` | `security.allow_insecure_configs` |
//! | `CN_PUBLIC_KEY_PATH` | `security.public_key_path` |
//! | `CN_PUBSUB_CHANNEL` | `pubsub.channel` |
//! | `CN_RECONNECT_BACKOFF_SECS` | `pubsub.reconnect_backoff` |
//! | `CN_REDIS_URL` | `pubsub.redis_url` |

use crate::errors::ConfigError;
use crate::subscription::ReconnectPolicy;
use notification_types::DEFAULT_CHANNEL;
use notification_verifier::VerifierConfig;
use std::path::PathBuf;
use std::time::Duration;

const ENV_ALLOW_INSECURE: &str = "CN_ALLOW_INSECURE_CONFIGS";
const ENV_PUBLIC_KEY_PATH: &str = "CN_PUBLIC_KEY_PATH";
const ENV_CHANNEL: &str = "CN_PUBSUB_CHANNEL";
const ENV_BACKOFF_SECS: &str = "CN_RECONNECT_BACKOFF_SECS";
const ENV_REDIS_URL: &str = "CN_REDIS_URL";

/// Complete notifier configuration.
#[derive(Debug, Clone, Default)]
pub struct NotifierConfig {
    /// Authenticity settings.
    pub security: SecurityConfig,
    /// Channel and transport settings.
    pub pubsub: PubSubConfig,
}

/// Authenticity settings.
#[derive(Debug, Clone, Default)]
pub struct SecurityConfig {
    /// Accept notifications that carry no signature.
    pub allow_insecure_configs: bool,
    /// Ed25519 verification key (PEM or hex).
    pub public_key_path: Option<PathBuf>,
}

/// Channel and transport settings.
#[derive(Debug, Clone)]
pub struct PubSubConfig {
    /// Broadcast channel name.
    pub channel: String,
    /// Fixed delay between reconnect attempts.
    pub reconnect_backoff: Duration,
    /// Redis connection URL.
    pub redis_url: String,
}

impl Default for PubSubConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            reconnect_backoff: ReconnectPolicy::DEFAULT_BACKOFF,
            redis_url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

impl NotifierConfig {
    /// Defaults overridden by process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_ALLOW_INSECURE) {
            config.security.allow_insecure_configs = parse_bool(ENV_ALLOW_INSECURE, &value)?;
        }
        if let Some(path) = lookup(ENV_PUBLIC_KEY_PATH).filter(|p| !p.trim().is_empty()) {
            config.security.public_key_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(channel) = lookup(ENV_CHANNEL) {
            config.pubsub.channel = channel;
        }
        if let Some(value) = lookup(ENV_BACKOFF_SECS) {
            let secs = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_BACKOFF_SECS,
                    value: value.clone(),
                })?;
            config.pubsub.reconnect_backoff = Duration::from_secs(secs);
        }
        if let Some(url) = lookup(ENV_REDIS_URL) {
            config.pubsub.redis_url = url;
        }

        Ok(config)
    }

    /// Reject settings the loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pubsub.channel.trim().is_empty() {
            return Err(ConfigError::EmptyChannel);
        }
        if self.pubsub.reconnect_backoff.is_zero() {
            return Err(ConfigError::ZeroBackoff);
        }
        Ok(())
    }

    /// Inputs for the notification verifier.
    pub fn verifier_config(&self) -> VerifierConfig {
        VerifierConfig {
            allow_insecure_configs: self.security.allow_insecure_configs,
            public_key_path: self.security.public_key_path.clone(),
        }
    }

    /// Restart policy for the subscription loop.
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy::fixed(self.pubsub.reconnect_backoff)
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = NotifierConfig::default();
        assert!(!config.security.allow_insecure_configs);
        assert!(config.security.public_key_path.is_none());
        assert_eq!(config.pubsub.channel, "tyk.cluster.notifications");
        assert_eq!(config.pubsub.reconnect_backoff, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = NotifierConfig::from_lookup(lookup(&[
            ("CN_ALLOW_INSECURE_CONFIGS", "TRUE"),
            ("CN_PUBLIC_KEY_PATH", " /etc/notifier/key.pem "),
            ("CN_PUBSUB_CHANNEL", "fleet.notifications"),
            ("CN_RECONNECT_BACKOFF_SECS", "3"),
            ("CN_REDIS_URL", "redis://cache:6380"),
        ]))
        .unwrap();

        assert!(config.security.allow_insecure_configs);
        assert_eq!(
            config.security.public_key_path,
            Some(PathBuf::from("/etc/notifier/key.pem"))
        );
        assert_eq!(config.pubsub.channel, "fleet.notifications");
        assert_eq!(config.pubsub.reconnect_backoff, Duration::from_secs(3));
        assert_eq!(config.pubsub.redis_url, "redis://cache:6380");

        let verifier = config.verifier_config();
        assert!(verifier.allow_insecure_configs);
        assert_eq!(config.reconnect_policy().backoff(), Duration::from_secs(3));
    }

    #[test]
    fn test_blank_key_path_ignored() {
        let config = NotifierConfig::from_lookup(lookup(&[("CN_PUBLIC_KEY_PATH", "  ")])).unwrap();
        assert!(config.security.public_key_path.is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            NotifierConfig::from_lookup(lookup(&[("CN_ALLOW_INSECURE_CONFIGS", "maybe")]))
                .unwrap_err(),
            ConfigError::InvalidValue {
                key: "CN_ALLOW_INSECURE_CONFIGS",
                value: "maybe".to_string(),
            }
        );
        assert!(matches!(
            NotifierConfig::from_lookup(lookup(&[("CN_RECONNECT_BACKOFF_SECS", "-1")])),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate() {
        let mut config = NotifierConfig::default();
        config.pubsub.channel = " ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::EmptyChannel));

        let mut config = NotifierConfig::default();
        config.pubsub.reconnect_backoff = Duration::ZERO;
        assert_eq!(config.validate(), Err(ConfigError::ZeroBackoff));
    }
}
