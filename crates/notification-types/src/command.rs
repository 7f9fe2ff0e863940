//! # Notification Commands
//!
//! The intent carried by a notification. Commands travel as plain JSON strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies what a notification asks its receivers to do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationCommand {
    /// A new configuration is available for the node.
    ConfigUpdate,
    /// Dashboard announces itself for zero-conf setup.
    DashboardZeroConf,
    /// Dashboard asks gateways for their mini config.
    DashboardConfigRequest,
    /// Reply to a dashboard config request. Never acted upon by listeners.
    GatewayConfigResponse,
    /// Distributed rate limiter status gossip between gateways.
    GatewayDrlStatus,
    /// TLS (Let's Encrypt) certificate status gossip between gateways.
    GatewayTlsStatus,
    /// An API definition changed.
    ApiUpdated,
    /// An API definition was added.
    ApiAdded,
    /// An API definition was removed.
    ApiRemoved,
    /// A node group asked for a reload.
    GroupReload,
    /// A policy changed.
    PolicyChanged,
    /// Any other command, including an empty one.
    Other(String),
}

impl NotificationCommand {
    /// Wire representation of the command.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ConfigUpdate => "NoticeConfigUpdate",
            Self::DashboardZeroConf => "NoticeDashboardZeroConf",
            Self::DashboardConfigRequest => "NoticeDashboardConfigRequest",
            Self::GatewayConfigResponse => "NoticeGatewayConfigResponse",
            Self::GatewayDrlStatus => "NoticeGatewayDRLNotification",
            Self::GatewayTlsStatus => "NoticeGatewayLENotification",
            Self::ApiUpdated => "ApiUpdated",
            Self::ApiAdded => "ApiAdded",
            Self::ApiRemoved => "ApiRemoved",
            Self::GroupReload => "GroupReload",
            Self::PolicyChanged => "PolicyChanged",
            Self::Other(raw) => raw,
        }
    }

    /// Gateway-to-gateway operational signals, trusted without a signature.
    pub fn is_gateway_status(&self) -> bool {
        matches!(self, Self::GatewayDrlStatus | Self::GatewayTlsStatus)
    }

    /// Commands listeners never react to.
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::GatewayConfigResponse)
    }
}

impl Default for NotificationCommand {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for NotificationCommand {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "NoticeConfigUpdate" => Self::ConfigUpdate,
            "NoticeDashboardZeroConf" => Self::DashboardZeroConf,
            "NoticeDashboardConfigRequest" => Self::DashboardConfigRequest,
            "NoticeGatewayConfigResponse" => Self::GatewayConfigResponse,
            "NoticeGatewayDRLNotification" => Self::GatewayDrlStatus,
            "NoticeGatewayLENotification" => Self::GatewayTlsStatus,
            "ApiUpdated" => Self::ApiUpdated,
            "ApiAdded" => Self::ApiAdded,
            "ApiRemoved" => Self::ApiRemoved,
            "GroupReload" => Self::GroupReload,
            "PolicyChanged" => Self::PolicyChanged,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for NotificationCommand {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<NotificationCommand> for String {
    fn from(command: NotificationCommand) -> Self {
        match command {
            NotificationCommand::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NotificationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
