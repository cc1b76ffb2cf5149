//! Webhook delivery configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Relay worker that performs outbound requests on the gateway's behalf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorkerConfig {
    /// Route webhook deliveries through the worker instead of calling directly
    #[serde(default)]
    pub enabled: bool,
    /// Worker endpoint
    #[serde(default)]
    pub url: Option<String>,
    /// Key the worker uses to authenticate the gateway
    #[serde(default)]
    pub valid_key: String,
    /// Let the worker fetch plain `http://` destinations
    #[serde(default)]
    pub allow_http_requests: bool,
}

impl WorkerConfig {
    /// Whether worker-relay mode is active
    pub fn is_active(&self) -> bool {
        self.enabled && self.url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Webhook notification settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSettings {
    /// Per-request timeout for webhook (and worker) HTTP exchanges
    #[serde(default = "default_webhook_timeout")]
    pub timeout_seconds: u64,
    /// Operator webhook receiving channel status notifications
    #[serde(default)]
    pub notify_url: Option<String>,
    /// Shared secret for the operator webhook
    #[serde(default)]
    pub notify_secret: Option<String>,
    /// Worker relay settings
    #[serde(default)]
    pub worker: WorkerConfig,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_webhook_timeout(),
            notify_url: None,
            notify_secret: None,
            worker: WorkerConfig::default(),
        }
    }
}
