//! Top-level configuration

#![allow(missing_docs)]

use super::*;
use serde::{Deserialize, Serialize};

/// Everything the channel health core reads from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Automatic disable / enable switches
    #[serde(default)]
    pub channel: ChannelHealthConfig,
    /// Webhook delivery
    #[serde(default)]
    pub webhook: WebhookSettings,
    /// SSRF protection for direct delivery
    #[serde(default)]
    pub fetch: FetchSetting,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}
