//! Configuration loading utilities
//!
//! Environment variable overrides applied on top of the default configuration.

use super::models::*;
use crate::utils::error::{GatewayError, Result};
use std::env;
use std::str::FromStr;
use tracing::debug;

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_overrides(|name| env::var(name).ok())?;

        debug!("Configuration loaded from environment variables");
        Ok(config)
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Channel health
        if let Some(v) = parse_var(&lookup, "AUTOMATIC_DISABLE_CHANNEL_ENABLED")? {
            self.channel.automatic_disable_enabled = v;
        }
        if let Some(v) = parse_var(&lookup, "AUTOMATIC_ENABLE_CHANNEL_ENABLED")? {
            self.channel.automatic_enable_enabled = v;
        }
        if let Some(raw) = lookup("AUTOMATIC_DISABLE_KEYWORDS") {
            self.channel.disable_keywords = ChannelHealthConfig::parse_keywords(&raw);
        }

        // Webhook
        if let Some(v) = parse_var(&lookup, "WEBHOOK_TIMEOUT_SECONDS")? {
            self.webhook.timeout_seconds = v;
        }
        if let Some(url) = lookup("NOTIFY_WEBHOOK_URL") {
            self.webhook.notify_url = Some(url);
        }
        if let Some(secret) = lookup("NOTIFY_WEBHOOK_SECRET") {
            self.webhook.notify_secret = Some(secret);
        }

        // Worker relay
        if let Some(url) = lookup("WORKER_URL") {
            self.webhook.worker.enabled = !url.is_empty();
            self.webhook.worker.url = Some(url);
        }
        if let Some(key) = lookup("WORKER_VALID_KEY") {
            self.webhook.worker.valid_key = key;
        }
        if let Some(v) = parse_var(&lookup, "WORKER_ALLOW_HTTP_REQUESTS")? {
            self.webhook.worker.allow_http_requests = v;
        }

        // SSRF protection
        if let Some(v) = parse_var(&lookup, "SSRF_PROTECTION_ENABLED")? {
            self.fetch.enable_ssrf_protection = v;
        }
        if let Some(v) = parse_var(&lookup, "SSRF_ALLOW_PRIVATE_IP")? {
            self.fetch.allow_private_ip = v;
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| GatewayError::Config(format!("Invalid {}: {}", name, e))),
    }
}
