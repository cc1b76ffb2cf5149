//! Validators for the configuration sections

use super::ssrf::{parse_ip_rule, parse_port_rule};
use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;
use url::Url;

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating gateway configuration");

        self.channel.validate()?;
        self.webhook.validate()?;
        self.fetch.validate()?;
        self.logging.validate()?;

        Ok(())
    }
}

impl Validate for ChannelHealthConfig {
    fn validate(&self) -> Result<(), String> {
        if self.disable_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err("Disable keywords cannot contain blank entries".to_string());
        }

        Ok(())
    }
}

impl Validate for WebhookSettings {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_seconds == 0 {
            return Err("Webhook timeout must be greater than 0".to_string());
        }

        if let Some(url) = &self.notify_url {
            validate_http_url(url, "Notify webhook URL")?;
        }

        self.worker.validate()
    }
}

impl Validate for WorkerConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }

        match self.url.as_deref() {
            None | Some("") => Err("Worker URL must be set when worker mode is enabled".to_string()),
            Some(url) => validate_http_url(url, "Worker URL"),
        }
    }
}

impl Validate for FetchSetting {
    fn validate(&self) -> Result<(), String> {
        if let Some(bad) = self.ip_list.iter().find(|e| parse_ip_rule(e).is_none()) {
            return Err(format!("Invalid IP or CIDR in ip_list: '{}'", bad));
        }

        if let Some(bad) = self.allowed_ports.iter().find(|p| parse_port_rule(p).is_none()) {
            return Err(format!("Invalid port or port range in allowed_ports: '{}'", bad));
        }

        if self.domain_list.iter().any(|d| d.trim().is_empty()) {
            return Err("Domain list cannot contain blank entries".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        Ok(())
    }
}

fn validate_http_url(raw: &str, context: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| format!("{} has invalid URL format: {}", context, e))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!(
            "{} must use http:// or https:// scheme, got: {}",
            context, scheme
        )),
    }
}
