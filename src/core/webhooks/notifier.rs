//! Operator notifications over a webhook

use super::delivery::WebhookSender;
use super::types::Notify;
use crate::config::Config;
use crate::core::health::NotificationRouter;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// [`NotificationRouter`] delivering every notification to one webhook
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    sender: WebhookSender,
    url: String,
    secret: Option<String>,
}

impl WebhookNotifier {
    pub fn new(sender: WebhookSender, url: impl Into<String>, secret: Option<String>) -> Self {
        Self {
            sender,
            url: url.into(),
            secret,
        }
    }

    /// Notifier for the configured operator webhook
    pub fn from_config(config: &Config, client: Client) -> Result<Self> {
        let webhook = config.webhook();
        let url = webhook
            .notify_url
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| GatewayError::config("webhook.notify_url is not set"))?;
        let sender = WebhookSender::from_config(config, client)?;
        Ok(Self::new(sender, url, webhook.notify_secret.clone()))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl NotificationRouter for WebhookNotifier {
    async fn notify(&self, notify_type: &str, subject: &str, content: &str) -> Result<()> {
        let notify = Notify::new(notify_type, subject, content);
        self.sender
            .send(&self.url, self.secret.as_deref(), &notify)
            .await?;
        debug!(notify_type = %notify_type, "Operator webhook notified");
        Ok(())
    }
}
