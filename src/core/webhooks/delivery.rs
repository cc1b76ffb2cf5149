//! Webhook delivery
//!
//! [`WebhookSender`] builds the payload once and hands it to a
//! [`DeliveryStrategy`]: either straight to the destination behind the egress
//! policy, or through the worker relay.

use super::formatter::{NotificationFormatter, PreparedWebhook, SIGNATURE_HEADER};
use super::types::Notify;
use super::worker::{HttpWorkerClient, WorkerClient, WorkerRequest};
use crate::config::validation::{EgressPolicy, FetchSettingPolicy};
use crate::config::{Config, FetchSetting};
use crate::utils::error::WebhookError;
use async_trait::async_trait;
use reqwest::{Client, redirect};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How a prepared webhook reaches its destination
#[async_trait]
pub trait DeliveryStrategy: Send + Sync {
    /// Short name for logs
    fn mode(&self) -> &'static str;

    async fn deliver(&self, prepared: &PreparedWebhook) -> Result<(), WebhookError>;
}

/// POST straight to the destination after the egress check.
///
/// Uses its own client that never follows redirects, so the validated URL is
/// the only one contacted; a 3xx answer surfaces as
/// [`WebhookError::NonSuccessStatus`].
///
/// With `apply_ip_filter_for_domain` the host is resolved once for the check
/// and again by the client when connecting. The addresses are not pinned, so a
/// name whose records change between the two lookups is not caught.
pub struct DirectDelivery {
    client: Client,
    fetch_setting: FetchSetting,
    policy: Arc<dyn EgressPolicy>,
    timeout: Duration,
}

impl DirectDelivery {
    pub fn new(fetch_setting: FetchSetting, timeout: Duration) -> Result<Self, WebhookError> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            fetch_setting,
            policy: Arc::new(FetchSettingPolicy),
            timeout,
        })
    }

    /// Replace the egress policy
    pub fn with_policy(mut self, policy: Arc<dyn EgressPolicy>) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl DeliveryStrategy for DirectDelivery {
    fn mode(&self) -> &'static str {
        "direct"
    }

    async fn deliver(&self, prepared: &PreparedWebhook) -> Result<(), WebhookError> {
        if let Err(violation) = self.policy.validate(&prepared.url, &self.fetch_setting).await {
            warn!(error = %violation, "Webhook destination rejected by egress policy");
            return Err(WebhookError::RejectedByEgressPolicy(violation.to_string()));
        }

        let mut request = self
            .client
            .post(&prepared.url)
            .timeout(self.timeout)
            .body(prepared.body.clone());
        for (name, value) in prepared.headers() {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        if let Err(e) = response.bytes().await {
            debug!(error = %e, "Failed to drain webhook response body");
        }
        WebhookError::check_status(status)
    }
}

/// Hand the request to the worker relay
pub struct WorkerRelayDelivery {
    worker: Arc<dyn WorkerClient>,
    worker_key: String,
}

impl WorkerRelayDelivery {
    pub fn new(worker: Arc<dyn WorkerClient>, worker_key: impl Into<String>) -> Self {
        Self {
            worker,
            worker_key: worker_key.into(),
        }
    }

    /// Descriptor sent to the worker for `prepared`
    pub fn worker_request(&self, prepared: &PreparedWebhook) -> Result<WorkerRequest, WebhookError> {
        let mut request = WorkerRequest::post(&prepared.url, &self.worker_key, &prepared.body)?;
        if let (Some(signature), Some(secret)) = (&prepared.signature, &prepared.signing_secret) {
            request = request
                .with_header(SIGNATURE_HEADER, signature.clone())
                .with_header("Authorization", format!("Bearer {}", secret));
        }
        Ok(request)
    }
}

#[async_trait]
impl DeliveryStrategy for WorkerRelayDelivery {
    fn mode(&self) -> &'static str {
        "worker"
    }

    async fn deliver(&self, prepared: &PreparedWebhook) -> Result<(), WebhookError> {
        let request = self.worker_request(prepared)?;
        let status = self.worker.execute(&request).await?;
        WebhookError::check_status(status)
    }
}

/// Sends notifications to webhook destinations
#[derive(Clone)]
pub struct WebhookSender {
    strategy: Arc<dyn DeliveryStrategy>,
}

impl WebhookSender {
    pub fn new(strategy: Arc<dyn DeliveryStrategy>) -> Self {
        Self { strategy }
    }

    /// Pick the strategy from the worker settings
    pub fn from_config(config: &Config, client: Client) -> Result<Self, WebhookError> {
        let webhook = config.webhook();
        let timeout = Duration::from_secs(webhook.timeout_seconds);

        let strategy: Arc<dyn DeliveryStrategy> = if webhook.worker.is_active() {
            let worker = HttpWorkerClient::from_config(&webhook.worker, client, timeout)?;
            info!(worker_url = %worker.worker_url(), "Webhook delivery through worker relay");
            Arc::new(WorkerRelayDelivery::new(
                Arc::new(worker),
                webhook.worker.valid_key.clone(),
            ))
        } else {
            Arc::new(DirectDelivery::new(config.fetch().clone(), timeout)?)
        };
        Ok(Self::new(strategy))
    }

    pub fn mode(&self) -> &'static str {
        self.strategy.mode()
    }

    /// Render `notify` for `url` and deliver it.
    ///
    /// An empty secret counts as no secret.
    pub async fn send(
        &self,
        url: &str,
        secret: Option<&str>,
        notify: &Notify,
    ) -> Result<(), WebhookError> {
        let prepared = NotificationFormatter::prepare(url, secret, notify)?;
        debug!(
            mode = self.strategy.mode(),
            notify_type = %notify.notify_type,
            dingtalk = prepared.dingtalk,
            "Sending webhook notification"
        );

        self.strategy.deliver(&prepared).await.inspect_err(|e| {
            warn!(
                mode = self.strategy.mode(),
                notify_type = %notify.notify_type,
                error = %e,
                "Webhook delivery failed"
            );
        })
    }
}

impl std::fmt::Debug for WebhookSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSender")
            .field("mode", &self.strategy.mode())
            .finish()
    }
}
