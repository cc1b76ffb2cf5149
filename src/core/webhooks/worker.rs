//! Worker relay client
//!
//! In worker mode the gateway never opens connections to webhook
//! destinations itself. It posts a request descriptor to the worker, which
//! performs the call under its own egress policy and relays the status.

use crate::config::WorkerConfig;
use crate::utils::error::WebhookError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Request descriptor handed to the worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub url: String,
    /// Authenticates the gateway to the worker
    pub key: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Payload embedded verbatim so the relayed bytes match the signature
    pub body: Box<RawValue>,
}

impl WorkerRequest {
    /// POST descriptor for a JSON body
    pub fn post(
        url: impl Into<String>,
        key: impl Into<String>,
        body: &str,
    ) -> Result<Self, WebhookError> {
        let body = RawValue::from_string(body.to_string())?;
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Ok(Self {
            url: url.into(),
            key: key.into(),
            method: "POST".to_string(),
            headers,
            body,
        })
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

impl PartialEq for WorkerRequest {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
            && self.key == other.key
            && self.method == other.method
            && self.headers == other.headers
            && self.body.get() == other.body.get()
    }
}

/// Executes a [`WorkerRequest`] and reports the destination's status code
#[async_trait]
pub trait WorkerClient: Send + Sync {
    async fn execute(&self, request: &WorkerRequest) -> Result<u16, WebhookError>;
}

/// [`WorkerClient`] posting the descriptor to the worker over HTTP
#[derive(Debug, Clone)]
pub struct HttpWorkerClient {
    client: Client,
    worker_url: String,
    allow_http: bool,
    timeout: Duration,
}

impl HttpWorkerClient {
    pub fn new(client: Client, worker_url: impl Into<String>, timeout: Duration) -> Self {
        let mut worker_url = worker_url.into();
        if !worker_url.ends_with('/') {
            worker_url.push('/');
        }
        Self {
            client,
            worker_url,
            allow_http: false,
            timeout,
        }
    }

    /// Let the worker fetch plain `http://` destinations
    pub fn allow_http(mut self, allow: bool) -> Self {
        self.allow_http = allow;
        self
    }

    pub fn from_config(
        config: &WorkerConfig,
        client: Client,
        timeout: Duration,
    ) -> Result<Self, WebhookError> {
        let url = config
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| WebhookError::Transport("worker url is not configured".to_string()))?;
        Ok(Self::new(client, url, timeout).allow_http(config.allow_http_requests))
    }

    pub fn worker_url(&self) -> &str {
        &self.worker_url
    }
}

#[async_trait]
impl WorkerClient for HttpWorkerClient {
    async fn execute(&self, request: &WorkerRequest) -> Result<u16, WebhookError> {
        if !self.allow_http && !request.url.starts_with("https") {
            return Err(WebhookError::RejectedByEgressPolicy(
                "worker only relays https urls".to_string(),
            ));
        }

        let response = self
            .client
            .post(&self.worker_url)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        if let Err(e) = response.bytes().await {
            debug!(error = %e, "Failed to drain worker response body");
        }
        Ok(status)
    }
}
