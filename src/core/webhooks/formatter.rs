//! Payload building and signing
//!
//! Everything here is pure: the same notification, destination, secret and
//! clock reading always yield the same request. Both delivery strategies
//! start from a [`PreparedWebhook`].

use super::format::substitute_values;
use super::types::{DingTalkPayload, Notify, WebhookPayload};
use crate::utils::error::WebhookError;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Host markers of DingTalk robot endpoints
const DINGTALK_HOSTS: &[&str] = &["oapi.dingtalk.com", "api.dingtalk.com"];

/// Header carrying the hex body signature for generic webhooks
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

/// Whether the URL addresses a DingTalk robot
pub fn is_dingtalk_webhook(url: &str) -> bool {
    DINGTALK_HOSTS.iter().any(|host| url.contains(host))
}

/// Markdown body for DingTalk.
///
/// Single newlines become forced breaks. The title is added as a heading
/// unless it is empty or the notification is a channel update, whose body
/// already names the channel.
pub fn dingtalk_markdown_text(notify: &Notify, content: &str) -> String {
    let text = content.replace("\r\n", "\n").replace('\n', "  \n");
    if notify.title.is_empty() || notify.is_channel_update() {
        text
    } else {
        format!("### {}\n\n{}", notify.title, text)
    }
}

/// `base64(HMAC-SHA256(secret, "{timestamp_ms}\n{secret}"))`
pub fn dingtalk_sign(secret: &str, timestamp_ms: i64) -> Result<String, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(format!("{}\n{}", timestamp_ms, secret).as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Append `timestamp` and `sign` query parameters, keeping any existing query
pub fn sign_dingtalk_url(url: &str, secret: &str, timestamp_ms: i64) -> Result<String, WebhookError> {
    let sign = dingtalk_sign(secret, timestamp_ms)?;
    let escaped: String = url::form_urlencoded::byte_serialize(sign.as_bytes()).collect();
    let sep = if url.contains('?') { '&' } else { '?' };
    Ok(format!("{}{}timestamp={}&sign={}", url, sep, timestamp_ms, escaped))
}

/// Hex `HMAC-SHA256(secret, body)`
pub fn webhook_signature(secret: &str, body: &[u8]) -> Result<String, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// A request ready for either delivery strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedWebhook {
    /// Destination, signed for DingTalk when a secret is set
    pub url: String,
    /// Serialized JSON payload
    pub body: String,
    /// Whether the destination is a DingTalk robot
    pub dingtalk: bool,
    /// Hex body signature; only for generic destinations with a secret
    pub signature: Option<String>,
    /// Secret the signature was made with
    pub signing_secret: Option<String>,
}

impl PreparedWebhook {
    /// Headers every delivery sends
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Content-Type", "application/json".to_string())];
        if let Some(signature) = &self.signature {
            headers.push((SIGNATURE_HEADER, signature.clone()));
        }
        headers
    }
}

/// Turns a [`Notify`] into a [`PreparedWebhook`] for a destination
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationFormatter;

impl NotificationFormatter {
    pub fn prepare(
        url: &str,
        secret: Option<&str>,
        notify: &Notify,
    ) -> Result<PreparedWebhook, WebhookError> {
        Self::prepare_at(url, secret, notify, Utc::now())
    }

    /// [`Self::prepare`] with an explicit clock reading
    pub fn prepare_at(
        url: &str,
        secret: Option<&str>,
        notify: &Notify,
        now: DateTime<Utc>,
    ) -> Result<PreparedWebhook, WebhookError> {
        let secret = secret.filter(|s| !s.is_empty());
        let content = substitute_values(&notify.content, &notify.values);
        let dingtalk = is_dingtalk_webhook(url);

        if dingtalk {
            let payload = DingTalkPayload::markdown(
                notify.title.clone(),
                dingtalk_markdown_text(notify, &content),
            );
            let body = serde_json::to_string(&payload)?;
            let url = match secret {
                Some(secret) => sign_dingtalk_url(url, secret, now.timestamp_millis())?,
                None => url.to_string(),
            };
            return Ok(PreparedWebhook {
                url,
                body,
                dingtalk,
                signature: None,
                signing_secret: None,
            });
        }

        let payload = WebhookPayload {
            notify_type: notify.notify_type.clone(),
            title: notify.title.clone(),
            content,
            values: notify.values.clone(),
            timestamp: now.timestamp(),
        };
        let body = serde_json::to_string(&payload)?;
        let signature = secret
            .map(|secret| webhook_signature(secret, body.as_bytes()))
            .transpose()?;

        Ok(PreparedWebhook {
            url: url.to_string(),
            body,
            dingtalk,
            signature,
            signing_secret: secret.map(str::to_string),
        })
    }
}
