//! Webhook notification system
//!
//! Renders notifications into the generic or DingTalk wire format, signs
//! them, and delivers them directly or through the worker relay.

mod delivery;
pub mod format;
mod formatter;
mod notifier;
mod types;
mod worker;

pub use delivery::{DeliveryStrategy, DirectDelivery, WebhookSender, WorkerRelayDelivery};
pub use formatter::{
    NotificationFormatter, PreparedWebhook, SIGNATURE_HEADER, dingtalk_markdown_text,
    dingtalk_sign, is_dingtalk_webhook, sign_dingtalk_url, webhook_signature,
};
pub use notifier::WebhookNotifier;
pub use types::{
    DingTalkMarkdown, DingTalkPayload, DingTalkText, NOTIFY_TYPE_CHANNEL_UPDATE, Notify,
    WebhookPayload,
};
pub use worker::{HttpWorkerClient, WorkerClient, WorkerRequest};
