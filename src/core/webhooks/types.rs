//! Webhook type definitions
//!
//! Notification input and the two wire schemas it is rendered into.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix shared by every channel status-change notification type
pub const NOTIFY_TYPE_CHANNEL_UPDATE: &str = "channel_update";

/// Notification to deliver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notify {
    /// Notification type, also the router's dedup key
    #[serde(rename = "type")]
    pub notify_type: String,
    pub title: String,
    /// Body template; see [`super::format::substitute_values`]
    pub content: String,
    /// Placeholder values, consumed in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
}

impl Notify {
    pub fn new(
        notify_type: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            notify_type: notify_type.into(),
            title: title.into(),
            content: content.into(),
            values: Vec::new(),
        }
    }

    pub fn with_values(mut self, values: Vec<Value>) -> Self {
        self.values = values;
        self
    }

    /// Whether this reports a channel status change
    pub fn is_channel_update(&self) -> bool {
        self.notify_type.starts_with(NOTIFY_TYPE_CHANNEL_UPDATE)
    }
}

/// Generic webhook wire payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(rename = "type")]
    pub notify_type: String,
    pub title: String,
    /// Content with placeholders already substituted
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
    /// Unix seconds
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DingTalkMarkdown {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DingTalkText {
    pub content: String,
}

/// DingTalk chat-bot message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msgtype", rename_all = "lowercase")]
pub enum DingTalkPayload {
    Markdown { markdown: DingTalkMarkdown },
    Text { text: DingTalkText },
}

impl DingTalkPayload {
    pub fn markdown(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Markdown {
            markdown: DingTalkMarkdown {
                title: title.into(),
                text: text.into(),
            },
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            text: DingTalkText {
                content: content.into(),
            },
        }
    }
}
