//! Channel and upstream error types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream provider family of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelType(pub i32);

impl ChannelType {
    pub const UNKNOWN: Self = Self(0);
    pub const OPENAI: Self = Self(1);
    pub const AZURE: Self = Self(3);
    pub const ANTHROPIC: Self = Self(14);
    pub const GEMINI: Self = Self(24);
    pub const VERTEX_AI: Self = Self(41);

    /// Gemini answers 403 for revoked or blocked keys, unlike most providers
    pub fn is_gemini(self) -> bool {
        self == Self::GEMINI
    }
}

impl From<i32> for ChannelType {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Stored status of a channel.
///
/// Only `Enabled` and `AutoDisabled` are produced by this crate; the other
/// values are carried through untouched, including codes it does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ChannelStatus {
    /// `0`, or any code outside `1..=3`, kept as stored
    Unknown(i32),
    Enabled,
    ManuallyDisabled,
    AutoDisabled,
}

impl ChannelStatus {
    /// Integer code as persisted by the channel store
    pub const fn code(self) -> i32 {
        match self {
            Self::Unknown(code) => code,
            Self::Enabled => 1,
            Self::ManuallyDisabled => 2,
            Self::AutoDisabled => 3,
        }
    }

    pub const fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Enabled,
            2 => Self::ManuallyDisabled,
            3 => Self::AutoDisabled,
            other => Self::Unknown(other),
        }
    }
}

impl From<i32> for ChannelStatus {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

impl From<ChannelStatus> for i32 {
    fn from(status: ChannelStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The channel instance involved in a failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelError {
    pub channel_id: i64,
    pub channel_type: ChannelType,
    pub channel_name: String,
    pub is_multi_key: bool,
    /// Whether the channel may be disabled automatically
    pub auto_ban: bool,
    /// Key in use for multi-key channels, empty otherwise
    pub using_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl ChannelError {
    pub fn new(
        channel_id: i64,
        channel_type: ChannelType,
        channel_name: impl Into<String>,
        is_multi_key: bool,
        using_key: impl Into<String>,
        auto_ban: bool,
        tag: Option<String>,
    ) -> Self {
        Self {
            channel_id,
            channel_type,
            channel_name: channel_name.into(),
            is_multi_key,
            auto_ban,
            using_key: using_key.into(),
            tag,
        }
    }
}

/// Error returned by an upstream provider call, normalized to the OpenAI shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct UpstreamError {
    /// HTTP status of the upstream response (0 when no response was received)
    pub status_code: u16,
    pub message: String,
    /// Machine-readable code, e.g. `invalid_api_key`
    pub code: String,
    /// Broad category, e.g. `insufficient_quota`
    pub error_type: String,
    /// Set by the caller when the failure is attributable to the channel itself
    pub channel_level: bool,
    /// Set by the caller for failures that must never disable a channel
    pub skip_retry: bool,
}

impl UpstreamError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            code: String::new(),
            error_type: String::new(),
            channel_level: false,
            skip_retry: false,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = error_type.into();
        self
    }

    pub fn channel_level(mut self) -> Self {
        self.channel_level = true;
        self
    }

    pub fn skip_retry(mut self) -> Self {
        self.skip_retry = true;
        self
    }
}
