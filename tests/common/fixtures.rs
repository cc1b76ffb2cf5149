//! Test fixtures and data factories
//!
//! Provides factory methods for creating test data with sensible defaults.

use litellm_channel_health::{ChannelError, ChannelType, UpstreamError};

/// Factory for channels involved in a failure
pub struct ChannelFactory;

impl ChannelFactory {
    /// Single-key OpenAI channel with auto-ban on
    pub fn openai(id: i64) -> ChannelError {
        ChannelError::new(id, ChannelType::OPENAI, format!("openai-{}", id), false, "", true, None)
    }

    /// Gemini channel with auto-ban on
    pub fn gemini(id: i64) -> ChannelError {
        ChannelError::new(id, ChannelType::GEMINI, format!("gemini-{}", id), false, "", true, None)
    }

    /// One key of a multi-key channel
    pub fn multi_key(id: i64, key: &str) -> ChannelError {
        ChannelError::new(id, ChannelType::AZURE, format!("azure-{}", id), true, key, true, None)
    }

    /// Channel whose operator turned auto-ban off
    pub fn protected(id: i64) -> ChannelError {
        let mut channel = Self::openai(id);
        channel.auto_ban = false;
        channel
    }
}

/// Factory for upstream errors
pub struct ErrorFactory;

impl ErrorFactory {
    pub fn unauthorized() -> UpstreamError {
        UpstreamError::new(401, "Incorrect API key provided")
            .with_code("invalid_api_key")
            .with_type("invalid_request_error")
    }

    pub fn forbidden() -> UpstreamError {
        UpstreamError::new(403, "Consumer has been suspended by the provider")
    }

    pub fn quota_exceeded() -> UpstreamError {
        UpstreamError::new(429, "You exceeded your current quota, please check your plan")
            .with_type("insufficient_quota")
    }

    pub fn transient() -> UpstreamError {
        UpstreamError::new(503, "The server is overloaded").with_type("server_error")
    }
}
