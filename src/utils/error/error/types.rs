//! Error types for the channel health core

use super::webhook::WebhookError;
use thiserror::Error;

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Webhook delivery errors
    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),

    /// Channel store errors
    #[error("Store error: {0}")]
    Store(String),

    /// Notification routing errors
    #[error("Notification error: {0}")]
    Notification(String),
}
