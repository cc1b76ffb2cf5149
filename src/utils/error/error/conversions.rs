//! Type conversions into the error taxonomy

use super::webhook::WebhookError;

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        WebhookError::PayloadEncoding(err.to_string())
    }
}

impl From<reqwest::Error> for WebhookError {
    fn from(err: reqwest::Error) -> Self {
        WebhookError::Transport(err.to_string())
    }
}

impl From<hmac::digest::InvalidLength> for WebhookError {
    fn from(err: hmac::digest::InvalidLength) -> Self {
        WebhookError::PayloadEncoding(format!("invalid signing key: {}", err))
    }
}
