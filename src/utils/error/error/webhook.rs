//! Webhook delivery error taxonomy
//!
//! Every failure on the outbound notification path is one of these kinds.
//! None of them is retried by this crate; retry policy belongs to whoever
//! routes notifications.

use thiserror::Error;

/// Failure of a single webhook delivery attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// The outbound payload could not be serialized or signed
    #[error("failed to encode webhook payload: {0}")]
    PayloadEncoding(String),

    /// The destination was declined by the SSRF / egress policy before any I/O
    #[error("request rejected by egress policy: {0}")]
    RejectedByEgressPolicy(String),

    /// Connection or protocol failure while talking to the endpoint (or the worker)
    #[error("failed to send webhook request: {0}")]
    Transport(String),

    /// The endpoint answered with a status outside `200..300`
    #[error("webhook request failed with status code: {status}")]
    NonSuccessStatus { status: u16 },
}

impl WebhookError {
    /// Status code carried by a [`WebhookError::NonSuccessStatus`]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NonSuccessStatus { status } => Some(*status),
            _ => None,
        }
    }

    /// Map an HTTP status to `Ok` for 2xx and [`WebhookError::NonSuccessStatus`] otherwise
    pub fn check_status(status: u16) -> Result<(), Self> {
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(Self::NonSuccessStatus { status })
        }
    }
}
