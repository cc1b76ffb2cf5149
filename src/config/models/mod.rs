//! Configuration data models
//!
//! This module defines all configuration structures used by the channel health core.

#![allow(missing_docs)]

pub mod channel;
pub mod fetch;
pub mod gateway;
pub mod logging;
pub mod webhook;

// Re-export all configuration types
pub use channel::*;
pub use fetch::*;
pub use gateway::*;
pub use logging::*;
pub use webhook::*;

/// Default value for boolean switches that start enabled
pub fn default_true() -> bool {
    true
}

/// Default webhook request timeout in seconds
pub fn default_webhook_timeout() -> u64 {
    30
}

/// Default log level
pub fn default_log_level() -> String {
    "info".to_string()
}

/// Keywords in an upstream error message that mark a channel as unusable
pub fn default_disable_keywords() -> Vec<String> {
    [
        "Your credit balance is too low",
        "This organization has been disabled.",
        "You exceeded your current quota",
        "Permission denied",
        "The security token included in the request is invalid",
        "Operation not allowed",
        "Your account is not authorized",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Ports outbound webhook requests may target
pub fn default_allowed_ports() -> Vec<String> {
    ["80", "443", "8080", "8443"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
