//! Integration tests for litellm-channel-health
//!
//! These tests drive the public API end to end: an upstream failure goes
//! through classification and the store transition, and the resulting
//! notification reaches a mock webhook server.

pub mod config_tests;
pub mod pipeline_tests;
