//! Common test utilities for litellm-channel-health
//!
//! This module provides shared test infrastructure for all tests:
//! - An in-memory [`ChannelStore`](litellm_channel_health::ChannelStore)
//! - A recording [`NotificationRouter`](litellm_channel_health::NotificationRouter)
//! - Channel and upstream error factories

pub mod fixtures;
pub mod store;

// Re-export commonly used items
pub use fixtures::{ChannelFactory, ErrorFactory};
pub use store::{InMemoryChannelStore, RecordingRouter};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
