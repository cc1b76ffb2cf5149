//! Channel identity and upstream failure types
//!
//! A channel is one configured route (credential set) to an upstream
//! provider. These are the values the health controller reasons about.

pub mod types;

pub use types::{ChannelError, ChannelStatus, ChannelType, UpstreamError};
