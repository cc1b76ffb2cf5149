//! Error handling for the channel health core
//!
//! This module defines all error types used throughout the crate.

#![allow(missing_docs)]

mod conversions;
mod helpers;
mod types;
mod webhook;

pub use types::{GatewayError, Result};
pub use webhook::WebhookError;
