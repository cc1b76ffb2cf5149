//! Error handling utilities
//!
//! This module provides the gateway error type and the webhook delivery error taxonomy.

pub mod error;

// Re-export commonly used types
pub use error::*;
