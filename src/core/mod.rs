//! Core functionality for channel health management
//!
//! This module contains the channel model, the health controller and the
//! webhook notification path it reports through.

pub mod channel;
pub mod health;
pub mod webhooks;
