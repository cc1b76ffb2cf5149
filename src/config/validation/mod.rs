//! Configuration validation
//!
//! This module provides validation logic for all configuration structures.
//!
//! The validation is organized into several submodules:
//! - `ssrf`: SSRF protection for outbound webhook URLs
//! - `trait_def`: Core Validate trait definition
//! - `config_validators`: Validators for the configuration sections
//! - `tests`: Test suite for all validators

mod config_validators;
pub mod ssrf;
mod trait_def;

pub use trait_def::Validate;

pub use ssrf::{
    EgressPolicy, EgressViolation, FetchSettingPolicy, validate_url_with_fetch_setting,
};
