//! Channel auto-disable / auto-enable configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Switches and keyword list driving automatic channel health decisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelHealthConfig {
    /// Disable a channel automatically when an upstream error qualifies
    #[serde(default = "default_true")]
    pub automatic_disable_enabled: bool,
    /// Re-enable an auto-disabled channel once a request succeeds
    #[serde(default = "default_true")]
    pub automatic_enable_enabled: bool,
    /// Case-insensitive substrings of an error message that qualify for disable
    #[serde(default = "default_disable_keywords")]
    pub disable_keywords: Vec<String>,
}

impl Default for ChannelHealthConfig {
    fn default() -> Self {
        Self {
            automatic_disable_enabled: true,
            automatic_enable_enabled: true,
            disable_keywords: default_disable_keywords(),
        }
    }
}

impl ChannelHealthConfig {
    /// Parse a newline-separated keyword list, dropping blank lines
    pub fn parse_keywords(raw: &str) -> Vec<String> {
        raw.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}
