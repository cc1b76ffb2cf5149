//! Outbound fetch (SSRF protection) settings

use super::*;
use serde::{Deserialize, Serialize};

/// How a domain or IP list is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Listed entries are denied, everything else is allowed
    #[default]
    Blacklist,
    /// Only listed entries are allowed
    Whitelist,
}

/// SSRF protection applied to outbound requests made directly by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSetting {
    #[serde(default = "default_true")]
    pub enable_ssrf_protection: bool,
    #[serde(default)]
    pub allow_private_ip: bool,
    #[serde(default)]
    pub domain_filter_mode: FilterMode,
    #[serde(default)]
    pub ip_filter_mode: FilterMode,
    /// Domains, either exact (`example.com`, that host only) or `*.example.com` (its subdomains)
    #[serde(default)]
    pub domain_list: Vec<String>,
    /// Single addresses or CIDR ranges
    #[serde(default)]
    pub ip_list: Vec<String>,
    /// Single ports (`443`) or inclusive ranges (`8000-9000`); empty allows all
    #[serde(default = "default_allowed_ports")]
    pub allowed_ports: Vec<String>,
    /// Resolve domain names and apply the IP checks to every resolved address
    #[serde(default)]
    pub apply_ip_filter_for_domain: bool,
}

impl Default for FetchSetting {
    fn default() -> Self {
        Self {
            enable_ssrf_protection: true,
            allow_private_ip: false,
            domain_filter_mode: FilterMode::Blacklist,
            ip_filter_mode: FilterMode::Blacklist,
            domain_list: Vec::new(),
            ip_list: Vec::new(),
            allowed_ports: default_allowed_ports(),
            apply_ip_filter_for_domain: false,
        }
    }
}

impl FetchSetting {
    /// Settings with protection switched off entirely
    pub fn disabled() -> Self {
        Self {
            enable_ssrf_protection: false,
            ..Default::default()
        }
    }
}
