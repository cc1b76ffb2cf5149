//! SSRF (Server-Side Request Forgery) protection utilities
//!
//! Outbound webhook URLs are checked against a [`FetchSetting`] before the
//! gateway opens a connection to them: scheme, port allow-list, domain and IP
//! filter lists, and private or internal address ranges.

use crate::config::models::{FetchSetting, FilterMode};
use async_trait::async_trait;
use ipnet::IpNet;
use std::net::IpAddr;
use thiserror::Error;
use tracing::debug;
use url::{Host, Url};

/// Host names that always point inside the network
const INTERNAL_HOSTS: &[&str] = &[
    "localhost",
    "metadata.google.internal",
    "metadata",
    "internal",
    "local",
];

/// Reason an outbound URL was declined
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EgressViolation {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL scheme must be http or https, got: {0}")]
    InvalidScheme(String),

    #[error("URL must include a hostname")]
    MissingHost,

    #[error("port {0} is not in the allowed port list")]
    PortNotAllowed(u16),

    #[error("domain '{0}' is not allowed")]
    DomainNotAllowed(String),

    #[error("IP address {0} is not allowed")]
    IpNotAllowed(IpAddr),

    #[error("'{0}' is a private or internal address")]
    PrivateAddress(String),

    #[error("failed to resolve '{host}': {message}")]
    Resolution { host: String, message: String },
}

/// Pre-flight check applied to every URL the gateway calls directly
#[async_trait]
pub trait EgressPolicy: Send + Sync {
    async fn validate(&self, url: &str, setting: &FetchSetting) -> Result<(), EgressViolation>;
}

/// [`EgressPolicy`] implementing the full [`FetchSetting`] semantics
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchSettingPolicy;

#[async_trait]
impl EgressPolicy for FetchSettingPolicy {
    async fn validate(&self, url: &str, setting: &FetchSetting) -> Result<(), EgressViolation> {
        validate_url_with_fetch_setting(url, setting).await
    }
}

/// Validate a URL against the fetch setting.
///
/// With `apply_ip_filter_for_domain` the host name is resolved and every
/// resulting address must pass the IP checks.
pub async fn validate_url_with_fetch_setting(
    url_str: &str,
    setting: &FetchSetting,
) -> Result<(), EgressViolation> {
    if !setting.enable_ssrf_protection {
        return Ok(());
    }

    let url = Url::parse(url_str).map_err(|e| EgressViolation::InvalidUrl(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(EgressViolation::InvalidScheme(scheme.to_string())),
    }

    // Url normalizes decimal, octal and hex encoded IPv4 hosts for http(s),
    // so `Host::Ipv4` covers those spellings too.
    let host = url.host().ok_or(EgressViolation::MissingHost)?;
    let port = url
        .port_or_known_default()
        .ok_or(EgressViolation::MissingHost)?;
    check_port(port, &setting.allowed_ports)?;

    match host {
        Host::Ipv4(ip) => check_ip(IpAddr::V4(ip), setting),
        Host::Ipv6(ip) => check_ip(IpAddr::V6(ip), setting),
        Host::Domain(domain) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();

            if !setting.allow_private_ip && is_internal_host(&domain) {
                return Err(EgressViolation::PrivateAddress(domain));
            }
            check_domain(&domain, setting)?;

            if !setting.apply_ip_filter_for_domain {
                return Ok(());
            }

            let addrs = tokio::net::lookup_host((domain.as_str(), port))
                .await
                .map_err(|e| EgressViolation::Resolution {
                    host: domain.clone(),
                    message: e.to_string(),
                })?;

            let mut resolved = 0usize;
            for addr in addrs {
                resolved += 1;
                check_ip(addr.ip(), setting)?;
            }
            if resolved == 0 {
                return Err(EgressViolation::Resolution {
                    host: domain,
                    message: "no addresses returned".to_string(),
                });
            }

            debug!(resolved, "All resolved addresses passed the IP filter");
            Ok(())
        }
    }
}

/// Parse an allowed-port entry: `443` or an inclusive range `8000-9000`
pub(crate) fn parse_port_rule(rule: &str) -> Option<(u16, u16)> {
    let rule = rule.trim();
    match rule.split_once('-') {
        Some((lo, hi)) => {
            let lo: u16 = lo.trim().parse().ok()?;
            let hi: u16 = hi.trim().parse().ok()?;
            (lo <= hi).then_some((lo, hi))
        }
        None => rule.parse().ok().map(|p| (p, p)),
    }
}

/// Parse an IP list entry: a single address or a CIDR range
pub(crate) fn parse_ip_rule(rule: &str) -> Option<IpNet> {
    let rule = rule.trim();
    if let Ok(net) = rule.parse::<IpNet>() {
        return Some(net);
    }
    let ip: IpAddr = rule.parse().ok()?;
    let prefix = if ip.is_ipv4() { 32 } else { 128 };
    IpNet::new(ip, prefix).ok()
}

fn check_port(port: u16, rules: &[String]) -> Result<(), EgressViolation> {
    if rules.is_empty() {
        return Ok(());
    }

    let allowed = rules
        .iter()
        .filter_map(|r| parse_port_rule(r))
        .any(|(lo, hi)| (lo..=hi).contains(&port));

    if allowed {
        Ok(())
    } else {
        Err(EgressViolation::PortNotAllowed(port))
    }
}

fn check_ip(ip: IpAddr, setting: &FetchSetting) -> Result<(), EgressViolation> {
    if !setting.allow_private_ip && is_private_or_internal_ip(&ip) {
        return Err(EgressViolation::PrivateAddress(ip.to_string()));
    }

    let listed = setting
        .ip_list
        .iter()
        .filter_map(|e| parse_ip_rule(e))
        .any(|net| net.contains(&ip));

    match (setting.ip_filter_mode, listed) {
        (FilterMode::Whitelist, false) | (FilterMode::Blacklist, true) => {
            Err(EgressViolation::IpNotAllowed(ip))
        }
        _ => Ok(()),
    }
}

fn check_domain(domain: &str, setting: &FetchSetting) -> Result<(), EgressViolation> {
    let listed = setting
        .domain_list
        .iter()
        .any(|rule| domain_matches(domain, rule));

    match (setting.domain_filter_mode, listed) {
        (FilterMode::Whitelist, false) | (FilterMode::Blacklist, true) => {
            Err(EgressViolation::DomainNotAllowed(domain.to_string()))
        }
        _ => Ok(()),
    }
}

/// `example.com` matches only itself; `*.example.com` only its subdomains
fn domain_matches(domain: &str, rule: &str) -> bool {
    let rule = rule.trim().trim_end_matches('.').to_ascii_lowercase();
    if rule.is_empty() {
        return false;
    }

    match rule.strip_prefix("*.") {
        Some(suffix) => domain.ends_with(&format!(".{}", suffix)),
        None => domain == rule,
    }
}

fn is_internal_host(domain: &str) -> bool {
    INTERNAL_HOSTS
        .iter()
        .any(|blocked| domain == *blocked || domain.ends_with(&format!(".{}", blocked)))
}

/// Check if an IP address is private, internal, or reserved
fn is_private_or_internal_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            // Loopback (127.0.0.0/8)
            ipv4.is_loopback()
            // Private networks (RFC 1918)
            || ipv4.is_private()
            // Link-local (169.254.0.0/16) - includes cloud metadata endpoints
            || ipv4.is_link_local()
            || ipv4.is_broadcast()
            || ipv4.is_documentation()
            || ipv4.is_unspecified()
            // Shared address space (100.64.0.0/10) - RFC 6598
            || (ipv4.octets()[0] == 100 && (ipv4.octets()[1] & 0xC0) == 64)
            // Reserved (240.0.0.0/4)
            || ipv4.octets()[0] >= 240
        }
        IpAddr::V6(ipv6) => {
            ipv6.is_loopback()
            || ipv6.is_unspecified()
            // Unique local (fc00::/7)
            || ((ipv6.segments()[0] & 0xfe00) == 0xfc00)
            // Link-local (fe80::/10)
            || ((ipv6.segments()[0] & 0xffc0) == 0xfe80)
            // IPv4-mapped addresses - check the embedded IPv4
            || ipv6.to_ipv4_mapped().is_some_and(|ipv4| {
                is_private_or_internal_ip(&IpAddr::V4(ipv4))
            })
        }
    }
}
