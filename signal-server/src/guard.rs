//! Access guard - source address filtering
//!
//! Validates the peer address of each request against the configured
//! allow-list. Development mode disables the check entirely.

use std::net::IpAddr;

use crate::types::{RuntimeMode, ServerConfig};

/// Source address allow-list enforcement
#[derive(Debug, Clone)]
pub struct AccessGuard {
    allowed: Vec<IpAddr>,
    mode: RuntimeMode,
}

impl AccessGuard {
    /// Create a new AccessGuard from config
    ///
    /// Entries that are not valid IP addresses are logged and skipped.
    pub fn new(config: &ServerConfig, mode: RuntimeMode) -> Self {
        let allowed = config
            .allowed_ips
            .iter()
            .filter_map(|entry| match entry.trim().parse::<IpAddr>() {
                Ok(ip) => Some(canonical_ip(ip)),
                Err(e) => {
                    tracing::warn!("Ignoring invalid allowed IP '{}': {}", entry, e);
                    None
                }
            })
            .collect();

        Self { allowed, mode }
    }

    /// Check if a peer address may use the relay
    pub fn is_allowed(&self, peer: IpAddr) -> bool {
        if self.mode.is_development() {
            return true;
        }
        self.allowed.contains(&canonical_ip(peer))
    }
}

/// Unwrap IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) to plain IPv4
pub fn canonical_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(ip),
        IpAddr::V4(_) => ip,
    }
}
