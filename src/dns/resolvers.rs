//! Upstream resolver list loading.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;

const DNS_PORT: u16 = 53;

/// Parses a newline-delimited resolver list.
///
/// Blank lines and `#` comments are dropped, entries may carry a port
/// (`1.1.1.1:53`, `[2606:4700::1111]:53`), duplicates are removed and the
/// first-seen order is kept. Unparsable entries are skipped with a warning.
pub fn parse_resolver_list(content: &str) -> Vec<SocketAddr> {
    let mut servers = Vec::new();
    for line in content.lines() {
        let entry = line.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }
        let parsed = entry
            .parse::<SocketAddr>()
            .ok()
            .or_else(|| entry.parse::<IpAddr>().ok().map(|ip| SocketAddr::new(ip, DNS_PORT)));
        match parsed {
            Some(addr) if !servers.contains(&addr) => servers.push(addr),
            Some(_) => {}
            None => log::warn!("Ignoring invalid resolver entry: {entry}"),
        }
    }
    servers
}

/// Reads the resolver list at `path`.
///
/// A missing or unreadable file yields an empty list, which selects the
/// default upstream resolvers.
pub fn load_resolver_list(path: &Path) -> Vec<SocketAddr> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let servers = parse_resolver_list(&content);
            log::debug!("Loaded {} resolvers from {}", servers.len(), path.display());
            servers
        }
        Err(e) => {
            log::warn!(
                "Failed to read resolver list {}: {e}; using default resolvers",
                path.display()
            );
            Vec::new()
        }
    }
}
