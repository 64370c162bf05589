//! DNS resolver initialization.
//!
//! This module provides functions to initialize DNS resolvers with proper
//! timeout configuration.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::{
    NameServerConfig, NameServerConfigGroup, Protocol, ResolverConfig, ResolverOpts,
};
use hickory_resolver::TokioAsyncResolver;

use crate::config::{DNS_ATTEMPTS, DNS_TIMEOUT_SECS};

/// Initializes a DNS resolver for hostname lookups.
///
/// With an empty `nameservers` list the resolver uses the default upstream
/// configuration (Google DNS). Otherwise every address is queried over UDP with
/// TCP fallback, in the order given.
///
/// Timeouts are kept short so a slow or unresponsive server cannot hold a
/// worker for long.
///
/// # Returns
///
/// A configured `TokioAsyncResolver` wrapped in `Arc` for sharing across tasks.
pub fn init_resolver(nameservers: &[SocketAddr]) -> Arc<TokioAsyncResolver> {
    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(DNS_TIMEOUT_SECS);
    opts.attempts = DNS_ATTEMPTS;
    // Prevent search domain appending
    opts.ndots = 0;

    Arc::new(TokioAsyncResolver::tokio(resolver_config(nameservers), opts))
}

fn resolver_config(nameservers: &[SocketAddr]) -> ResolverConfig {
    if nameservers.is_empty() {
        ResolverConfig::default()
    } else {
        let servers: Vec<NameServerConfig> = nameservers
            .iter()
            .flat_map(|addr| {
                [
                    NameServerConfig::new(*addr, Protocol::Udp),
                    NameServerConfig::new(*addr, Protocol::Tcp),
                ]
            })
            .collect();
        ResolverConfig::from_parts(None, vec![], NameServerConfigGroup::from(servers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_upstreams() {
        assert!(!resolver_config(&[]).name_servers().is_empty());
    }

    #[test]
    fn test_custom_servers_keep_order() {
        let servers: Vec<SocketAddr> = vec![
            "1.1.1.1:53".parse().unwrap(),
            "9.9.9.9:5353".parse().unwrap(),
        ];
        let config = resolver_config(&servers);
        let configured: Vec<SocketAddr> = config
            .name_servers()
            .iter()
            .map(|ns| ns.socket_addr)
            .collect();
        assert_eq!(configured.len(), 4);
        assert_eq!(configured[0], servers[0]);
        assert_eq!(configured[2], servers[1]);
    }

    #[tokio::test]
    async fn test_init_resolver_builds() {
        let _resolver = init_resolver(&["127.0.0.1:53".parse().unwrap()]);
    }
}
