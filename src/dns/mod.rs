//! DNS evidence provider.
//!
//! This module resolves the hostname of a target to its CNAME chain and
//! addresses using `hickory-resolver`:
//! - `HostResolver` is the seam the pipeline calls through
//! - `HickoryHostResolver` answers from one A/AAAA lookup, collecting the CNAME
//!   records that led to the addresses
//! - `load_resolver_list` reads the upstream servers to query

mod resolution;
mod resolvers;

use std::net::IpAddr;

use futures::future::BoxFuture;

use crate::error_handling::DnsError;

pub use resolution::HickoryHostResolver;
pub use resolvers::load_resolver_list;

/// CNAME chain and addresses of one hostname.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostResolution {
    /// Canonical names in the order they were followed, without trailing dots
    pub cnames: Vec<String>,
    pub ips: Vec<IpAddr>,
}

/// Resolves hostnames for passive enrichment.
pub trait HostResolver: Send + Sync {
    /// Resolves `host`. A name with no records is an empty resolution, not an error.
    fn resolve<'a>(&'a self, host: &'a str) -> BoxFuture<'a, Result<HostResolution, DnsError>>;
}
