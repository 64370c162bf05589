//! ASN evidence provider.
//!
//! Maps addresses to the announcing network (CIDR, ASN, organization,
//! country). The provider owns an independent resolver so passive enrichment
//! sees a second address set besides the DNS provider's.

mod maxmind;

use std::net::IpAddr;

use futures::future::BoxFuture;

use crate::error_handling::DnsError;

pub use maxmind::MaxMindAsn;

/// Network facts for one address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsnInfo {
    /// Announced prefix, e.g. `104.16.0.0/13`
    pub cidr: String,
    /// `AS` + number, e.g. `AS13335`
    pub asn: String,
    pub org: String,
    /// ISO country code
    pub country: String,
}

impl AsnInfo {
    pub fn is_empty(&self) -> bool {
        *self == AsnInfo::default()
    }
}

/// Address-to-network lookup with its own resolver.
pub trait AsnLookup: Send + Sync {
    /// Resolves `host` independently of the DNS provider.
    fn resolve_ips<'a>(&'a self, host: &'a str) -> BoxFuture<'a, Result<Vec<IpAddr>, DnsError>>;

    /// Network facts for `ip`, or `None` when no database has a record.
    fn lookup(&self, ip: IpAddr) -> Option<AsnInfo>;
}

/// ASN facts of the first address that has a record.
pub fn first_asn_record(provider: &dyn AsnLookup, ips: &[IpAddr]) -> Option<AsnInfo> {
    ips.iter().find_map(|ip| provider.lookup(*ip))
}
