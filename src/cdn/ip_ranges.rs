//! IP intelligence backed by a table of known CDN address ranges.

use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Answers "does this address belong to a known CDN network?".
pub trait IpIntelligence: Send + Sync {
    /// Name of the CDN provider owning `ip`, if any.
    fn provider_for(&self, ip: IpAddr) -> Option<&str>;
}

/// An IPv4 or IPv6 network in prefix notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    network: IpAddr,
    prefix_len: u8,
}

impl Cidr {
    /// Whether `ip` falls inside this network. Families never match each other.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (ip, &self.network) {
            (IpAddr::V4(ip), IpAddr::V4(net)) => {
                let mask = u32::MAX
                    .checked_shl(32 - u32::from(self.prefix_len))
                    .unwrap_or(0);
                (u32::from(*ip) & mask) == (u32::from(*net) & mask)
            }
            (IpAddr::V6(ip), IpAddr::V6(net)) => {
                let mask = u128::MAX
                    .checked_shl(128 - u32::from(self.prefix_len))
                    .unwrap_or(0);
                (u128::from(*ip) & mask) == (u128::from(*net) & mask)
            }
            _ => false,
        }
    }
}

impl FromStr for Cidr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr, prefix) = match s.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (s, None),
        };
        let network: IpAddr = addr
            .parse()
            .map_err(|_| format!("invalid network address in {s:?}"))?;
        let max = if network.is_ipv4() { 32 } else { 128 };
        let prefix_len = match prefix {
            Some(p) => p
                .parse::<u8>()
                .ok()
                .filter(|len| *len <= max)
                .ok_or_else(|| format!("invalid prefix length in {s:?}"))?,
            None => max,
        };
        Ok(Cidr {
            network,
            prefix_len,
        })
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

/// Known CDN ranges, grouped by provider.
///
/// Loaded from a JSON object mapping a provider name to its list of CIDR
/// strings. Unparsable entries are dropped at construction.
#[derive(Debug, Clone, Default)]
pub struct CdnIpRanges {
    ranges: Vec<(String, Cidr)>,
}

impl CdnIpRanges {
    /// Builds the range table, skipping entries that are not valid CIDRs.
    pub fn from_table(table: BTreeMap<String, Vec<String>>) -> Self {
        let mut ranges = Vec::new();
        for (provider, cidrs) in table {
            for raw in cidrs {
                match raw.parse::<Cidr>() {
                    Ok(cidr) => ranges.push((provider.clone(), cidr)),
                    Err(e) => log::debug!("Ignoring CDN range for {provider}: {e}"),
                }
            }
        }
        CdnIpRanges { ranges }
    }

    /// Number of usable ranges.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl IpIntelligence for CdnIpRanges {
    fn provider_for(&self, ip: IpAddr) -> Option<&str> {
        self.ranges
            .iter()
            .find(|(_, cidr)| cidr.contains(&ip))
            .map(|(provider, _)| provider.as_str())
    }
}
