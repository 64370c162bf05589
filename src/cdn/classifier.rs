//! The five-signal CDN decision procedure.

use std::net::IpAddr;

use reqwest::header::HeaderMap;

use super::tables::{normalize_cname, CdnTables};

/// Observed facts about one target that the classifier inspects.
#[derive(Debug, Clone, Copy)]
pub struct CdnSignals<'a> {
    /// Resolved addresses; unparsable entries are ignored
    pub ips: &'a [String],
    pub headers: &'a HeaderMap,
    /// Comma-separated CIDR list from the ASN lookup
    pub cidr: &'a str,
    /// ASN from the ASN lookup, e.g. `AS13335`
    pub asn: &'a str,
    /// CNAME chain
    pub cnames: &'a [String],
}

/// Evidence record produced by `classify`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CdnEvidence {
    pub by_ip: bool,
    /// `"Header: Value"` for each reference header present
    pub by_header: Vec<String>,
    pub by_cidr: bool,
    pub by_asn: bool,
    pub by_cname: bool,
}

impl CdnEvidence {
    /// True iff any signal fired.
    pub fn is_cdn(&self) -> bool {
        self.by_ip || !self.by_header.is_empty() || self.by_cidr || self.by_asn || self.by_cname
    }

    /// The verdict code written to the result: 1 for CDN, 0 otherwise.
    pub fn verdict(&self) -> u8 {
        u8::from(self.is_cdn())
    }
}

/// Runs all five checks against the reference tables.
///
/// Every check is evaluated even when an earlier one already fired, so the
/// evidence is complete. A disabled table makes its check return `false`.
pub fn classify(signals: CdnSignals<'_>, tables: &CdnTables) -> CdnEvidence {
    CdnEvidence {
        by_ip: check_ips(signals.ips, tables),
        by_header: check_headers(signals.headers, tables),
        by_cidr: check_cidr(signals.cidr, tables),
        by_asn: check_asn(signals.asn, tables),
        by_cname: check_cnames(signals.cnames, tables),
    }
}

fn check_ips(ips: &[String], tables: &CdnTables) -> bool {
    let Some(intel) = &tables.ip_intel else {
        return false;
    };
    ips.iter()
        .filter_map(|raw| raw.trim().parse::<IpAddr>().ok())
        .any(|ip| match intel.provider_for(ip) {
            Some(provider) => {
                log::debug!("{ip} belongs to CDN provider {provider}");
                true
            }
            None => false,
        })
}

fn check_headers(headers: &HeaderMap, tables: &CdnTables) -> Vec<String> {
    let Some(names) = &tables.headers else {
        return Vec::new();
    };
    names
        .iter()
        .filter_map(|name| {
            let value = headers.get(name.as_str())?;
            let value = String::from_utf8_lossy(value.as_bytes());
            let value = value.trim();
            (!value.is_empty()).then(|| format!("{name}: {value}"))
        })
        .collect()
}

fn check_cidr(cidr: &str, tables: &CdnTables) -> bool {
    let Some(known) = &tables.cidrs else {
        return false;
    };
    cidr.split(',')
        .map(str::trim)
        .any(|c| !c.is_empty() && known.contains(c))
}

fn check_asn(asn: &str, tables: &CdnTables) -> bool {
    let Some(known) = &tables.asns else {
        return false;
    };
    let asn = asn.trim();
    !asn.is_empty() && known.contains(asn)
}

/// A CNAME matches when it, or any parent domain of it, is a table key.
fn check_cnames(cnames: &[String], tables: &CdnTables) -> bool {
    let Some(known) = &tables.cnames else {
        return false;
    };
    cnames.iter().any(|cname| {
        let name = normalize_cname(cname);
        let hit = parent_domains(&name).find_map(|suffix| known.get(suffix));
        match hit {
            Some(provider) => {
                log::debug!("CNAME {cname} points at {provider}");
                true
            }
            None => false,
        }
    })
}

/// `a.b.c` yields `a.b.c`, `b.c`, `c`.
fn parent_domains(name: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(name);
    std::iter::from_fn(move || {
        let current = rest.filter(|r| !r.is_empty())?;
        rest = current.split_once('.').map(|(_, tail)| tail);
        Some(current)
    })
}
