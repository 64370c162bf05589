//! ASN lookups from MaxMind GeoLite2 databases.

use std::net::IpAddr;
use std::path::Path;

use futures::future::BoxFuture;
use maxminddb::{geoip2, Reader};

use super::{AsnInfo, AsnLookup};
use crate::dns::{HickoryHostResolver, HostResolver};
use crate::error_handling::{DnsError, ReferenceDataError};

fn open_reader(path: &Path) -> Result<Reader<Vec<u8>>, ReferenceDataError> {
    let bytes = std::fs::read(path).map_err(|source| ReferenceDataError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Reader::from_source(bytes).map_err(|e| ReferenceDataError::Database {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn open_optional(path: Option<&Path>, kind: &str) -> Option<Reader<Vec<u8>>> {
    let path = path?;
    match open_reader(path) {
        Ok(reader) => {
            log::info!(
                "Loaded {kind} database {} (build epoch {})",
                path.display(),
                reader.metadata.build_epoch
            );
            Some(reader)
        }
        Err(e) => {
            log::warn!("{kind} lookups disabled: {e}");
            None
        }
    }
}

/// `AsnLookup` backed by a GeoLite2-ASN database and an optional
/// GeoLite2-Country (or City) database.
///
/// Either database may be absent; lookups then only fill the fields the
/// loaded databases provide.
pub struct MaxMindAsn {
    asn_db: Option<Reader<Vec<u8>>>,
    country_db: Option<Reader<Vec<u8>>>,
    resolver: HickoryHostResolver,
}

impl MaxMindAsn {
    /// Opens the databases at the given paths. Unreadable databases are
    /// logged and skipped.
    pub fn open(
        asn_path: Option<&Path>,
        country_path: Option<&Path>,
        resolver: HickoryHostResolver,
    ) -> Self {
        MaxMindAsn {
            asn_db: open_optional(asn_path, "ASN"),
            country_db: open_optional(country_path, "Country"),
            resolver,
        }
    }

    /// Whether any database is loaded.
    pub fn is_enabled(&self) -> bool {
        self.asn_db.is_some() || self.country_db.is_some()
    }

    fn lookup_asn(&self, ip: IpAddr, info: &mut AsnInfo) {
        let Some(reader) = &self.asn_db else {
            return;
        };
        let Ok(result) = reader.lookup(ip) else {
            return;
        };
        if !result.has_data() {
            return;
        }
        if let Ok(network) = result.network() {
            info.cidr = network.to_string();
        }
        if let Ok(Some(record)) = result.decode::<geoip2::Asn>() {
            if let Some(number) = record.autonomous_system_number {
                info.asn = format!("AS{number}");
            }
            if let Some(org) = record.autonomous_system_organization {
                info.org = org.to_string();
            }
        }
    }

    fn lookup_country(&self, ip: IpAddr, info: &mut AsnInfo) {
        let Some(reader) = &self.country_db else {
            return;
        };
        let Ok(result) = reader.lookup(ip) else {
            return;
        };
        if !result.has_data() {
            return;
        }
        if let Ok(Some(record)) = result.decode::<geoip2::Country>() {
            if let Some(code) = record.country.iso_code {
                info.country = code.to_string();
            }
        }
    }
}

impl AsnLookup for MaxMindAsn {
    fn resolve_ips<'a>(&'a self, host: &'a str) -> BoxFuture<'a, Result<Vec<IpAddr>, DnsError>> {
        Box::pin(async move { Ok(self.resolver.resolve(host).await?.ips) })
    }

    fn lookup(&self, ip: IpAddr) -> Option<AsnInfo> {
        let mut info = AsnInfo::default();
        self.lookup_asn(ip, &mut info);
        self.lookup_country(ip, &mut info);
        (!info.is_empty()).then_some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initialization::init_resolver;

    fn provider(asn: Option<&Path>, country: Option<&Path>) -> MaxMindAsn {
        MaxMindAsn::open(asn, country, HickoryHostResolver::new(init_resolver(&[])))
    }

    #[tokio::test]
    async fn test_without_databases_lookups_are_empty() {
        let asn = provider(None, None);
        assert!(!asn.is_enabled());
        assert_eq!(asn.lookup("1.1.1.1".parse().unwrap()), None);
    }

    #[tokio::test]
    async fn test_unreadable_database_is_skipped() {
        let dir = tempfile::TempDir::new().unwrap();
        let garbage = dir.path().join("GeoLite2-ASN.mmdb");
        std::fs::write(&garbage, b"definitely not an mmdb file").unwrap();
        let missing = dir.path().join("GeoLite2-Country.mmdb");

        let asn = provider(Some(&garbage), Some(&missing));
        assert!(!asn.is_enabled());
    }

    #[tokio::test]
    async fn test_own_resolver_handles_ip_literals() {
        let asn = provider(None, None);
        let ips = asn.resolve_ips("127.0.0.1").await.unwrap();
        assert_eq!(ips, vec!["127.0.0.1".parse::<IpAddr>().unwrap()]);
    }
}
