//! Reference tables for the CDN checks.
//!
//! Each table is loaded once at startup. A table that is missing or malformed
//! disables only its own check: the check then contributes `false` and a
//! warning is logged.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::ip_ranges::{CdnIpRanges, IpIntelligence};
use crate::config::DataFiles;
use crate::error_handling::ReferenceDataError;

/// Reads and parses one JSON reference table.
///
/// # Errors
///
/// Returns `ReferenceDataError::Read` if the file cannot be read and
/// `ReferenceDataError::Parse` if it is not JSON of the expected shape.
pub fn read_json_table<T: DeserializeOwned>(path: &Path) -> Result<T, ReferenceDataError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ReferenceDataError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ReferenceDataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn load_or_disable<T: DeserializeOwned>(path: &Path, check: &str) -> Option<T> {
    match read_json_table(path) {
        Ok(table) => Some(table),
        Err(e) => {
            log::warn!("CDN check by {check} disabled: {e}");
            None
        }
    }
}

/// All reference data used by the classifier. `None` means the check is disabled.
#[derive(Clone, Default)]
pub struct CdnTables {
    /// Header names whose presence indicates CDN fronting
    pub headers: Option<Vec<String>>,
    /// Known CDN CIDR blocks, compared as exact strings
    pub cidrs: Option<HashSet<String>>,
    /// Known CDN ASNs, compared as exact strings
    pub asns: Option<HashSet<String>>,
    /// CNAME -> provider label
    pub cnames: Option<HashMap<String, String>>,
    /// Provider of known CDN address ranges
    pub ip_intel: Option<Arc<dyn IpIntelligence>>,
}

impl std::fmt::Debug for CdnTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdnTables")
            .field("headers", &self.headers.as_ref().map(Vec::len))
            .field("cidrs", &self.cidrs.as_ref().map(HashSet::len))
            .field("asns", &self.asns.as_ref().map(HashSet::len))
            .field("cnames", &self.cnames.as_ref().map(HashMap::len))
            .field("ip_intel", &self.ip_intel.is_some())
            .finish()
    }
}

impl CdnTables {
    /// Loads every table from `files`, disabling the checks whose table fails.
    pub fn load(files: &DataFiles) -> Self {
        let headers: Option<Vec<String>> = load_or_disable(&files.cdn_headers, "header");
        let cidrs: Option<Vec<String>> = load_or_disable(&files.cdn_cidrs, "CIDR");
        let asns: Option<Vec<String>> = load_or_disable(&files.cdn_asns, "ASN");
        let cnames: Option<HashMap<String, String>> =
            load_or_disable(&files.cdn_cnames, "CNAME");
        let ranges: Option<BTreeMap<String, Vec<String>>> =
            load_or_disable(&files.cdn_ip_ranges, "IP");

        let tables = CdnTables {
            headers,
            cidrs: cidrs.map(non_empty_set),
            asns: asns.map(non_empty_set),
            cnames: cnames.map(|map| {
                map.into_iter()
                    .map(|(k, v)| (normalize_cname(&k), v))
                    .collect()
            }),
            ip_intel: ranges.map(|table| {
                Arc::new(CdnIpRanges::from_table(table)) as Arc<dyn IpIntelligence>
            }),
        };
        log::debug!("Loaded CDN reference tables: {tables:?}");
        tables
    }
}

fn non_empty_set(values: Vec<String>) -> HashSet<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Lowercases a hostname and drops the root label dot.
pub(crate) fn normalize_cname(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) {
        std::fs::write(dir.path().join(name), body).unwrap();
    }

    #[test]
    fn test_load_all_tables() {
        let dir = TempDir::new().unwrap();
        write(&dir, "cdn_header_keys.json", r#"["cf-ray", "x-amz-cf-id"]"#);
        write(&dir, "cdn_ip_cidr.json", r#"["104.16.0.0/13", ""]"#);
        write(&dir, "cdn_asn_list.json", r#"["AS13335"]"#);
        write(
            &dir,
            "cdn_cname_keywords.json",
            r#"{"D111.cloudfront.net.": "CloudFront"}"#,
        );
        write(
            &dir,
            "cdn_ip_ranges.json",
            r#"{"cloudflare": ["104.16.0.0/13"]}"#,
        );

        let tables = CdnTables::load(&DataFiles::in_dir(dir.path()));
        assert_eq!(tables.headers.as_ref().unwrap().len(), 2);
        assert_eq!(tables.cidrs.as_ref().unwrap().len(), 1);
        assert!(tables.asns.as_ref().unwrap().contains("AS13335"));
        assert_eq!(
            tables.cnames.as_ref().unwrap().get("d111.cloudfront.net"),
            Some(&"CloudFront".to_string())
        );
        let ip: IpAddr = "104.16.1.1".parse().unwrap();
        assert_eq!(
            tables.ip_intel.as_ref().unwrap().provider_for(ip),
            Some("cloudflare")
        );
    }

    #[test]
    fn test_missing_and_malformed_tables_disable_their_check() {
        let dir = TempDir::new().unwrap();
        write(&dir, "cdn_header_keys.json", r#"["cf-ray"]"#);
        write(&dir, "cdn_asn_list.json", r#"{"not": "a list"}"#);

        let tables = CdnTables::load(&DataFiles::in_dir(dir.path()));
        assert!(tables.headers.is_some());
        assert!(tables.asns.is_none());
        assert!(tables.cidrs.is_none());
        assert!(tables.cnames.is_none());
        assert!(tables.ip_intel.is_none());
    }

    #[test]
    fn test_read_json_table_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            read_json_table::<Vec<String>>(&missing),
            Err(ReferenceDataError::Read { .. })
        ));

        write(&dir, "bad.json", "[1, 2");
        assert!(matches!(
            read_json_table::<Vec<String>>(&dir.path().join("bad.json")),
            Err(ReferenceDataError::Parse { .. })
        ));
    }
}
