//! CDN classification engine.
//!
//! Five independent evidence signals decide whether a target is CDN-fronted:
//! IP intelligence, response headers, CIDR, ASN and CNAME. Every signal is
//! evaluated for every target so the evidence record is always complete.

mod classifier;
mod ip_ranges;
mod tables;

pub use classifier::{classify, CdnEvidence, CdnSignals};
pub use ip_ranges::{CdnIpRanges, Cidr, IpIntelligence};
pub use tables::{read_json_table, CdnTables};
