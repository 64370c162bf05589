//! edge_status library: URL probing and CDN classification
//!
//! This library reads a list of targets, fetches each one, optionally enriches
//! it with DNS, ASN and CDN evidence and a regex scan of the response body, and
//! streams one JSON record per target.
//!
//! # Example
//!
//! ```no_run
//! use edge_status::{run_scan, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     urls: Some(std::path::PathBuf::from("urls.txt")),
//!     processes: 20,
//!     rate_limit: 50,
//!     passive: true,
//!     ..Default::default()
//! };
//!
//! let report = run_scan(config).await?;
//! eprintln!("{} reported, {} skipped", report.reported, report.skipped);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
mod asn;
pub mod cdn;
pub mod config;
mod dns;
mod domain;
mod error_handling;
mod fetch;
pub mod initialization;
pub mod models;
mod pipeline;
mod rules;
mod run;
mod user_agent;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{InitializationError, ReferenceDataError, SkipReason};
pub use run::{run_scan, run_scan_from, run_scan_with, InputSource, ScanReport};
