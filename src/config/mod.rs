//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, data file names)
//! - HTTP header name constants
//! - CLI option types and the per-run request configuration

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{Config, DataFiles, LogFormat, LogLevel, RequestConfig};
