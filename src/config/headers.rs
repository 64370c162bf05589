//! HTTP header name constants.
//!
//! Banner headers copied verbatim into `BaseInfo`.

/// Server header (identifies server software)
pub const HEADER_SERVER: &str = "Server";
/// Via header (proxy chain information)
pub const HEADER_VIA: &str = "Via";
/// X-Powered-By header (identifies server framework)
pub const HEADER_X_POWERED_BY: &str = "X-Powered-By";
