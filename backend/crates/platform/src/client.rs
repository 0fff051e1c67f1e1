//! Client identification utilities
//!
//! Common functions for identifying clients via HTTP headers.

use http::HeaderMap;
use std::net::IpAddr;

/// Header set by most reverse proxies (first entry is the client)
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Header set by nginx-style proxies
pub const X_REAL_IP: &str = "x-real-ip";

/// Extract client IP address from headers
///
/// Checks `X-Forwarded-For` (first entry), then `X-Real-IP`, then falls
/// back to the direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    let header_ip = |name: &str, first_only: bool| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| if first_only { v.split(',').next() } else { Some(v) })
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
    };

    header_ip(X_FORWARDED_FOR, true)
        .or_else(|| header_ip(X_REAL_IP, false))
        .or(direct_ip)
}
