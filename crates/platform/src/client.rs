//! Client identification utilities
//!
//! Common functions for identifying callers via HTTP headers. The rate
//! guard keys its ledger on the client IP (plus user identity when known).

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    // First IP in the X-Forwarded-For list is the originating client
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}

/// Build a rate-limit caller key from IP and (optional) user identity.
///
/// Unknown IPs collapse into a shared bucket rather than bypassing the
/// limit entirely.
pub fn caller_key(ip: Option<IpAddr>, user: Option<&str>) -> String {
    let ip_part = ip.map_or_else(|| "unknown".to_string(), |ip| ip.to_string());
    match user {
        Some(user) => format!("{ip_part}:{user}"),
        None => ip_part,
    }
}

/// Extractor for the client IP.
///
/// Reads X-Forwarded-For first, then the connection address when the
/// server was started with connect info. Never rejects: an undeterminable
/// IP yields `None` and callers fall back to a shared rate bucket.
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub Option<IpAddr>);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let direct = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());

        Ok(Self(extract_client_ip(&parts.headers, direct)))
    }
}
