//! Client identification utilities
//!
//! The settlement API sits behind an authenticating gateway. The gateway
//! resolves the session and forwards the caller as a UUID header; this module
//! turns those headers into typed values.

use axum::http::HeaderMap;
use std::net::IpAddr;
use uuid::Uuid;

/// Header carrying the authenticated end user
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the authenticated administrator
pub const ADMIN_ID_HEADER: &str = "x-admin-id";

/// Error when extracting a principal header
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrincipalError {
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),

    #[error("Malformed header value: {0}")]
    MalformedHeader(&'static str),
}

/// Extract a principal UUID from the named header
///
/// ## Returns
/// * `Ok(Uuid)` - header present and a valid UUID
/// * `Err(PrincipalError::MissingHeader)` - header absent or empty
/// * `Err(PrincipalError::MalformedHeader)` - header is not a UUID
pub fn extract_principal(
    headers: &HeaderMap,
    header_name: &'static str,
) -> Result<Uuid, PrincipalError> {
    let raw = headers
        .get(header_name)
        .ok_or(PrincipalError::MissingHeader(header_name))?;

    let value = raw
        .to_str()
        .map_err(|_| PrincipalError::MalformedHeader(header_name))?
        .trim();

    if value.is_empty() {
        return Err(PrincipalError::MissingHeader(header_name));
    }

    Uuid::parse_str(value).map_err(|_| PrincipalError::MalformedHeader(header_name))
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}
