//! Flash Cookie Transport
//!
//! One-shot messages travel in an httpOnly cookie as base64-encoded JSON.
//! The page renderer reads them and immediately queues the cookie's
//! deletion, so a flash is shown exactly once.

use axum::http::{HeaderMap, HeaderValue};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use kernel::flash::Flash;

use crate::application::config::AuthConfig;
use platform::cookie::{delete_cookie_header, extract_cookie, set_cookie_header};

/// Build the Set-Cookie header carrying a flash
pub fn queue_flash(config: &AuthConfig, flash: &Flash) -> HeaderValue {
    let payload = serde_json::to_vec(flash).unwrap_or_default();
    let encoded = URL_SAFE_NO_PAD.encode(payload);
    set_cookie_header(&config.flash_cookie(), &encoded)
}

/// Read the pending flash from request headers, if any.
///
/// Undecodable cookies are treated as absent.
pub fn read_flash(headers: &HeaderMap, config: &AuthConfig) -> Option<Flash> {
    let raw = extract_cookie(headers, &config.flash_cookie_name)?;
    let bytes = URL_SAFE_NO_PAD.decode(raw).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Build the Set-Cookie header clearing the flash cookie
pub fn clear_flash(config: &AuthConfig) -> HeaderValue {
    delete_cookie_header(&config.flash_cookie())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_flash_roundtrip_through_cookie() {
        let config = AuthConfig::development();
        let flash = Flash::success("You have been signed out");

        let set_cookie = queue_flash(&config, &flash);
        let value = set_cookie.to_str().unwrap();
        let cookie_pair = value.split(';').next().unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie_pair).unwrap());

        assert_eq!(read_flash(&headers, &config), Some(flash));
    }

    #[test]
    fn test_garbage_flash_ignored() {
        let config = AuthConfig::development();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("coach_flash=!!not-base64!!"),
        );
        assert_eq!(read_flash(&headers, &config), None);
    }

    #[test]
    fn test_clear_flash_expires_cookie() {
        let config = AuthConfig::development();
        let cleared = clear_flash(&config);
        assert!(cleared.to_str().unwrap().contains("Max-Age=0"));
    }
}
