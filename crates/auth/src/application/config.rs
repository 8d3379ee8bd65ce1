//! Application Configuration
//!
//! Configuration for the auth application layer: cookie names and
//! lifetimes, session TTLs, landing paths and the sensitive-operation
//! rate limit.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::rate_limit::RateLimitConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Refresh token cookie name
    pub refresh_cookie_name: String,
    /// Remembered-user cookie name
    pub remember_cookie_name: String,
    /// Flash message cookie name
    pub flash_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Server-side session TTL (24 hours)
    pub session_ttl: Duration,
    /// Refresh token cookie lifetime (7 days)
    pub refresh_ttl: Duration,
    /// Remembered-user cookie lifetime (30 days)
    pub remember_ttl: Duration,
    /// Whether to require Secure cookies (production)
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Login page path (terminal redirect target)
    pub login_path: String,
    /// Default authenticated landing page
    pub default_landing: String,
    /// Landing page for admin-tier roles
    pub admin_landing: String,
    /// Email-verification flow path
    pub verify_email_path: String,
    /// Rate limit for sensitive operations (5 attempts / 15 minutes)
    pub rate_limit: RateLimitConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "coach_session".to_string(),
            refresh_cookie_name: "refresh_token".to_string(),
            remember_cookie_name: "remember_user".to_string(),
            flash_cookie_name: "coach_flash".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(24 * 3600),
            refresh_ttl: Duration::from_secs(7 * 24 * 3600),
            remember_ttl: Duration::from_secs(30 * 24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            login_path: "/login".to_string(),
            default_landing: "/dashboard".to_string(),
            admin_landing: "/admin".to_string(),
            verify_email_path: "/verify-email".to_string(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Session TTL as a chrono duration for entity timestamps
    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl)
            .unwrap_or_else(|_| chrono::Duration::hours(24))
    }

    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            max_age_secs: Some(self.session_ttl.as_secs() as i64),
            ..Default::default()
        }
    }

    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.refresh_cookie_name.clone(),
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            max_age_secs: Some(self.refresh_ttl.as_secs() as i64),
            ..Default::default()
        }
    }

    pub fn remember_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.remember_cookie_name.clone(),
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            max_age_secs: Some(self.remember_ttl.as_secs() as i64),
            ..Default::default()
        }
    }

    /// Flash cookie is read and cleared on the very next page load
    pub fn flash_cookie(&self) -> CookieConfig {
        CookieConfig::browser_session(self.flash_cookie_name.clone(), self.cookie_secure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lifetimes() {
        let config = AuthConfig::default();
        assert_eq!(config.session_ttl, Duration::from_secs(24 * 3600));
        assert_eq!(config.refresh_ttl, Duration::from_secs(7 * 24 * 3600));
        assert_eq!(config.remember_ttl, Duration::from_secs(30 * 24 * 3600));
        assert_eq!(config.rate_limit.max_attempts, 5);
        assert_eq!(config.rate_limit.window, Duration::from_secs(15 * 60));
    }

    #[test]
    fn test_development_config() {
        let config = AuthConfig::development();
        assert!(!config.cookie_secure);
        // Random secret, not the zeroed default
        assert_ne!(config.session_secret, [0u8; 32]);
    }

    #[test]
    fn test_refresh_cookie_shape() {
        let config = AuthConfig::development();
        let cookie = config.refresh_cookie().build_set_cookie("opaque");
        assert!(cookie.starts_with("refresh_token=opaque"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));

        let prod = AuthConfig::with_random_secret();
        assert!(prod.refresh_cookie().build_set_cookie("x").contains("Secure"));
    }
}
