//! Session Entity
//!
//! Server-side session record keyed by an opaque, HMAC-signed cookie
//! token. Holds the last-known profile snapshot and the short-lived
//! access token; the longer-lived refresh token never enters this record
//! and lives only in its own httpOnly cookie.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entity::profile::UserProfile;

/// Session record
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID (UUID v4), referenced by the signed cookie token
    pub session_id: Uuid,
    /// Last-known profile snapshot
    pub user: UserProfile,
    /// Short-lived bearer credential for backend calls
    pub access_token: String,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp
    pub last_activity_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session.
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(user: UserProfile, access_token: String, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            user,
            access_token,
            expires_at_ms: (now + ttl).timestamp_millis(),
            created_at: now,
            last_activity_at: now,
        }
    }

    /// Check if the session record has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    /// Update last activity timestamp
    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }

    /// Replace the access token after a successful refresh exchange
    pub fn rotate_access(&mut self, access_token: String) {
        self.access_token = access_token;
    }

    /// Replace the cached profile with a freshly resolved one
    pub fn refresh_profile(&mut self, user: UserProfile) {
        self.user = user;
    }

    /// Remaining time until expiration
    pub fn remaining_ms(&self) -> i64 {
        let now_ms = Utc::now().timestamp_millis();
        (self.expires_at_ms - now_ms).max(0)
    }
}
