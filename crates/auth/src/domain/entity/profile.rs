//! User Profile Entity
//!
//! Read-only snapshot of the backend-owned user record. The web tier
//! caches it inside the session and replaces it wholesale on every
//! successful gate pass; it is never mutated field by field here.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::user_role::UserRole;

/// Profile snapshot as returned by `GET /api/users/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend identifier
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_shape() {
        let json = r#"{
            "id": "u_123",
            "first_name": "Asha",
            "last_name": "Rao",
            "username": "asha",
            "email": "asha@example.com",
            "role": "premium",
            "email_verified": true,
            "phone": "+91-9000000000"
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.role, UserRole::Premium);
        assert!(profile.email_verified);
        assert_eq!(profile.full_name(), "Asha Rao");
        assert_eq!(profile.bio, None);
    }

    #[test]
    fn test_email_verified_defaults_false() {
        let json = r#"{
            "id": "u_1",
            "first_name": "New",
            "last_name": "User",
            "username": "new",
            "email": "new@example.com",
            "role": "student"
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert!(!profile.email_verified);
    }
}
