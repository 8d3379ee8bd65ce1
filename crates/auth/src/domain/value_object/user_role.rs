use serde::{Deserialize, Serialize};
use std::fmt;

/// Role tier assigned by the backend.
///
/// The web tier never assigns roles itself; registration always submits
/// the lowest tier and the backend owns everything after that. Unknown
/// role strings from the backend fail deserialization rather than being
/// silently mapped, since a wrong guess here widens access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Student,
    Premium,
    PremiumPlus,
    Admin,
    SuperAdmin,
}

impl UserRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Student => "student",
            Premium => "premium",
            PremiumPlus => "premium_plus",
            Admin => "admin",
            SuperAdmin => "super_admin",
        }
    }

    #[inline]
    pub const fn is_admin_or_higher(&self) -> bool {
        use UserRole::*;
        matches!(self, Admin | SuperAdmin)
    }

    #[inline]
    pub const fn is_premium_or_higher(&self) -> bool {
        use UserRole::*;
        matches!(self, Premium | PremiumPlus | Admin | SuperAdmin)
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code {
            "student" => Some(Student),
            "premium" => Some(Premium),
            "premium_plus" => Some(PremiumPlus),
            "admin" => Some(Admin),
            "super_admin" => Some(SuperAdmin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
