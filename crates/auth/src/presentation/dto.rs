//! Form DTOs
//!
//! Form payloads for the auth flows with local, field-level validation.
//! Validation failures re-render the form without any backend call; the
//! echoed values never include password fields.

use serde::Deserialize;

use crate::domain::value_object::email::Email;

/// Minimum password length accepted before the backend is consulted
const PASSWORD_MIN_LENGTH: usize = 6;

/// A single field-level validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn check_email(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "Email is required"));
    } else if Email::new(value).is_err() {
        errors.push(FieldError::new(field, "Please enter a valid email address"));
    }
}

fn check_password(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if value.is_empty() {
        errors.push(FieldError::new(field, "Password is required"));
    } else if value.len() < PASSWORD_MIN_LENGTH {
        errors.push(FieldError::new(
            field,
            "Password must be at least 6 characters long",
        ));
    }
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// HTML checkbox: present ("on") when ticked, absent otherwise
    #[serde(default)]
    pub remember: Option<String>,
}

impl LoginForm {
    pub fn remember(&self) -> bool {
        self.remember.is_some()
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_email(&mut errors, "email", &self.email);
        check_password(&mut errors, "password", &self.password);
        errors
    }

    /// Values echoed back on re-render (never the password)
    pub fn echo(&self) -> Vec<(&'static str, String)> {
        vec![("email", self.email.clone())]
    }
}

// ============================================================================
// Registration
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl RegisterForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("username", &self.username),
        ] {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, "This field is required"));
            }
        }

        check_email(&mut errors, "email", &self.email);
        check_password(&mut errors, "password", &self.password);

        if !self.password.is_empty() && self.password != self.confirm_password {
            errors.push(FieldError::new("confirm_password", "Passwords do not match"));
        }

        errors
    }

    pub fn echo(&self) -> Vec<(&'static str, String)> {
        let mut values = vec![
            ("first_name", self.first_name.clone()),
            ("last_name", self.last_name.clone()),
            ("username", self.username.clone()),
            ("email", self.email.clone()),
        ];
        if let Some(phone) = &self.phone {
            values.push(("phone", phone.clone()));
        }
        if let Some(dob) = &self.date_of_birth {
            values.push(("date_of_birth", dob.clone()));
        }
        if let Some(bio) = &self.bio {
            values.push(("bio", bio.clone()));
        }
        values
    }
}

// ============================================================================
// Password reset
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    pub email: String,
}

impl ForgotPasswordForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_email(&mut errors, "email", &self.email);
        errors
    }

    pub fn echo(&self) -> Vec<(&'static str, String)> {
        vec![("email", self.email.clone())]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl ResetPasswordForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_password(&mut errors, "password", &self.password);
        if !self.password.is_empty() && self.password != self.confirm_password {
            errors.push(FieldError::new("confirm_password", "Passwords do not match"));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_short_password_message() {
        let form = LoginForm {
            email: "a@b.com".into(),
            password: "short".into(),
            remember: None,
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
        assert_eq!(errors[0].message, "Password must be at least 6 characters long");
    }

    #[test]
    fn test_login_valid() {
        let form = LoginForm {
            email: "a@b.com".into(),
            password: "longenough".into(),
            remember: Some("on".into()),
        };
        assert!(form.validate().is_empty());
        assert!(form.remember());
    }

    #[test]
    fn test_login_echo_excludes_password() {
        let form = LoginForm {
            email: "a@b.com".into(),
            password: "secret".into(),
            remember: None,
        };
        let echoed = form.echo();
        assert!(echoed.iter().any(|(k, v)| *k == "email" && v == "a@b.com"));
        assert!(echoed.iter().all(|(_, v)| v != "secret"));
    }

    #[test]
    fn test_register_password_mismatch_message() {
        let form = RegisterForm {
            first_name: "A".into(),
            last_name: "B".into(),
            username: "ab".into(),
            email: "a@b.com".into(),
            password: "password1".into(),
            confirm_password: "password2".into(),
            ..Default::default()
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "confirm_password");
        assert_eq!(errors[0].message, "Passwords do not match");
    }

    #[test]
    fn test_register_required_fields() {
        let form = RegisterForm::default();
        let errors = form.validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"first_name"));
        assert!(fields.contains(&"last_name"));
        assert!(fields.contains(&"username"));
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"password"));
    }

    #[test]
    fn test_register_echo_excludes_passwords() {
        let form = RegisterForm {
            first_name: "A".into(),
            password: "secret".into(),
            confirm_password: "secret".into(),
            ..Default::default()
        };
        assert!(form.echo().iter().all(|(_, v)| v != "secret"));
    }

    #[test]
    fn test_forgot_invalid_email() {
        let form = ForgotPasswordForm {
            email: "not-an-email".into(),
        };
        let errors = form.validate();
        assert_eq!(errors[0].message, "Please enter a valid email address");
    }

    #[test]
    fn test_reset_password_rules() {
        let form = ResetPasswordForm {
            password: "short".into(),
            confirm_password: "short".into(),
        };
        assert_eq!(
            form.validate()[0].message,
            "Password must be at least 6 characters long"
        );

        let form = ResetPasswordForm {
            password: "longenough".into(),
            confirm_password: "different".into(),
        };
        assert_eq!(form.validate()[0].message, "Passwords do not match");
    }
}
