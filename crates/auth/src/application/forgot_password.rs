//! Forgot Password Use Case
//!
//! Fire-and-forget: the backend call's outcome is deliberately discarded
//! so the caller renders the same "email sent if it exists" message
//! whether the account exists, the backend refused, or the backend is
//! down entirely (anti-enumeration policy).

use std::sync::Arc;

use crate::domain::api::BackendApi;

/// Forgot password use case
pub struct ForgotPasswordUseCase<B>
where
    B: BackendApi,
{
    backend: Arc<B>,
}

impl<B> ForgotPasswordUseCase<B>
where
    B: BackendApi,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub async fn execute(&self, email: &str) {
        if let Err(e) = self.backend.forgot_password(email).await {
            // Logged only; never surfaced
            tracing::debug!(error = %e, "Forgot-password backend call failed");
        }
    }
}
