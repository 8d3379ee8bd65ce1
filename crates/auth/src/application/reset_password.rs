//! Reset Password Use Case
//!
//! Delegates reset-token verification to the backend. Backend rejections
//! come back as `Rejected` with the backend's own message, which the
//! handler re-renders on the form.

use std::sync::Arc;

use crate::domain::api::BackendApi;
use crate::error::AuthResult;

/// Reset password use case
pub struct ResetPasswordUseCase<B>
where
    B: BackendApi,
{
    backend: Arc<B>,
}

impl<B> ResetPasswordUseCase<B>
where
    B: BackendApi,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub async fn execute(&self, token: &str, password: &str) -> AuthResult<()> {
        self.backend.reset_password(token, password).await?;
        tracing::info!("Password reset completed");
        Ok(())
    }
}
