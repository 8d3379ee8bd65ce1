//! Auth Route Handlers
//!
//! Login, registration, logout and password-reset pages. POST handlers
//! follow one order: validate the form (re-render without touching the
//! backend on field errors), check the sensitive-operation rate guard,
//! then run the use case.

use std::sync::Arc;

use axum::Form;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::response::Response;
use kernel::flash::Flash;

use crate::application::config::AuthConfig;
use crate::application::forgot_password::ForgotPasswordUseCase;
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::application::reset_password::ResetPasswordUseCase;
use crate::application::sign_in::{SignInInput, SignInOutput, SignInUseCase};
use crate::application::sign_out::SignOutUseCase;
use crate::domain::api::{BackendApi, SessionStore};
use crate::error::AuthError;
use crate::presentation::dto::{ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm};
use crate::presentation::view::{Page, redirect_with_flash, render};
use platform::client::{ClientIp, caller_key};
use platform::cookie::{delete_cookie_header, extract_cookie, set_cookie_header};
use platform::rate_limit::RateLimitStore;

/// Shared state for the auth routes
pub struct AuthAppState<B, S, L>
where
    B: BackendApi + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    pub backend: Arc<B>,
    pub sessions: Arc<S>,
    pub limiter: Arc<L>,
    pub config: Arc<AuthConfig>,
}

impl<B, S, L> Clone for AuthAppState<B, S, L>
where
    B: BackendApi + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            sessions: self.sessions.clone(),
            limiter: self.limiter.clone(),
            config: self.config.clone(),
        }
    }
}

impl<B, S, L> AuthAppState<B, S, L>
where
    B: BackendApi + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    pub fn new(backend: Arc<B>, sessions: Arc<S>, limiter: Arc<L>, config: Arc<AuthConfig>) -> Self {
        Self {
            backend,
            sessions,
            limiter,
            config,
        }
    }

    /// Check the rate guard for a sensitive operation.
    ///
    /// Returns the rejection flash when the caller is over the limit. A
    /// ledger failure is logged and the request is let through; a broken
    /// counter must not lock everyone out of signing in.
    async fn guard(&self, ip: ClientIp, user: &str, operation: &str) -> Option<Flash> {
        let key = caller_key(ip.0, Some(user));
        match self
            .limiter
            .check(&key, operation, &self.config.rate_limit)
            .await
        {
            Ok(result) if result.allowed => None,
            Ok(result) => {
                let minutes = (result.retry_after.as_secs() + 59) / 60;
                tracing::warn!(operation, "Rate limit exceeded");
                Some(Flash::error(format!(
                    "Too many attempts. Please try again in {} minute{}.",
                    minutes,
                    if minutes == 1 { "" } else { "s" }
                )))
            }
            Err(e) => {
                tracing::error!(error = %e, operation, "Rate limit check failed");
                None
            }
        }
    }
}

fn login_view() -> Page {
    Page::new("auth/login", "Sign In")
}

fn register_view() -> Page {
    Page::new("auth/register", "Create Account")
}

fn forgot_view() -> Page {
    Page::new("auth/forgot-password", "Forgot Password")
}

fn reset_view() -> Page {
    Page::new("auth/reset-password", "Reset Password")
}

/// Append the session/refresh (and optional remember) cookies for a
/// fresh sign-in to a response.
fn apply_session_cookies(response: &mut Response, config: &AuthConfig, output: &SignInOutput) {
    let headers = response.headers_mut();
    headers.append(
        header::SET_COOKIE,
        set_cookie_header(&config.session_cookie(), &output.session_token),
    );
    headers.append(
        header::SET_COOKIE,
        set_cookie_header(&config.refresh_cookie(), &output.refresh_token),
    );
    if let Some(user_id) = &output.remember_user {
        headers.append(
            header::SET_COOKIE,
            set_cookie_header(&config.remember_cookie(), user_id),
        );
    }
}

/// Re-render a form page for a failed backend call.
///
/// Rejections carry the backend's own message; anything else gets the
/// generic user-facing message for its category.
fn failure_page(page: Page, err: &AuthError, values: Vec<(&'static str, String)>) -> Page {
    err.log();
    page.with_status(err.status_code())
        .with_flash(Flash::error(err.user_message()))
        .with_values(values)
}

// ============================================================================
// Login
// ============================================================================

pub async fn login_page<B, S, L>(
    State(state): State<AuthAppState<B, S, L>>,
    headers: HeaderMap,
) -> Response
where
    B: BackendApi + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    render(login_view(), &headers, &state.config)
}

pub async fn login_submit<B, S, L>(
    State(state): State<AuthAppState<B, S, L>>,
    ip: ClientIp,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response
where
    B: BackendApi + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let errors = form.validate();
    if !errors.is_empty() {
        let page = login_view().with_errors(errors).with_values(form.echo());
        return render(page, &headers, &state.config);
    }

    if let Some(flash) = state.guard(ip, &form.email, "login").await {
        let page = login_view()
            .with_status(axum::http::StatusCode::TOO_MANY_REQUESTS)
            .with_flash(flash)
            .with_values(form.echo());
        return render(page, &headers, &state.config);
    }

    let sign_in = SignInUseCase::new(
        state.backend.clone(),
        state.sessions.clone(),
        state.config.clone(),
    );
    let input = SignInInput {
        email: form.email.clone(),
        password: form.password.clone(),
        remember: form.remember(),
    };

    match sign_in.execute(input).await {
        Ok(output) => {
            let landing = if output.role.is_admin_or_higher() {
                &state.config.admin_landing
            } else {
                &state.config.default_landing
            };
            let mut response =
                redirect_with_flash(landing, Flash::success("Welcome back!"), &state.config);
            apply_session_cookies(&mut response, &state.config, &output);
            response
        }
        Err(err) => {
            let page = failure_page(login_view(), &err, form.echo());
            render(page, &headers, &state.config)
        }
    }
}

// ============================================================================
// Registration
// ============================================================================

pub async fn register_page<B, S, L>(
    State(state): State<AuthAppState<B, S, L>>,
    headers: HeaderMap,
) -> Response
where
    B: BackendApi + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    render(register_view(), &headers, &state.config)
}

pub async fn register_submit<B, S, L>(
    State(state): State<AuthAppState<B, S, L>>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> Response
where
    B: BackendApi + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let errors = form.validate();
    if !errors.is_empty() {
        let page = register_view().with_errors(errors).with_values(form.echo());
        return render(page, &headers, &state.config);
    }

    let register = RegisterUseCase::new(
        state.backend.clone(),
        state.sessions.clone(),
        state.config.clone(),
    );
    let input = RegisterInput {
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        username: form.username.clone(),
        email: form.email.clone(),
        password: form.password.clone(),
        phone: form.phone.clone(),
        date_of_birth: form.date_of_birth.clone(),
        bio: form.bio.clone(),
    };

    match register.execute(input).await {
        Ok(output) => {
            // New accounts always land on the default page
            let mut response = redirect_with_flash(
                &state.config.default_landing,
                Flash::success("Welcome! Your account has been created."),
                &state.config,
            );
            apply_session_cookies(&mut response, &state.config, &output);
            response
        }
        Err(err) => {
            let page = failure_page(register_view(), &err, form.echo());
            render(page, &headers, &state.config)
        }
    }
}

// ============================================================================
// Logout
// ============================================================================

/// Logout never fails visibly: backend revoke errors are swallowed and
/// the session and cookies are cleared regardless.
pub async fn logout<B, S, L>(
    State(state): State<AuthAppState<B, S, L>>,
    headers: HeaderMap,
) -> Response
where
    B: BackendApi + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let session_token = extract_cookie(&headers, &state.config.session_cookie_name);

    let sign_out = SignOutUseCase::new(
        state.backend.clone(),
        state.sessions.clone(),
        state.config.clone(),
    );
    sign_out.execute(session_token.as_deref()).await;

    let mut response = redirect_with_flash(
        "/",
        Flash::success("You have been signed out"),
        &state.config,
    );
    let response_headers = response.headers_mut();
    for cookie in [
        state.config.session_cookie(),
        state.config.refresh_cookie(),
        state.config.remember_cookie(),
    ] {
        response_headers.append(header::SET_COOKIE, delete_cookie_header(&cookie));
    }
    response
}

// ============================================================================
// Password reset
// ============================================================================

pub async fn forgot_page<B, S, L>(
    State(state): State<AuthAppState<B, S, L>>,
    headers: HeaderMap,
) -> Response
where
    B: BackendApi + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    render(forgot_view(), &headers, &state.config)
}

/// The response never discloses whether the account exists; backend
/// errors are absorbed by the use case.
pub async fn forgot_submit<B, S, L>(
    State(state): State<AuthAppState<B, S, L>>,
    ip: ClientIp,
    headers: HeaderMap,
    Form(form): Form<ForgotPasswordForm>,
) -> Response
where
    B: BackendApi + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let errors = form.validate();
    if !errors.is_empty() {
        let page = forgot_view().with_errors(errors).with_values(form.echo());
        return render(page, &headers, &state.config);
    }

    if let Some(flash) = state.guard(ip, &form.email, "forgot_password").await {
        let page = forgot_view()
            .with_status(axum::http::StatusCode::TOO_MANY_REQUESTS)
            .with_flash(flash)
            .with_values(form.echo());
        return render(page, &headers, &state.config);
    }

    ForgotPasswordUseCase::new(state.backend.clone())
        .execute(&form.email)
        .await;

    redirect_with_flash(
        &state.config.login_path,
        Flash::info("If an account with that email exists, a password reset link has been sent."),
        &state.config,
    )
}

pub async fn reset_page<B, S, L>(
    State(state): State<AuthAppState<B, S, L>>,
    Path(_token): Path<String>,
    headers: HeaderMap,
) -> Response
where
    B: BackendApi + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    render(reset_view(), &headers, &state.config)
}

pub async fn reset_submit<B, S, L>(
    State(state): State<AuthAppState<B, S, L>>,
    Path(token): Path<String>,
    ip: ClientIp,
    headers: HeaderMap,
    Form(form): Form<ResetPasswordForm>,
) -> Response
where
    B: BackendApi + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let errors = form.validate();
    if !errors.is_empty() {
        let page = reset_view().with_errors(errors);
        return render(page, &headers, &state.config);
    }

    if let Some(flash) = state.guard(ip, &token, "reset_password").await {
        let page = reset_view()
            .with_status(axum::http::StatusCode::TOO_MANY_REQUESTS)
            .with_flash(flash);
        return render(page, &headers, &state.config);
    }

    match ResetPasswordUseCase::new(state.backend.clone())
        .execute(&token, &form.password)
        .await
    {
        Ok(()) => redirect_with_flash(
            &state.config.login_path,
            Flash::success("Your password has been reset. Please sign in."),
            &state.config,
        ),
        Err(err) => {
            let page = failure_page(reset_view(), &err, Vec::new());
            render(page, &headers, &state.config)
        }
    }
}
