//! Auth, Role and Verification Gates
//!
//! Middleware for protected routes. The auth gate resolves the session
//! and profile before any downstream handler runs; the role and
//! email-verification gates assume the auth gate already ran and read the
//! per-request [`CurrentUser`] context from request extensions.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use kernel::flash::Flash;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::verify::{DenyReason, Verdict, VerifyUseCase};
use crate::domain::api::{BackendApi, SessionStore};
use crate::domain::entity::profile::UserProfile;
use crate::domain::value_object::user_role::UserRole;
use crate::presentation::flash::queue_flash;
use platform::cookie::{delete_cookie_header, extract_cookie, set_cookie_header};

/// Per-request authenticated context, inserted by the auth gate.
///
/// The profile is the one resolved during this request's verification
/// pass; role checks must use it rather than any earlier snapshot.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub session_id: Uuid,
    pub profile: UserProfile,
}

/// Auth gate state
pub struct GateState<B, S>
where
    B: BackendApi + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    pub backend: Arc<B>,
    pub sessions: Arc<S>,
    pub config: Arc<AuthConfig>,
}

impl<B, S> Clone for GateState<B, S>
where
    B: BackendApi + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            sessions: self.sessions.clone(),
            config: self.config.clone(),
        }
    }
}

/// Middleware requiring an authenticated session.
///
/// Either inserts [`CurrentUser`] and calls `next`, or short-circuits
/// with a redirect to the login page. Downstream logic never observes a
/// half-verified request.
pub async fn require_auth<B, S>(
    State(state): State<GateState<B, S>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    B: BackendApi + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let headers = req.headers();
    let session_token = extract_cookie(headers, &state.config.session_cookie_name);
    let refresh_token = extract_cookie(headers, &state.config.refresh_cookie_name);
    let path = req.uri().path().to_string();

    let verify = VerifyUseCase::new(
        state.backend.clone(),
        state.sessions.clone(),
        state.config.clone(),
    );

    let verdict = match verify
        .execute(session_token.as_deref(), refresh_token.as_deref())
        .await
    {
        Ok(verdict) => verdict,
        Err(e) => {
            tracing::error!(error = %e, "Session verification errored");
            Verdict::Denied(DenyReason::Backend)
        }
    };

    match verdict {
        Verdict::Authenticated {
            session_id,
            profile,
            rotated_refresh,
        } => {
            req.extensions_mut().insert(CurrentUser {
                session_id,
                profile,
            });

            let mut response = next.run(req).await;

            if let Some(refresh_token) = rotated_refresh {
                response.headers_mut().append(
                    header::SET_COOKIE,
                    set_cookie_header(&state.config.refresh_cookie(), &refresh_token),
                );
            }
            response
        }
        Verdict::Denied(reason) => deny_response(&state.config, &path, reason),
    }
}

/// Terminal response for a denied request: clear auth cookies, queue a
/// flash and redirect to login with the original path as `returnUrl`
/// (unless the original path is the login page itself).
fn deny_response(config: &AuthConfig, path: &str, reason: DenyReason) -> Response {
    let location = if path == config.login_path {
        config.login_path.clone()
    } else {
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("returnUrl", path)
            .finish();
        format!("{}?{}", config.login_path, query)
    };

    let flash = match reason {
        DenyReason::NoSession => Flash::info("Please sign in to continue"),
        DenyReason::SessionExpired | DenyReason::RefreshFailed => {
            Flash::error("Your session has expired. Please sign in again.")
        }
        DenyReason::Backend => Flash::error("Something went wrong. Please sign in again."),
    };

    let mut response = Redirect::to(&location).into_response();
    let headers = response.headers_mut();
    headers.append(header::SET_COOKIE, queue_flash(config, &flash));
    if reason != DenyReason::NoSession {
        headers.append(
            header::SET_COOKIE,
            delete_cookie_header(&config.session_cookie()),
        );
        headers.append(
            header::SET_COOKIE,
            delete_cookie_header(&config.refresh_cookie()),
        );
    }
    response
}

// ============================================================================
// Role gate
// ============================================================================

/// Allow-list for the premium gate
pub const PREMIUM_TIERS: &[UserRole] = &[
    UserRole::Premium,
    UserRole::PremiumPlus,
    UserRole::Admin,
    UserRole::SuperAdmin,
];

/// Allow-list for the admin gate
pub const ADMIN_TIERS: &[UserRole] = &[UserRole::Admin, UserRole::SuperAdmin];

/// Role gate state: an allow-list of role tiers
#[derive(Clone)]
pub struct RoleGate {
    pub allowed: &'static [UserRole],
    pub config: Arc<AuthConfig>,
}

impl RoleGate {
    pub fn new(allowed: &'static [UserRole], config: Arc<AuthConfig>) -> Self {
        Self { allowed, config }
    }

    pub fn admin(config: Arc<AuthConfig>) -> Self {
        Self::new(ADMIN_TIERS, config)
    }

    pub fn premium(config: Arc<AuthConfig>) -> Self {
        Self::new(PREMIUM_TIERS, config)
    }
}

/// Middleware permitting only allow-listed roles.
///
/// The caller is already authenticated, so denial is 403 semantics: a
/// flash plus redirect to the default landing page, never to login.
pub async fn require_role(
    State(gate): State<RoleGate>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(current) = req.extensions().get::<CurrentUser>() else {
        // Route was wired without the auth gate; treat as unauthenticated
        tracing::error!("Role gate reached without an authenticated context");
        return deny_response(&gate.config, req.uri().path(), DenyReason::NoSession);
    };

    if gate.allowed.contains(&current.profile.role) {
        return next.run(req).await;
    }

    tracing::debug!(
        role = %current.profile.role,
        path = %req.uri().path(),
        "Role gate denied request"
    );

    let mut response = Redirect::to(&gate.config.default_landing).into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        queue_flash(
            &gate.config,
            &Flash::error("You do not have permission to access this page"),
        ),
    );
    response
}

// ============================================================================
// Email verification gate
// ============================================================================

/// Middleware requiring a verified email address.
///
/// A capability check on the profile flag, not a role check: denial
/// redirects into the verification flow.
pub async fn require_verified_email(
    State(config): State<Arc<AuthConfig>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(current) = req.extensions().get::<CurrentUser>() else {
        tracing::error!("Verification gate reached without an authenticated context");
        return deny_response(&config, req.uri().path(), DenyReason::NoSession);
    };

    if current.profile.email_verified {
        return next.run(req).await;
    }

    let mut response = Redirect::to(&config.verify_email_path).into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        queue_flash(
            &config,
            &Flash::info("Please verify your email address to continue"),
        ),
    );
    response
}
