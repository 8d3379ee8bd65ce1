//! Backend HTTP Client
//!
//! reqwest-based implementation of [`BackendApi`]. All calls carry bounded
//! timeouts so a slow backend cannot exhaust this tier's connection pool,
//! and every response is parsed through the `{success, data, message}`
//! envelope. A `success:false` body always surfaces as an explicit
//! `Rejected` error; no branch leaves the caller without an outcome.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::domain::api::{AuthGrant, BackendApi, Credentials, NewAccount, TokenPair};
use crate::domain::entity::profile::UserProfile;
use crate::error::{AuthError, AuthResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Backend JSON envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default = "Option::default")]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GrantData {
    user: UserProfile,
    access_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenData {
    access_token: String,
    refresh_token: String,
}

/// reqwest-backed [`BackendApi`] implementation
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> AuthResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Parse an envelope response from a non-bearer endpoint.
    ///
    /// Non-2xx statuses still carry an envelope whose message is meant for
    /// the user (e.g. "Invalid email or password"), so the body is parsed
    /// regardless of status.
    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> AuthResult<T> {
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| AuthError::Backend(format!("Malformed backend response: {e}")))?;

        if !envelope.success {
            return Err(AuthError::Rejected(envelope.message.unwrap_or_else(|| {
                "The request could not be completed. Please try again.".to_string()
            })));
        }

        envelope
            .data
            .ok_or_else(|| AuthError::Backend("Backend envelope missing data".to_string()))
    }

    /// Like [`Self::parse`] but for bearer-authenticated endpoints, where a
    /// 401 signals an expired access token rather than a user mistake.
    async fn parse_bearer<T: DeserializeOwned>(response: reqwest::Response) -> AuthResult<T> {
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AuthError::AccessExpired);
        }
        Self::parse(response).await
    }

    /// Envelope check for endpoints whose data payload is irrelevant.
    async fn parse_ok(response: reqwest::Response) -> AuthResult<()> {
        let envelope: Envelope<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| AuthError::Backend(format!("Malformed backend response: {e}")))?;

        if !envelope.success {
            return Err(AuthError::Rejected(envelope.message.unwrap_or_else(|| {
                "The request could not be completed. Please try again.".to_string()
            })));
        }
        Ok(())
    }
}

impl BackendApi for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> AuthResult<AuthGrant> {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
                "remember": credentials.remember,
            }))
            .send()
            .await?;

        let data: GrantData = Self::parse(response).await?;
        Ok(AuthGrant {
            user: data.user,
            access_token: data.access_token,
            refresh_token: data.refresh_token,
        })
    }

    async fn register(&self, account: &NewAccount) -> AuthResult<AuthGrant> {
        // Role is pinned server-side; client-supplied roles never reach
        // the backend.
        let response = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({
                "first_name": account.first_name,
                "last_name": account.last_name,
                "username": account.username,
                "email": account.email,
                "password": account.password,
                "phone": account.phone,
                "date_of_birth": account.date_of_birth,
                "bio": account.bio,
                "role": "student",
            }))
            .send()
            .await?;

        let data: GrantData = Self::parse(response).await?;
        Ok(AuthGrant {
            user: data.user,
            access_token: data.access_token,
            refresh_token: data.refresh_token,
        })
    }

    async fn logout(&self, access_token: &str) -> AuthResult<()> {
        let response = self
            .client
            .post(self.url("/api/auth/logout"))
            .bearer_auth(access_token)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AuthError::AccessExpired);
        }
        Self::parse_ok(response).await
    }

    async fn forgot_password(&self, email: &str) -> AuthResult<()> {
        let response = self
            .client
            .post(self.url("/api/auth/forgot-password"))
            .json(&json!({ "email": email }))
            .send()
            .await?;

        Self::parse_ok(response).await
    }

    async fn reset_password(&self, token: &str, password: &str) -> AuthResult<()> {
        let response = self
            .client
            .post(self.url("/api/auth/reset-password"))
            .json(&json!({ "token": token, "password": password }))
            .send()
            .await?;

        Self::parse_ok(response).await
    }

    async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let response = self
            .client
            .post(self.url("/api/auth/refresh"))
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        let data: TokenData = Self::parse(response).await?;
        Ok(TokenPair {
            access_token: data.access_token,
            refresh_token: data.refresh_token,
        })
    }

    async fn fetch_profile(&self, access_token: &str) -> AuthResult<UserProfile> {
        let response = self
            .client
            .get(self.url("/api/users/profile"))
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::parse_bearer(response).await
    }
}
