//! API key to access token exchange.

use std::fmt;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tracing::{debug, instrument};

use crate::client::{build_url, decode_body, encode_body, error_message, normalize_base_url};
use crate::errors::{Result, SdkError};

/// Login endpoint that trades an API key for tokens.
pub const LOGIN_PATH: &str = "/accounts/apikeys/login";

#[derive(Serialize)]
struct LoginRequest<'a> {
    api_key: &'a str,
}

/// Tokens issued by a successful login.
#[serde_as]
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    /// Human readable status message.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub message: String,
    /// Bearer token for subsequent requests.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub access_token: String,
    /// Refresh token; unused by this client and may be empty.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub refresh_token: String,
}

impl LoginResponse {
    /// Response carrying only an access token.
    ///
    /// For custom [`CredentialExchange`] implementations that obtain tokens
    /// some other way.
    #[must_use]
    pub fn with_access_token(access_token: impl Into<String>) -> Self {
        Self {
            message: String::new(),
            access_token: access_token.into(),
            refresh_token: String::new(),
        }
    }
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("message", &self.message)
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Trades an API key for an access token.
///
/// The session calls this once when it opens and again on every refresh
/// tick. Implementations must be safe to call concurrently with requests
/// that read the current token.
#[async_trait]
pub trait CredentialExchange: Send + Sync {
    /// Exchange `api_key` for a fresh set of tokens.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Auth`] when the service rejects the key, or a
    /// transport/decode error when the exchange could not complete.
    async fn exchange(&self, api_key: &str) -> Result<LoginResponse>;
}

/// [`CredentialExchange`] against the service's `POST /accounts/apikeys/login`.
///
/// The login call never carries a bearer token.
#[derive(Clone)]
pub struct ApiKeyExchanger {
    http: reqwest::Client,
    base_url: String,
}

impl ApiKeyExchanger {
    /// Exchanger posting to `base_url` + [`LOGIN_PATH`].
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self { http, base_url: normalize_base_url(base_url) }
    }
}

impl fmt::Debug for ApiKeyExchanger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyExchanger").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialExchange for ApiKeyExchanger {
    #[instrument(name = "api_key_login", skip_all, fields(base_url = %self.base_url))]
    async fn exchange(&self, api_key: &str) -> Result<LoginResponse> {
        let url = build_url(&self.base_url, LOGIN_PATH, &[])?;
        let body = encode_body(&LoginRequest { api_key })?;

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(SdkError::from_transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(SdkError::from_transport)?;

        debug!(status = status.as_u16(), "login response");

        if status != StatusCode::OK {
            return Err(SdkError::Auth { status: status.as_u16(), message: error_message(&body) });
        }

        let login: LoginResponse = decode_body(&body)?;
        if login.access_token.is_empty() {
            return Err(SdkError::Auth {
                status: status.as_u16(),
                message: "login response did not contain an access token".to_string(),
            });
        }
        Ok(login)
    }
}
