//! Session facade: login, background refresh, endpoint access.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument};
use url::Url;

use crate::auth::{ApiKeyExchanger, CredentialExchange, RefreshConfig, RefreshScheduler, TokenHolder};
use crate::client::{normalize_base_url, ApiClient};
use crate::endpoints::{Accounts, Payments, Products, Tokens};
use crate::errors::{Result, SdkError};

/// Hosted deployments of the Reddio Pay service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// `https://reddio-service-prod.reddio.com`
    #[default]
    Production,
    /// `https://reddio-service-dev.reddio.com`
    Development,
}

impl Environment {
    /// Service base URL of this deployment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Production => "https://reddio-service-prod.reddio.com",
            Self::Development => "https://reddio-service-dev.reddio.com",
        }
    }
}

/// An authenticated connection to the service.
///
/// Opening a session exchanges the API key for an access token and starts a
/// background task that refreshes it. All endpoint groups share the session's
/// token; call [`close`](Session::close) to stop the refresh task.
///
/// ```no_run
/// # async fn demo() -> reddio_pay::Result<()> {
/// let session = reddio_pay::Session::open("https://reddio-service-prod.reddio.com", "my-api-key").await?;
/// let products = session.products().list().await?;
/// println!("{} products", products.products.len());
/// session.close().await;
/// # Ok(())
/// # }
/// ```
pub struct Session {
    client: ApiClient,
    refresh: RefreshScheduler,
}

impl Session {
    /// Open a session against `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns the credential exchange failure ([`SdkError::Auth`] for a
    /// rejected key) or [`SdkError::Config`] for an invalid base URL. No
    /// background task is left running on failure.
    pub async fn open(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).base_url(base_url).open().await
    }

    /// Start configuring a session for `api_key`.
    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> SessionBuilder {
        SessionBuilder::new(api_key)
    }

    /// Base URL the session talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Currently installed access token.
    #[must_use]
    pub fn access_token(&self) -> Arc<str> {
        self.client.tokens().get()
    }

    /// The underlying request pipeline, for routes without a typed wrapper.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.client
    }

    /// Merchant account routes.
    #[must_use]
    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(&self.client)
    }

    /// Supported payment tokens.
    #[must_use]
    pub fn tokens(&self) -> Tokens<'_> {
        Tokens::new(&self.client)
    }

    /// Product catalogue and token pricing.
    #[must_use]
    pub fn products(&self) -> Products<'_> {
        Products::new(&self.client)
    }

    /// Payment queries and the public checkout flow.
    #[must_use]
    pub fn payments(&self) -> Payments<'_> {
        Payments::new(&self.client)
    }

    /// Stop background token refresh. Idempotent.
    ///
    /// Requests made after closing still use the last installed token.
    #[instrument(skip(self), fields(base_url = %self.client.base_url()))]
    pub async fn close(&self) {
        if self.refresh.is_stopped() {
            return;
        }
        self.refresh.stop().await;
        info!("session closed");
    }

    /// Whether [`close`](Self::close) has stopped the refresh task.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.refresh.is_stopped()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.client.base_url())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Session`].
pub struct SessionBuilder {
    api_key: String,
    base_url: Option<String>,
    environment: Environment,
    timeout: Option<Duration>,
    http: Option<reqwest::Client>,
    refresh: RefreshConfig,
    exchanger: Option<Arc<dyn CredentialExchange>>,
}

impl SessionBuilder {
    fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            environment: Environment::default(),
            timeout: None,
            http: None,
            refresh: RefreshConfig::default(),
            exchanger: None,
        }
    }

    /// Explicit base URL; overrides [`environment`](Self::environment).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Hosted deployment to use when no base URL is set.
    #[must_use]
    pub const fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Per-request timeout. Ignored when an HTTP client is supplied.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured HTTP client.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Refresh cadence and retry delay.
    #[must_use]
    pub const fn refresh_config(mut self, config: RefreshConfig) -> Self {
        self.refresh = config;
        self
    }

    /// Replace the login-based exchange, e.g. with a test double.
    #[must_use]
    pub fn exchanger(mut self, exchanger: Arc<dyn CredentialExchange>) -> Self {
        self.exchanger = Some(exchanger);
        self
    }

    /// Exchange the API key and start the refresh task.
    ///
    /// # Errors
    ///
    /// See [`Session::open`].
    pub async fn open(self) -> Result<Session> {
        let base_url = normalize_base_url(
            self.base_url.as_deref().unwrap_or_else(|| self.environment.base_url()),
        );
        Url::parse(&base_url)
            .map_err(|e| SdkError::Config(format!("invalid base URL {base_url}: {e}")))?;

        let http = match self.http {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder
                    .build()
                    .map_err(|e| SdkError::Config(format!("failed to build HTTP client: {e}")))?
            }
        };

        let exchanger = self
            .exchanger
            .unwrap_or_else(|| Arc::new(ApiKeyExchanger::new(http.clone(), &base_url)));
        let api_key: Arc<str> = Arc::from(self.api_key);

        let login = exchanger.exchange(&api_key).await?;

        let tokens = Arc::new(TokenHolder::new());
        tokens.set(login.access_token);

        let refresh = RefreshScheduler::spawn(exchanger, api_key, Arc::clone(&tokens), self.refresh);

        info!(base_url = %base_url, "session opened");

        Ok(Session { client: ApiClient::new(http, &base_url, tokens), refresh })
    }
}

impl fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("base_url", &self.base_url)
            .field("environment", &self.environment)
            .field("timeout", &self.timeout)
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::auth::LoginResponse;

    struct StaticExchanger(&'static str);

    #[async_trait]
    impl CredentialExchange for StaticExchanger {
        async fn exchange(&self, _api_key: &str) -> Result<LoginResponse> {
            Ok(LoginResponse::with_access_token(self.0))
        }
    }

    #[test]
    fn environment_urls() {
        assert_eq!(Environment::default(), Environment::Production);
        assert_eq!(Environment::Production.base_url(), "https://reddio-service-prod.reddio.com");
        assert_eq!(Environment::Development.base_url(), "https://reddio-service-dev.reddio.com");
    }

    #[tokio::test]
    async fn builder_uses_environment_when_no_base_url() {
        let session = Session::builder("key")
            .environment(Environment::Development)
            .exchanger(Arc::new(StaticExchanger("tok")))
            .open()
            .await
            .unwrap();
        assert_eq!(session.base_url(), "https://reddio-service-dev.reddio.com");
        assert_eq!(&*session.access_token(), "tok");
        session.close().await;
    }

    #[tokio::test]
    async fn invalid_base_url_is_rejected_before_exchange() {
        let err = Session::builder("key")
            .base_url("::not a url::")
            .exchanger(Arc::new(StaticExchanger("tok")))
            .open()
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let session = Session::builder("key")
            .base_url("http://localhost:1")
            .exchanger(Arc::new(StaticExchanger("tok")))
            .open()
            .await
            .unwrap();
        assert!(!session.is_closed());
        session.close().await;
        session.close().await;
        assert!(session.is_closed());
        // Last token stays readable.
        assert_eq!(&*session.access_token(), "tok");
    }

    #[tokio::test]
    async fn debug_output_hides_credentials() {
        let session = Session::builder("very-secret-key")
            .base_url("http://localhost:1")
            .exchanger(Arc::new(StaticExchanger("very-secret-token")))
            .open()
            .await
            .unwrap();
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("very-secret-key"));
        assert!(!rendered.contains("very-secret-token"));

        let builder = Session::builder("very-secret-key");
        assert!(!format!("{builder:?}").contains("very-secret-key"));
        session.close().await;
    }
}
