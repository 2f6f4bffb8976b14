//! Request pipeline shared by every endpoint group.
//!
//! Builds the URL from the session base, attaches the bearer token according
//! to the endpoint's [`AuthMode`], encodes the JSON body, and classifies the
//! response into a decoded value or an [`SdkError`].

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tracing::{debug, instrument};
use url::Url;

use crate::auth::TokenHolder;
use crate::errors::{Result, SdkError};

/// Whether an endpoint carries the session's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Fails with [`SdkError::NotAuthenticated`] when no token is installed.
    Required,
    /// Attaches the token when one is installed, otherwise sends without it.
    Optional,
    /// Never attaches the token.
    None,
}

/// Query pairs appended to a request URL.
pub type Query = Vec<(&'static str, String)>;

/// HTTP pipeline bound to one base URL and one token holder.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<TokenHolder>,
}

impl ApiClient {
    /// Client for `base_url` reading bearer tokens from `tokens`.
    ///
    /// A trailing slash on `base_url` is ignored.
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str, tokens: Arc<TokenHolder>) -> Self {
        Self { http, base_url: normalize_base_url(base_url), tokens }
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token holder shared with the refresh task.
    #[must_use]
    pub fn tokens(&self) -> &Arc<TokenHolder> {
        &self.tokens
    }

    /// `GET` a path and decode the response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::build_request`] and the response classification rules
    /// on [`SdkError`].
    pub async fn get<R: DeserializeOwned>(&self, path: &str, auth: AuthMode) -> Result<R> {
        let request = self.build_request(Method::GET, path, &[], None, auth)?;
        self.execute(request).await
    }

    /// `GET` with query parameters.
    ///
    /// # Errors
    /// Same as [`ApiClient::get`].
    pub async fn get_with_query<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        auth: AuthMode,
    ) -> Result<R> {
        let request = self.build_request(Method::GET, path, query, None, auth)?;
        self.execute(request).await
    }

    /// `POST` a JSON body.
    ///
    /// # Errors
    /// [`SdkError::Serialize`] if the body cannot be encoded, otherwise as [`ApiClient::get`].
    pub async fn post<B, R>(&self, path: &str, body: &B, auth: AuthMode) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode_body(body)?;
        let request = self.build_request(Method::POST, path, &[], Some(body), auth)?;
        self.execute(request).await
    }

    /// `PUT` a JSON body.
    ///
    /// # Errors
    /// [`SdkError::Serialize`] if the body cannot be encoded, otherwise as [`ApiClient::get`].
    pub async fn put<B, R>(&self, path: &str, body: &B, auth: AuthMode) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode_body(body)?;
        let request = self.build_request(Method::PUT, path, &[], Some(body), auth)?;
        self.execute(request).await
    }

    /// Assemble a request without sending it.
    ///
    /// The auth check happens before anything else, so a `Required` endpoint
    /// with no installed token never reaches the network.
    ///
    /// # Errors
    ///
    /// - [`SdkError::NotAuthenticated`] for `Required` with an empty token
    /// - [`SdkError::Config`] if the URL or the token header is invalid
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
        auth: AuthMode,
    ) -> Result<reqwest::Request> {
        let token = match auth {
            AuthMode::None => None,
            AuthMode::Optional => Some(self.tokens.get()).filter(|t| !t.is_empty()),
            AuthMode::Required => {
                let token = self.tokens.get();
                if token.is_empty() {
                    return Err(SdkError::NotAuthenticated);
                }
                Some(token)
            }
        };

        let url = build_url(&self.base_url, path, query)?;
        let mut builder = self.http.request(method, url);

        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, bearer_header(&token)?);
        }
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        builder.build().map_err(|e| SdkError::Config(format!("invalid request: {e}")))
    }

    #[instrument(
        name = "api_request",
        skip(self, request),
        fields(method = %request.method(), path = %request.url().path())
    )]
    async fn execute<R: DeserializeOwned>(&self, request: reqwest::Request) -> Result<R> {
        let response = self.http.execute(request).await.map_err(SdkError::from_transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(SdkError::from_transport)?;

        debug!(status = status.as_u16(), bytes = body.len(), "api response");

        if status != StatusCode::OK {
            return Err(SdkError::Http { status: status.as_u16(), message: error_message(&body) });
        }
        decode_body(&body)
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

pub(crate) fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

pub(crate) fn build_url(base_url: &str, path: &str, query: &[(&str, String)]) -> Result<Url> {
    let mut url = Url::parse(&format!("{base_url}{path}"))
        .map_err(|e| SdkError::Config(format!("invalid request URL {base_url}{path}: {e}")))?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}

pub(crate) fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>> {
    serde_json::to_vec(body).map_err(|e| SdkError::Serialize(e.to_string()))
}

pub(crate) fn decode_body<R: DeserializeOwned>(body: &[u8]) -> Result<R> {
    if body.is_empty() {
        return Err(SdkError::Decode("empty response body".to_string()));
    }
    serde_json::from_slice(body).map_err(|e| SdkError::Decode(e.to_string()))
}

/// Server-provided message for a failed response.
///
/// Uses the envelope's `message` field when present and non-empty, else the
/// raw body text.
pub(crate) fn error_message(body: &[u8]) -> String {
    #[serde_as]
    #[derive(Deserialize)]
    struct Envelope {
        #[serde_as(deserialize_as = "DefaultOnNull")]
        #[serde(default)]
        message: String,
    }

    match serde_json::from_slice::<Envelope>(body) {
        Ok(envelope) if !envelope.message.is_empty() => envelope.message,
        _ => String::from_utf8_lossy(body).trim().to_string(),
    }
}

fn bearer_header(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
        SdkError::Config("access token contains characters not allowed in a header".to_string())
    })?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_with(base_url: &str, token: &str) -> ApiClient {
        let tokens = Arc::new(TokenHolder::new());
        tokens.set(token);
        ApiClient::new(reqwest::Client::new(), base_url, tokens)
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        value: String,
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = client_with("https://api.example.com/", "t");
        assert_eq!(client.base_url(), "https://api.example.com");

        let req = client.build_request(Method::GET, "/tokens", &[], None, AuthMode::None).unwrap();
        assert_eq!(req.url().as_str(), "https://api.example.com/tokens");
    }

    #[test]
    fn required_auth_without_token_fails_before_network() {
        let client = client_with("https://api.example.com", "");
        let err = client
            .build_request(Method::GET, "/accounts/info", &[], None, AuthMode::Required)
            .unwrap_err();
        assert!(matches!(err, SdkError::NotAuthenticated));
    }

    #[test]
    fn optional_auth_attaches_only_installed_token() {
        let anonymous = client_with("https://api.example.com", "");
        let req = anonymous
            .build_request(Method::POST, "/external/payments", &[], None, AuthMode::Optional)
            .unwrap();
        assert!(req.headers().get(AUTHORIZATION).is_none());

        let authed = client_with("https://api.example.com", "abc");
        let req = authed
            .build_request(Method::POST, "/external/payments", &[], None, AuthMode::Optional)
            .unwrap();
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer abc");
    }

    #[test]
    fn none_auth_never_attaches_token() {
        let client = client_with("https://api.example.com", "abc");
        let req = client
            .build_request(Method::POST, "/accounts/wallet/info", &[], None, AuthMode::None)
            .unwrap();
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let client = client_with("not a url", "abc");
        let err = client.build_request(Method::GET, "/tokens", &[], None, AuthMode::None).unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn query_pairs_are_encoded() {
        let client = client_with("https://api.example.com", "abc");
        let query = [("limit", "25".to_string()), ("offset", "50".to_string())];
        let req =
            client.build_request(Method::GET, "/payments/list", &query, None, AuthMode::Required).unwrap();
        assert_eq!(req.url().query(), Some("limit=25&offset=50"));
    }

    #[test]
    fn identical_inputs_build_identical_requests() {
        let client = client_with("https://api.example.com", "abc");
        let body = encode_body(&json!({"name": "P", "price": "100"})).unwrap();
        let a = client
            .build_request(Method::POST, "/products", &[], Some(body.clone()), AuthMode::Required)
            .unwrap();
        let b = client
            .build_request(Method::POST, "/products", &[], Some(body), AuthMode::Required)
            .unwrap();

        assert_eq!(a.method(), b.method());
        assert_eq!(a.url(), b.url());
        assert_eq!(a.headers(), b.headers());
        assert_eq!(
            a.body().and_then(reqwest::Body::as_bytes),
            b.body().and_then(reqwest::Body::as_bytes)
        );
    }

    #[test]
    fn error_message_prefers_envelope() {
        assert_eq!(error_message(br#"{"message":"invalid token"}"#), "invalid token");
        assert_eq!(error_message(br#"{"message":""}"#), r#"{"message":""}"#);
        assert_eq!(error_message(b"upstream timeout\n"), "upstream timeout");
    }

    #[test]
    fn empty_body_is_decode_error() {
        let err = decode_body::<Echo>(b"").unwrap_err();
        assert!(matches!(err, SdkError::Decode(_)));
    }

    #[tokio::test]
    async fn get_decodes_ok_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/echo"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": "hi"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with(&server.uri(), "test-token");
        let echo: Echo = client.get("/echo", AuthMode::Required).await.unwrap();
        assert_eq!(echo, Echo { value: "hi".into() });
    }

    #[tokio::test]
    async fn post_sends_json_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": "posted"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with(&server.uri(), "t");
        let echo: Echo = client.post("/echo", &json!({"a": 1}), AuthMode::Required).await.unwrap();
        assert_eq!(echo.value, "posted");
    }

    #[tokio::test]
    async fn non_ok_status_becomes_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/created"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"value": "x"})))
            .mount(&server)
            .await;

        let client = client_with(&server.uri(), "t");

        let err = client.get::<Echo>("/missing", AuthMode::Required).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.server_message(), Some("not found"));

        // Only 200 counts as success.
        let err = client.get::<Echo>("/created", AuthMode::Required).await.unwrap_err();
        assert_eq!(err.status(), Some(201));
    }

    #[tokio::test]
    async fn malformed_ok_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/echo"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let client = client_with(&server.uri(), "t");
        let err = client.get::<Echo>("/echo", AuthMode::Required).await.unwrap_err();
        assert!(matches!(err, SdkError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        // Port 9 (discard) on localhost is closed on any sane test host.
        let client = client_with("http://127.0.0.1:9", "t");
        let err = client.get::<Echo>("/echo", AuthMode::Required).await.unwrap_err();
        assert!(matches!(err, SdkError::Transport(_)));
    }
}
