use crate::client::{ApiClient, AuthMode};
use crate::errors::Result;
use crate::types::ListTokensResponse;

/// Supported payment tokens.
#[derive(Debug, Clone, Copy)]
pub struct Tokens<'a> {
    client: &'a ApiClient,
}

impl<'a> Tokens<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /tokens`
    ///
    /// # Errors
    /// Any failure from [`ApiClient::get`].
    pub async fn list(&self) -> Result<ListTokensResponse> {
        self.client.get("/tokens", AuthMode::Required).await
    }
}
