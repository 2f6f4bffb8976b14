use crate::client::{ApiClient, AuthMode};
use crate::errors::Result;
use crate::types::{
    AccountAddress, AccountInfo, BalanceRequest, BalanceResponse, MessageResponse,
    UpdateAccountInfoRequest, UpdateWebhookRequest,
};

/// Merchant account routes.
#[derive(Debug, Clone, Copy)]
pub struct Accounts<'a> {
    client: &'a ApiClient,
}

impl<'a> Accounts<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /accounts/info`
    ///
    /// # Errors
    /// Any failure from [`ApiClient::get`].
    pub async fn info(&self) -> Result<AccountInfo> {
        self.client.get("/accounts/info", AuthMode::Required).await
    }

    /// `PUT /accounts/webhook`
    ///
    /// # Errors
    /// Any failure from [`ApiClient::put`].
    pub async fn update_webhook(&self, webhook: impl Into<String>) -> Result<MessageResponse> {
        let body = UpdateWebhookRequest { webhook: webhook.into() };
        self.client.put("/accounts/webhook", &body, AuthMode::Required).await
    }

    /// `PUT /accounts/info`
    ///
    /// # Errors
    /// Any failure from [`ApiClient::put`].
    pub async fn update_info(
        &self,
        company_name: impl Into<String>,
        company_url: impl Into<String>,
    ) -> Result<MessageResponse> {
        let body = UpdateAccountInfoRequest {
            company_name: company_name.into(),
            company_url: company_url.into(),
        };
        self.client.put("/accounts/info", &body, AuthMode::Required).await
    }

    /// `POST /accounts/wallet/info`
    ///
    /// Public lookup; sent without the bearer token.
    ///
    /// # Errors
    /// Any failure from [`ApiClient::post`].
    pub async fn wallet_balances(&self, request: &BalanceRequest) -> Result<BalanceResponse> {
        self.client.post("/accounts/wallet/info", request, AuthMode::None).await
    }

    /// `GET /accounts/addresses`
    ///
    /// # Errors
    /// Any failure from [`ApiClient::get`].
    pub async fn addresses(&self) -> Result<Vec<AccountAddress>> {
        self.client.get("/accounts/addresses", AuthMode::Required).await
    }
}
