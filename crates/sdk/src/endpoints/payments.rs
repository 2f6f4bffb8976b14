use crate::client::{ApiClient, AuthMode, Query};
use crate::errors::Result;
use crate::types::{
    ExternalCreatePaymentRequest, ExternalCreatePaymentResponse, ListPaymentsResponse,
    MessageResponse, PaginatedPaymentsResponse, Payment, PaymentSuccessNotifyRequest,
};

/// Payment routes, including the public checkout endpoints under `/external`.
#[derive(Debug, Clone, Copy)]
pub struct Payments<'a> {
    client: &'a ApiClient,
}

impl<'a> Payments<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /payments/product/{productId}`
    ///
    /// # Errors
    /// Any failure from [`ApiClient::get`].
    pub async fn list_by_product(&self, product_id: &str) -> Result<ListPaymentsResponse> {
        self.client.get(&format!("/payments/product/{product_id}"), AuthMode::Required).await
    }

    /// `GET /payments/list`
    ///
    /// `limit` is sent only when positive, `offset` only when non-negative.
    ///
    /// # Errors
    /// Any failure from [`ApiClient::get_with_query`].
    pub async fn list(&self, limit: i64, offset: i64) -> Result<PaginatedPaymentsResponse> {
        let query = pagination_query(limit, offset);
        self.client.get_with_query("/payments/list", &query, AuthMode::Required).await
    }

    /// `GET /payments/{paymentId}`
    ///
    /// # Errors
    /// Any failure from [`ApiClient::get`].
    pub async fn get(&self, payment_id: &str) -> Result<Payment> {
        self.client.get(&format!("/payments/{payment_id}"), AuthMode::Required).await
    }

    /// `POST /external/payments`
    ///
    /// # Errors
    /// Any failure from [`ApiClient::post`].
    pub async fn create_external(
        &self,
        request: &ExternalCreatePaymentRequest,
    ) -> Result<ExternalCreatePaymentResponse> {
        self.client.post("/external/payments", request, AuthMode::Optional).await
    }

    /// `POST /external/payments/success/notify`
    ///
    /// # Errors
    /// Any failure from [`ApiClient::post`].
    pub async fn notify_success(
        &self,
        request: &PaymentSuccessNotifyRequest,
    ) -> Result<MessageResponse> {
        self.client
            .post("/external/payments/success/notify", request, AuthMode::Optional)
            .await
    }
}

/// Query pairs for the paginated payment listing.
pub fn pagination_query(limit: i64, offset: i64) -> Query {
    let mut query = Query::new();
    if limit > 0 {
        query.push(("limit", limit.to_string()));
    }
    if offset >= 0 {
        query.push(("offset", offset.to_string()));
    }
    query
}
