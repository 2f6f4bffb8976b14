use crate::client::{ApiClient, AuthMode};
use crate::errors::Result;
use crate::types::{
    AddProductTokenRequest, AddProductTokenResponse, CreateProductRequest, CreateProductResponse,
    ListProductsResponse, Product, ProductTokenStatusResponse,
};

/// Product catalogue routes.
#[derive(Debug, Clone, Copy)]
pub struct Products<'a> {
    client: &'a ApiClient,
}

impl<'a> Products<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /products`
    ///
    /// # Errors
    /// Any failure from [`ApiClient::post`].
    pub async fn create(&self, request: &CreateProductRequest) -> Result<CreateProductResponse> {
        self.client.post("/products", request, AuthMode::Required).await
    }

    /// `GET /products`
    ///
    /// # Errors
    /// Any failure from [`ApiClient::get`].
    pub async fn list(&self) -> Result<ListProductsResponse> {
        self.client.get("/products", AuthMode::Required).await
    }

    /// `GET /products/{id}`
    ///
    /// # Errors
    /// Any failure from [`ApiClient::get`].
    pub async fn get(&self, product_id: &str) -> Result<Product> {
        self.client.get(&format!("/products/{product_id}"), AuthMode::Required).await
    }

    /// `POST /products/{id}/token`
    ///
    /// # Errors
    /// Any failure from [`ApiClient::post`].
    pub async fn add_token(
        &self,
        product_id: &str,
        request: &AddProductTokenRequest,
    ) -> Result<AddProductTokenResponse> {
        self.client.post(&format!("/products/{product_id}/token"), request, AuthMode::Required).await
    }

    /// `GET /products/{id}/token/status`
    ///
    /// # Errors
    /// Any failure from [`ApiClient::get`].
    pub async fn token_status(&self, product_id: &str) -> Result<ProductTokenStatusResponse> {
        self.client
            .get(&format!("/products/{product_id}/token/status"), AuthMode::Required)
            .await
    }
}
