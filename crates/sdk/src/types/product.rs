//! Products and their token price bindings.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

/// `POST /products`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProductRequest {
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Content delivered after purchase.
    pub content: String,
    /// Tokens the product can be paid with.
    pub token_ids: Vec<String>,
    /// Price in token base units.
    pub price: String,
    /// Address that receives the merchant share.
    pub recipient_address: String,
}

/// Binding of a product to one payment token at a fixed price.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductToken {
    /// Binding identifier.
    pub product_token_id: String,
    /// Product the binding belongs to.
    pub product_id: String,
    /// Owning merchant account.
    pub account_id: String,
    /// Payment token.
    pub token_id: String,
    /// Price in token base units.
    pub price: String,
    /// Address that receives the merchant share.
    pub recipient_address: String,
    /// Router contract for this chain; may be empty.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub payment_router_address: String,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// Chain id as reported by the service; may be empty.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub chain_id: String,
    /// Human readable chain name; may be empty.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub chain_name: String,
}

/// A product that can be bought with one or more tokens.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub product_id: String,
    /// Owning merchant account.
    pub account_id: String,
    /// Display name.
    pub name: String,
    /// Short description, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Content delivered after purchase.
    pub content: String,
    /// Whether new payments can be opened.
    pub active: bool,
    /// Accepted tokens and their prices.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub product_tokens: Vec<ProductToken>,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// Items sold so far.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub total_sale_count: i64,
    /// Sales total as reported by the service.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub total_sale_amount: f64,
}

impl Product {
    /// Look up the binding for `token_id`, if the product accepts it.
    #[must_use]
    pub fn token(&self, token_id: &str) -> Option<&ProductToken> {
        self.product_tokens.iter().find(|t| t.token_id == token_id)
    }
}

/// Result of creating a product.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProductResponse {
    /// Human readable status message.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub message: String,
    /// The stored product.
    pub product: Product,
}

/// `GET /products`
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListProductsResponse {
    /// Human readable status message.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub message: String,
    /// Products owned by the account.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub products: Vec<Product>,
}

/// `POST /products/{id}/token`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddProductTokenRequest {
    /// Token to accept.
    pub token_id: String,
    /// Price in token base units.
    pub price: String,
    /// Address that receives the merchant share.
    pub recipient_address: String,
}

/// Result of binding a token to a product.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddProductTokenResponse {
    /// Human readable status message.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub message: String,
    /// The new binding.
    pub product_token: ProductToken,
}

/// Sales summary for one product token.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTokenStatus {
    /// Product name, when the service includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Token name.
    pub token_name: String,
    /// Human readable chain name.
    pub chain_name: String,
    /// Binding identifier.
    pub product_token_id: String,
    /// Items sold with this token.
    pub total_sale_count: i64,
    /// Sales total in base units.
    pub total_sale_amount: i64,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// Decimal places of the token.
    pub decimals: u32,
    /// Payment token.
    pub token_id: String,
    /// Free-form note; may be empty.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub desc: String,
}

/// `GET /products/{id}/token/status`
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTokenStatusResponse {
    /// Human readable status message.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub message: String,
    /// One entry per bound token.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub status: Vec<ProductTokenStatus>,
}
