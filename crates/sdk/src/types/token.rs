//! Supported payment tokens.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

/// A payment token supported by the service.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Token contract identifier.
    pub token_id: String,
    /// Token name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Token contract address.
    pub contract_address: String,
    /// Decimal places of the base unit.
    pub decimals: u32,
    /// Numeric chain id.
    pub chain_id: u64,
    /// Human readable chain name.
    pub chain_name: String,
    /// Native currency symbol of the chain.
    pub chain_symbol: String,
    /// Block explorer base URL; may be empty.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub explorer_url: String,
    /// Token icon URL; may be empty.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub icon_url: String,
    /// Token standard, e.g. `erc20`.
    pub token_type: String,
    /// Whether the token can be used for new products.
    pub is_active: bool,
    /// Currency class reported by the service.
    pub currency_type: String,
    /// RFC 3339 creation time.
    pub created_at: String,
}

/// `GET /tokens`
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTokensResponse {
    /// Number of tokens returned.
    pub count: u64,
    /// Supported tokens.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub tokens: Vec<Token>,
}
