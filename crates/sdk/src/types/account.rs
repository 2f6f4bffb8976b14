//! Merchant account records.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

/// `GET /accounts/info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Login email of the merchant.
    pub email: String,
    /// URL notified when a payment completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<String>,
    /// Registered company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Company website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_url: Option<String>,
    /// Whether the account has been activated.
    pub activated: bool,
    /// RFC 3339 creation time.
    pub created_at: String,
}

/// `PUT /accounts/webhook`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateWebhookRequest {
    /// New webhook URL.
    pub webhook: String,
}

/// `PUT /accounts/info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAccountInfoRequest {
    /// Company name to store.
    pub company_name: String,
    /// Company website to store.
    pub company_url: String,
}

/// `POST /accounts/wallet/info`
///
/// Leaving `token_symbol` unset queries every supported token on the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRequest {
    /// Address to inspect.
    pub wallet_address: String,
    /// Numeric chain id, e.g. `50341` for Reddio.
    pub chain_id: u64,
    /// Optional symbol filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
}

impl BalanceRequest {
    /// Query every supported token held by `wallet_address` on `chain_id`.
    #[must_use]
    pub fn new(wallet_address: impl Into<String>, chain_id: u64) -> Self {
        Self { wallet_address: wallet_address.into(), chain_id, token_symbol: None }
    }

    /// Restrict the query to a single token symbol.
    #[must_use]
    pub fn token_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.token_symbol = Some(symbol.into());
        self
    }
}

/// Balance of one token held by a wallet.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
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
    /// Raw balance in base units.
    pub balance: String,
    /// Human readable balance.
    pub formatted_balance: String,
    /// Chain the balance was read from.
    pub chain_id: u64,
    /// Human readable chain name.
    pub chain_name: String,
    /// Native currency symbol of the chain.
    pub chain_symbol: String,
    /// Empty when the service has no icon.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub icon_url: String,
}

/// Balances held by one wallet on one chain.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResponse {
    /// Address that was queried.
    pub wallet_address: String,
    /// Chain the balances were read from.
    pub chain_id: u64,
    /// Human readable chain name.
    pub chain_name: String,
    /// One entry per token with a balance.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub balances: Vec<TokenBalance>,
}

/// Recipient address registered for a token on the account.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAddress {
    /// Owning merchant account.
    pub account_id: String,
    /// Token the address receives.
    pub token_id: String,
    /// Address that receives the merchant share.
    pub recipient_address: String,
    /// Merchant label for the address; may be empty.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub ref_name: String,
    /// RFC 3339 registration time.
    pub created_at: String,
}
