//! Payment lifecycle records.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

/// Remote payment status values the order system reacts to.
pub mod status {
    /// Payment opened, awaiting funds.
    pub const CREATED: &str = "created";
    /// Funds received on chain.
    pub const PAID: &str = "paid";
    /// Payment closed without completing.
    pub const CLOSED: &str = "closed";
}

/// A single purchase attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment identifier.
    pub payment_id: String,
    /// Merchant account that owns the payment.
    pub account_id: String,
    /// Token the payment is made in.
    pub token_id: String,
    /// Product being purchased.
    pub product_id: String,
    /// Product token binding that fixes the price.
    pub product_token_id: String,
    /// Number of items purchased.
    pub count: i64,
    /// Remote status, see [`status`].
    pub status: String,
    /// Email supplied by the payer, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_email: Option<String>,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// RFC 3339 time of the last status change.
    pub updated_at: String,
    /// Set once the payment is paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
    /// Set once the payment is closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
    /// Why the payment was closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_reason: Option<String>,
    /// On-chain transaction that settled the payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    /// Block that included the transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<i64>,
    /// Gas consumed by the transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<i64>,
    /// Gas price paid, in wei.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    /// Total charged, in base units.
    pub total_amount: String,
    /// Service fee, in base units.
    pub fee_amount: String,
    /// Merchant share, in base units.
    pub recipient_amount: String,
}

impl Payment {
    /// Whether the remote status is [`status::PAID`].
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.status == status::PAID
    }
}

/// `GET /payments/product/{productId}`
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPaymentsResponse {
    /// Human readable status message.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub message: String,
    /// Payments for the product.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub payments: Vec<Payment>,
}

/// `GET /payments/list`
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedPaymentsResponse {
    /// Human readable status message.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub message: String,
    /// Payments on this page.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Payments across all pages.
    pub total_count: i64,
    /// Number of pages at this page size.
    pub total_pages: i64,
    /// 1-based index of this page.
    pub current_page: i64,
    /// Payments per page.
    pub page_size: i64,
}

/// `POST /external/payments`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCreatePaymentRequest {
    /// Product to purchase.
    pub product_id: String,
    /// Token binding to pay with.
    pub product_token_id: String,
    /// Number of items.
    pub count: u32,
}

/// One leg of a payment split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceiver {
    /// `"fee"` or `"merchant"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Address receiving this leg.
    pub recipient_address: String,
    /// Amount in base units.
    pub amount: String,
    /// Percentage of the total.
    pub rate: String,
}

/// A newly opened checkout payment.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCreatePaymentResponse {
    /// Human readable status message.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub message: String,
    /// Identifier of the new payment.
    pub payment_id: String,
    /// Hosted page where the payer completes the payment.
    pub pay_link: String,
    /// Payment router contract the payer sends funds to.
    pub contract_address: String,
    /// How the total is split between fee and merchant.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub payment_receivers: Vec<PaymentReceiver>,
    /// Contract address of the payment token.
    pub token_address: String,
    /// Decimal places of the payment token.
    pub decimals: u32,
}

/// `POST /external/payments/success/notify`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSuccessNotifyRequest {
    /// Payment that completed.
    pub payment_id: String,
    /// Where to send the receipt.
    pub email: String,
}
