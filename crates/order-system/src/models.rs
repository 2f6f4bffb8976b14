//! Local order records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a local order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created; payment not yet confirmed.
    Pending,
    /// Remote payment confirmed.
    Paid,
    /// The payment could not be created.
    Failed,
    /// Cancelled by the merchant.
    Cancelled,
    /// Payment window elapsed.
    Expired,
}

impl OrderStatus {
    /// Stored and serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            "expired" => Ok(Self::Expired),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// A merchant-side order linked to a remote payment.
///
/// Remote fields are empty strings until a payment has been created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Local primary key.
    pub id: i64,
    /// `ORD` followed by eight digits.
    pub order_number: String,
    /// Buyer name.
    pub customer_name: String,
    /// Buyer email.
    pub customer_email: String,
    /// Remote product being bought.
    pub product_id: String,
    /// Remote token binding used for the price.
    pub product_token_id: String,
    /// Number of items.
    pub quantity: i64,
    /// Display total with two decimals.
    pub total_amount: String,
    /// Local lifecycle state.
    pub status: OrderStatus,
    /// Remote payment id.
    pub reddio_payment_id: String,
    /// Hosted checkout URL.
    pub reddio_pay_link: String,
    /// Last remote status seen.
    pub reddio_status: String,
    /// Settling transaction, once paid.
    pub transaction_hash: String,
    /// Insert time.
    pub created_at: DateTime<Utc>,
    /// Time of the last change.
    pub updated_at: DateTime<Utc>,
    /// Set when the order becomes paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

/// Fields supplied when inserting an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Unique order number.
    pub order_number: String,
    /// Buyer name.
    pub customer_name: String,
    /// Buyer email.
    pub customer_email: String,
    /// Remote product being bought.
    pub product_id: String,
    /// Remote token binding used for the price.
    pub product_token_id: String,
    /// Number of items.
    pub quantity: i64,
    /// Display total with two decimals.
    pub total_amount: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Failed,
            OrderStatus::Cancelled,
            OrderStatus::Expired,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
            assert_eq!(serde_json::to_value(status).unwrap(), status.as_str());
        }
        assert!("refunded".parse::<OrderStatus>().is_err());
    }
}
