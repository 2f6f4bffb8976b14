//! Order creation and payment reconciliation.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use reddio_pay::types::{status as payment_status, ExternalCreatePaymentRequest};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::gateway::PaymentGateway;
use crate::database::OrderRepository;
use crate::errors::{AppError, Result};
use crate::models::{NewOrder, Order, OrderStatus};

/// Unit price charged per item, in the order's display currency.
const UNIT_PRICE: i64 = 100;

/// Customer input for a new order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOrder {
    /// Buyer name.
    #[serde(default)]
    pub customer_name: String,
    /// Buyer email.
    #[serde(default)]
    pub customer_email: String,
    /// Remote product to buy.
    #[serde(default)]
    pub product_id: String,
    /// Remote token binding to pay with.
    #[serde(default)]
    pub product_token_id: String,
    /// Number of items, at least 1.
    #[serde(default)]
    pub quantity: i64,
}

impl CreateOrder {
    /// Check required fields and quantity.
    ///
    /// # Errors
    /// `AppError::Validation` if any field is empty or quantity is below 1.
    pub fn validate(&self) -> Result<()> {
        let missing = [
            &self.customer_name,
            &self.customer_email,
            &self.product_id,
            &self.product_token_id,
        ]
        .iter()
        .any(|field| field.trim().is_empty());

        if missing || self.quantity < 1 {
            return Err(AppError::Validation(
                "Missing required fields or invalid quantity".to_string(),
            ));
        }
        Ok(())
    }
}

/// Order workflows on top of local storage and the payment service.
pub struct OrderService {
    repo: OrderRepository,
    gateway: Arc<dyn PaymentGateway>,
}

impl OrderService {
    /// Service over `repo` opening payments through `gateway`.
    #[must_use]
    pub fn new(repo: OrderRepository, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { repo, gateway }
    }

    /// Store a pending order and open a payment for it.
    ///
    /// If the payment cannot be created the order is kept with status
    /// `failed` and the payment error is returned.
    ///
    /// # Errors
    /// `Validation` for bad input and `Payment` when the payment cannot be
    /// opened. Storage failures surface as `Database`.
    #[instrument(skip(self, input), fields(product_id = %input.product_id, quantity = input.quantity))]
    pub async fn create_order(&self, input: CreateOrder) -> Result<Order> {
        input.validate()?;
        let quantity = u32::try_from(input.quantity)
            .map_err(|_| AppError::Validation("Missing required fields or invalid quantity".into()))?;

        let new_order = NewOrder {
            order_number: generate_order_number(),
            total_amount: total_amount(input.quantity)?,
            customer_name: input.customer_name,
            customer_email: input.customer_email,
            product_id: input.product_id,
            product_token_id: input.product_token_id,
            quantity: input.quantity,
        };
        let mut order = self.repo.insert(new_order).await?;

        info!(order_number = %order.order_number, "creating external payment");
        let request = ExternalCreatePaymentRequest {
            product_id: order.product_id.clone(),
            product_token_id: order.product_token_id.clone(),
            count: quantity,
        };

        let payment = match self.gateway.create_payment(&request).await {
            Ok(payment) => payment,
            Err(err) => {
                warn!(order_number = %order.order_number, error = %err, "payment creation failed");
                if let Err(mark_err) = self.repo.mark_failed(order.id).await {
                    warn!(order_id = order.id, error = %mark_err, "failed to mark order as failed");
                }
                return Err(AppError::Payment(err));
            }
        };

        let updated_at = self
            .repo
            .attach_payment(
                order.id,
                payment.payment_id.clone(),
                payment.pay_link.clone(),
                payment_status::CREATED.to_string(),
            )
            .await?;

        order.reddio_payment_id = payment.payment_id;
        order.reddio_pay_link = payment.pay_link;
        order.reddio_status = payment_status::CREATED.to_string();
        order.updated_at = updated_at;

        info!(
            order_number = %order.order_number,
            payment_id = %order.reddio_payment_id,
            "order created"
        );
        Ok(order)
    }

    /// Order by id, or `NotFound`.
    ///
    /// # Errors
    /// `NotFound` if no order has this id.
    pub async fn get_order(&self, id: i64) -> Result<Order> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }

    /// Order by number, or `NotFound`.
    ///
    /// # Errors
    /// `NotFound` if no order has this number.
    pub async fn get_order_by_number(&self, order_number: &str) -> Result<Order> {
        self.repo
            .find_by_number(order_number)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }

    /// Orders newest first with the total count for `status` (all when `None`).
    ///
    /// # Errors
    /// `Database` on storage failure.
    pub async fn list_orders(
        &self,
        page: u32,
        limit: u32,
        status: Option<String>,
    ) -> Result<(Vec<Order>, i64)> {
        self.repo.list(page, limit, status).await
    }

    /// Pull the remote payment status into the local order.
    ///
    /// Returns the order as stored after the update.
    ///
    /// # Errors
    /// `NotFound` for an unknown id and `Validation` when the order has no
    /// remote payment id. A failed remote lookup surfaces as `Payment`.
    #[instrument(skip(self))]
    pub async fn check_payment(&self, id: i64) -> Result<Order> {
        let order = self.get_order(id).await?;
        if order.reddio_payment_id.is_empty() {
            return Err(AppError::Validation(format!(
                "no Reddio Pay payment ID found for order {id}"
            )));
        }

        let payment = self.gateway.payment(&order.reddio_payment_id).await?;

        if payment.is_paid() && order.status != OrderStatus::Paid {
            self.repo
                .mark_paid(
                    id,
                    payment.status.clone(),
                    payment.transaction_hash.clone().unwrap_or_default(),
                    Utc::now(),
                )
                .await?;
            info!(order_number = %order.order_number, "order paid");
        } else {
            self.repo.update_reddio_status(id, payment.status.clone()).await?;
        }

        self.get_order(id).await
    }
}

/// `ORD` followed by eight random digits.
fn generate_order_number() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..99_999_999);
    format!("ORD{n:08}")
}

fn total_amount(quantity: i64) -> Result<String> {
    quantity
        .checked_mul(UNIT_PRICE)
        .map(|total| format!("{total}.00"))
        .ok_or_else(|| AppError::Validation("Missing required fields or invalid quantity".into()))
}
