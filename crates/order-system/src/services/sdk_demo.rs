//! Startup walkthrough of the payment API.
//!
//! Each step logs its outcome and the walkthrough always continues. When a
//! step that produces an id fails, later steps use a placeholder id so the
//! remaining calls still go out.

use std::sync::Arc;
use std::time::Duration;

use reddio_pay::types::{AddProductTokenRequest, CreateProductRequest, ExternalCreatePaymentRequest};
use reddio_pay::{Result as SdkResult, Session};
use tracing::{info, warn};

const DEMO_TOKEN_ID: &str = "0x1234567890abcdef1234567890abcdef12345678";
const DEMO_PRICE: &str = "1000000000000000000";
const DEMO_RECIPIENT: &str = "0xabcdef1234567890abcdef1234567890abcdef12";

const EXTRA_TOKEN_ID: &str = "0x9876543210fedcba9876543210fedcba98765432";
const EXTRA_PRICE: &str = "2000000000000000000";
const EXTRA_RECIPIENT: &str = "0xfedcba9876543210fedcba9876543210fedcba98";

const PLACEHOLDER_PRODUCT_ID: &str = "demo-product-id";
const PLACEHOLDER_PRODUCT_TOKEN_ID: &str = "demo-product-token-id";
const PLACEHOLDER_PAYMENT_ID: &str = "demo-payment-id";

/// Outcome of a walkthrough run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DemoReport {
    /// Steps that succeeded, in order.
    pub completed: Vec<&'static str>,
    /// Steps that failed with their error text.
    pub failed: Vec<(&'static str, String)>,
}

impl DemoReport {
    fn record<T>(&mut self, step: &'static str, outcome: &SdkResult<T>) {
        match outcome {
            Ok(_) => self.completed.push(step),
            Err(err) => {
                warn!(step, error = %err, "demo step failed, continuing");
                self.failed.push((step, err.to_string()));
            }
        }
    }
}

/// Walkthrough of the main payment API calls.
pub struct SdkDemo {
    session: Arc<Session>,
    step_delay: Duration,
}

impl SdkDemo {
    /// Walkthrough over `session` with no delay between steps.
    #[must_use]
    pub fn new(session: Arc<Session>) -> Self {
        Self { session, step_delay: Duration::ZERO }
    }

    /// Pause between steps.
    #[must_use]
    pub const fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    /// Run every step in order.
    pub async fn run_all(&self) -> DemoReport {
        info!("payment API walkthrough started");
        let mut report = DemoReport::default();

        let listed = self.list_products().await;
        report.record("list_products", &listed);
        self.pause().await;

        let created = self.create_product().await;
        report.record("create_product", &created);
        let product_id = created.unwrap_or_else(|_| PLACEHOLDER_PRODUCT_ID.to_string());
        self.pause().await;

        let fetched = self.get_product(&product_id).await;
        report.record("get_product", &fetched);
        self.pause().await;

        let added = self.add_product_token(&product_id).await;
        report.record("add_product_token", &added);
        let product_token_id = added.unwrap_or_else(|_| PLACEHOLDER_PRODUCT_TOKEN_ID.to_string());
        self.pause().await;

        let payment = self.create_payment(&product_id, &product_token_id).await;
        report.record("create_external_payment", &payment);
        let payment_id = payment.unwrap_or_else(|_| PLACEHOLDER_PAYMENT_ID.to_string());
        self.pause().await;

        let status = self.get_payment(&payment_id).await;
        report.record("get_payment", &status);

        info!(
            completed = report.completed.len(),
            failed = report.failed.len(),
            "payment API walkthrough finished"
        );
        report
    }

    async fn pause(&self) {
        if !self.step_delay.is_zero() {
            tokio::time::sleep(self.step_delay).await;
        }
    }

    async fn list_products(&self) -> SdkResult<()> {
        let response = self.session.products().list().await?;
        info!(count = response.products.len(), "listed products");
        for (i, product) in response.products.iter().enumerate() {
            info!(
                index = i + 1,
                product_id = %product.product_id,
                name = %product.name,
                active = product.active,
                "product"
            );
        }
        Ok(())
    }

    async fn create_product(&self) -> SdkResult<String> {
        let request = CreateProductRequest {
            name: "SDK Demo Product".to_string(),
            description: "This is a demo product created through the Rust SDK".to_string(),
            content: "Product content description".to_string(),
            token_ids: vec![DEMO_TOKEN_ID.to_string()],
            price: DEMO_PRICE.to_string(),
            recipient_address: DEMO_RECIPIENT.to_string(),
        };
        let response = self.session.products().create(&request).await?;
        info!(
            product_id = %response.product.product_id,
            name = %response.product.name,
            "created product"
        );
        Ok(response.product.product_id)
    }

    async fn get_product(&self, product_id: &str) -> SdkResult<()> {
        let product = self.session.products().get(product_id).await?;
        info!(
            product_id = %product.product_id,
            name = %product.name,
            active = product.active,
            "fetched product"
        );
        Ok(())
    }

    async fn add_product_token(&self, product_id: &str) -> SdkResult<String> {
        let request = AddProductTokenRequest {
            token_id: EXTRA_TOKEN_ID.to_string(),
            price: EXTRA_PRICE.to_string(),
            recipient_address: EXTRA_RECIPIENT.to_string(),
        };
        let response = self.session.products().add_token(product_id, &request).await?;
        let token = response.product_token;
        info!(
            product_token_id = %token.product_token_id,
            token_id = %token.token_id,
            price = %token.price,
            "added product token"
        );
        Ok(token.product_token_id)
    }

    async fn create_payment(&self, product_id: &str, product_token_id: &str) -> SdkResult<String> {
        let request = ExternalCreatePaymentRequest {
            product_id: product_id.to_string(),
            product_token_id: product_token_id.to_string(),
            count: 1,
        };
        let response = self.session.payments().create_external(&request).await?;
        info!(payment_id = %response.payment_id, pay_link = %response.pay_link, "created payment");
        Ok(response.payment_id)
    }

    async fn get_payment(&self, payment_id: &str) -> SdkResult<()> {
        let payment = self.session.payments().get(payment_id).await?;
        info!(
            payment_id = %payment.payment_id,
            status = %payment.status,
            transaction_hash = payment.transaction_hash.as_deref().unwrap_or(""),
            "fetched payment"
        );
        Ok(())
    }
}
