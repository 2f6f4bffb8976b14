//! Payment service seam used by the order service.

use async_trait::async_trait;
use reddio_pay::types::{ExternalCreatePaymentRequest, ExternalCreatePaymentResponse, Payment};
use reddio_pay::{SdkError, Session};

/// The subset of the Reddio Pay API the order flow needs.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a checkout payment for a product token.
    async fn create_payment(
        &self,
        request: &ExternalCreatePaymentRequest,
    ) -> Result<ExternalCreatePaymentResponse, SdkError>;

    /// Fetch a payment by id.
    async fn payment(&self, payment_id: &str) -> Result<Payment, SdkError>;
}

#[async_trait]
impl PaymentGateway for Session {
    async fn create_payment(
        &self,
        request: &ExternalCreatePaymentRequest,
    ) -> Result<ExternalCreatePaymentResponse, SdkError> {
        self.payments().create_external(request).await
    }

    async fn payment(&self, payment_id: &str) -> Result<Payment, SdkError> {
        self.payments().get(payment_id).await
    }
}
