use crate::{
    error::PaymentsError,
    models::{
        to_minor_units, CheckoutMode, CheckoutSessionParams, PaymentSessionRequest, PriceLine,
        SessionResult,
    },
    services::PaymentProvider,
};
use std::sync::Arc;

/// Turns order data into a hosted checkout session.
pub struct SessionService {
    provider: Arc<dyn PaymentProvider>,
    success_url: String,
    cancel_url: String,
}

impl SessionService {
    pub fn new(provider: Arc<dyn PaymentProvider>, success_url: String, cancel_url: String) -> Self {
        Self {
            provider,
            success_url,
            cancel_url,
        }
    }

    /// Maps the request onto provider params. No validation happens here;
    /// the provider is the authority on what it accepts.
    pub fn build_params(&self, request: &PaymentSessionRequest) -> CheckoutSessionParams {
        let line_items = request
            .items
            .iter()
            .map(|item| PriceLine {
                currency: request.currency.clone(),
                product_name: item.name.clone(),
                unit_amount: to_minor_units(item.price),
                quantity: item.quantity,
            })
            .collect();

        CheckoutSessionParams {
            line_items,
            mode: CheckoutMode::Payment,
            success_url: self.success_url.clone(),
            cancel_url: self.cancel_url.clone(),
            order_id: request.order_id.clone(),
        }
    }

    pub async fn create_payment_session(
        &self,
        request: &PaymentSessionRequest,
    ) -> Result<SessionResult, PaymentsError> {
        let params = self.build_params(request);
        let session = self.provider.create_checkout_session(&params).await?;

        tracing::info!(
            order_id = %request.order_id,
            session_id = %session.id,
            items = params.line_items.len(),
            "Checkout session created"
        );

        Ok(session.into())
    }
}
