use crate::{
    error::PaymentsError,
    models::{CheckoutMode, CheckoutSessionParams, PriceLine, SessionResult, ORDER_ID_METADATA_KEY},
};
use async_trait::async_trait;
use std::collections::HashMap;
use stripe::{
    CreateCheckoutSession, CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData, CreateCheckoutSessionPaymentIntentData,
    Currency,
};

/// Outbound calls to the payment provider.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<CheckoutSession, PaymentsError>;
}

/// The parts of a created checkout session this service reads back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

impl From<CheckoutSession> for SessionResult {
    fn from(session: CheckoutSession) -> Self {
        Self {
            url: session.url,
            success_url: session.success_url,
            cancel_url: session.cancel_url,
        }
    }
}

impl From<stripe::CheckoutSession> for CheckoutSession {
    fn from(session: stripe::CheckoutSession) -> Self {
        Self {
            id: session.id.to_string(),
            url: session.url,
            success_url: session.success_url,
            cancel_url: session.cancel_url,
        }
    }
}

#[derive(Clone)]
pub struct StripeClient {
    client: stripe::Client,
}

impl StripeClient {
    /// `api_base` is normally `https://api.stripe.com`; tests point it at a
    /// local mock.
    pub fn new(api_base: &str, secret_key: &str) -> Self {
        Self {
            client: stripe::Client::from_url(api_base, secret_key),
        }
    }
}

fn currency(code: &str) -> Result<Currency, PaymentsError> {
    code.to_lowercase()
        .parse()
        .map_err(|_| PaymentsError::InvalidCurrency(code.to_string()))
}

fn line_item(line: &PriceLine) -> Result<CreateCheckoutSessionLineItems, PaymentsError> {
    Ok(CreateCheckoutSessionLineItems {
        quantity: Some(u64::from(line.quantity)),
        price_data: Some(CreateCheckoutSessionLineItemsPriceData {
            currency: currency(&line.currency)?,
            product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                name: line.product_name.clone(),
                ..Default::default()
            }),
            unit_amount: Some(line.unit_amount),
            ..Default::default()
        }),
        ..Default::default()
    })
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<CheckoutSession, PaymentsError> {
        let line_items = params
            .line_items
            .iter()
            .map(line_item)
            .collect::<Result<Vec<_>, _>>()?;

        let mut create = CreateCheckoutSession::new();
        create.success_url = Some(params.success_url.as_str());
        create.cancel_url = Some(params.cancel_url.as_str());
        create.mode = Some(match params.mode {
            CheckoutMode::Payment => stripe::CheckoutSessionMode::Payment,
        });
        create.line_items = Some(line_items);
        create.payment_intent_data = Some(CreateCheckoutSessionPaymentIntentData {
            metadata: Some(HashMap::from([(
                ORDER_ID_METADATA_KEY.to_string(),
                params.order_id.clone(),
            )])),
            ..Default::default()
        });

        let session = stripe::CheckoutSession::create(&self.client, create)
            .await
            .map_err(|e| {
                let err = PaymentsError::from(e);
                tracing::warn!("Checkout session rejected: {}", err);
                err
            })?;

        tracing::debug!("Checkout session created: {}", session.id);

        Ok(session.into())
    }
}
