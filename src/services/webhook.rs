use crate::{
    models::{BusMessage, EventKind, PaymentSucceeded, ProviderEvent, PAYMENT_SUCCEEDED_SUBJECT},
    services::EventBus,
};
use std::sync::Arc;
use thiserror::Error;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Missing stripe-signature header")]
    MissingHeader,

    #[error("Payload is not valid UTF-8")]
    InvalidEncoding,

    #[error("{0}")]
    Rejected(#[from] stripe::WebhookError),

    #[error("Failed to encode bus message: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// What happened to a verified event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Emitted(PaymentSucceeded),
    /// `charge.succeeded` without an order id in its metadata.
    Uncorrelated { event_id: String },
    Ignored { event_type: String },
}

/// Verifies provider webhooks and republishes the ones we care about.
///
/// Redeliveries of the same event are emitted again; consumers must tolerate
/// duplicates.
pub struct WebhookDispatcher {
    signing_secret: String,
    bus: Arc<dyn EventBus>,
}

impl WebhookDispatcher {
    pub fn new(signing_secret: String, bus: Arc<dyn EventBus>) -> Self {
        Self {
            signing_secret,
            bus,
        }
    }

    pub fn dispatch(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let header = signature_header.ok_or(DispatchError::MissingHeader)?;
        let payload = std::str::from_utf8(payload).map_err(|_| DispatchError::InvalidEncoding)?;
        let event: ProviderEvent =
            stripe::Webhook::construct_event(payload, header, &self.signing_secret)?.into();

        let outcome = match event.kind {
            EventKind::ChargeSucceeded(charge) => match PaymentSucceeded::from_charge(&charge) {
                Some(payment) => {
                    tracing::info!(
                        event_id = %event.id,
                        stripe_payment_id = %payment.stripe_payment_id,
                        order_id = %payment.order_id,
                        receipt_url = ?payment.receipt_url,
                        "Payment succeeded"
                    );
                    let message = BusMessage::new(PAYMENT_SUCCEEDED_SUBJECT, &payment)?;
                    self.bus.emit(message);
                    DispatchOutcome::Emitted(payment)
                }
                None => {
                    tracing::warn!(
                        event_id = %event.id,
                        charge_id = %charge.id,
                        "Charge has no orderId metadata, not dispatching"
                    );
                    DispatchOutcome::Uncorrelated { event_id: event.id }
                }
            },
            EventKind::Unhandled { event_type } => {
                tracing::info!(event_id = %event.id, "Event {} not handled", event_type);
                DispatchOutcome::Ignored { event_type }
            }
        };

        Ok(outcome)
    }
}
