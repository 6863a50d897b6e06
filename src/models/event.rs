use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::session::ORDER_ID_METADATA_KEY;

pub const CHARGE_SUCCEEDED: &str = "charge.succeeded";

/// Bus subject for successful payments.
pub const PAYMENT_SUCCEEDED_SUBJECT: &str = "payment.succeeded";

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEvent {
    pub id: String,
    pub kind: EventKind,
}

/// The event types this service acts on. Everything else lands in `Unhandled`.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    ChargeSucceeded(Charge),
    Unhandled { event_type: String },
}

impl EventKind {
    pub fn event_type(&self) -> &str {
        match self {
            EventKind::ChargeSucceeded(_) => CHARGE_SUCCEEDED,
            EventKind::Unhandled { event_type } => event_type,
        }
    }
}

impl From<stripe::Event> for ProviderEvent {
    fn from(event: stripe::Event) -> Self {
        let kind = match (event.type_, event.data.object) {
            (stripe::EventType::ChargeSucceeded, stripe::EventObject::Charge(charge)) => {
                EventKind::ChargeSucceeded(charge.into())
            }
            (event_type, _) => EventKind::Unhandled {
                event_type: wire_name(&event_type),
            },
        };

        Self {
            id: event.id.to_string(),
            kind,
        }
    }
}

/// The string a provider enum is sent as, e.g. `charge.refunded`.
fn wire_name<T: Serialize + std::fmt::Debug>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => format!("{:?}", value),
    }
}

/// The charge fields the dispatcher reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Charge {
    pub id: String,
    pub metadata: HashMap<String, String>,
    pub receipt_url: Option<String>,
    pub payment_intent: Option<String>,
}

impl From<stripe::Charge> for Charge {
    fn from(charge: stripe::Charge) -> Self {
        let payment_intent = charge.payment_intent.as_ref().map(|pi| match pi {
            stripe::Expandable::Id(id) => id.to_string(),
            stripe::Expandable::Object(pi) => pi.id.to_string(),
        });

        Self {
            id: charge.id.to_string(),
            metadata: charge.metadata,
            receipt_url: charge.receipt_url,
            payment_intent,
        }
    }
}

impl Charge {
    pub fn order_id(&self) -> Option<&str> {
        self.metadata.get(ORDER_ID_METADATA_KEY).map(String::as_str)
    }

    /// Metadata `id`, then the payment intent, then the charge itself.
    pub fn payment_id(&self) -> &str {
        self.metadata
            .get("id")
            .or(self.payment_intent.as_ref())
            .unwrap_or(&self.id)
    }

    pub fn receipt_url(&self) -> Option<&str> {
        self.metadata
            .get("receipt_url")
            .or(self.receipt_url.as_ref())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSucceeded {
    pub stripe_payment_id: String,
    pub order_id: String,
    // Consumers on the bus read this exact key.
    #[serde(rename = "receipUrl")]
    pub receipt_url: Option<String>,
}

impl PaymentSucceeded {
    /// `None` when the charge carries no order id to correlate with.
    pub fn from_charge(charge: &Charge) -> Option<Self> {
        Some(Self {
            stripe_payment_id: charge.payment_id().to_string(),
            order_id: charge.order_id()?.to_string(),
            receipt_url: charge.receipt_url().map(str::to_string),
        })
    }
}

/// Envelope understood by the order service's microservice transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub pattern: String,
    pub data: serde_json::Value,
}

impl BusMessage {
    pub fn new<T: Serialize>(pattern: &str, data: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            pattern: pattern.to_string(),
            data: serde_json::to_value(data)?,
        })
    }
}
