use serde::{Deserialize, Serialize};

/// Metadata key carrying the order id on the payment intent. Charges inherit
/// it, which is how webhook events find their way back to the order.
pub const ORDER_ID_METADATA_KEY: &str = "orderId";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionRequest {
    pub currency: String,
    pub order_id: String,
    pub items: Vec<LineItem>,
}

/// URLs issued by the provider for a created checkout session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub url: Option<String>,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutMode {
    Payment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLine {
    pub currency: String,
    pub product_name: String,
    pub unit_amount: i64,
    pub quantity: u32,
}

/// A checkout-session creation request in provider terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionParams {
    pub line_items: Vec<PriceLine>,
    pub mode: CheckoutMode,
    pub success_url: String,
    pub cancel_url: String,
    pub order_id: String,
}

/// Converts a major-unit price to the provider's integer minor units.
pub fn to_minor_units(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minor_units_round_to_nearest() {
        assert_eq!(to_minor_units(10.5), 1050);
        assert_eq!(to_minor_units(0.0), 0);
        assert_eq!(to_minor_units(19.99), 1999);
        assert_eq!(to_minor_units(0.125), 13);
        assert_eq!(to_minor_units(1.004), 100);
    }

    #[test]
    fn request_uses_camel_case() {
        let request: PaymentSessionRequest = serde_json::from_str(
            r#"{"currency":"usd","orderId":"ord_1","items":[{"name":"A","price":10.5,"quantity":2}]}"#,
        )
        .unwrap();
        assert_eq!(request.order_id, "ord_1");
        assert_eq!(request.items[0].quantity, 2);
    }
}
