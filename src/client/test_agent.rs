use anyhow::Result;
use payments_gateway::{
    client::payment::PaymentsClient,
    models::{LineItem, PaymentSessionRequest},
};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // Load configuration
    dotenvy::dotenv().ok();

    let base_url = std::env::var("PAYMENTS_GATEWAY_URL")
        .unwrap_or_else(|_| "http://localhost:3003".to_string());
    let signing_secret = std::env::var("STRIPE_ENDPOINT_SECRET")?;
    let order_id = std::env::var("TEST_ORDER_ID")
        .unwrap_or_else(|_| format!("ord_{}", uuid::Uuid::new_v4().simple()));

    println!("Payments Gateway Test Agent");
    println!("===========================");
    println!("Server: {}", base_url);
    println!("Order:  {}", order_id);
    println!();

    let client = PaymentsClient::new(&base_url);

    println!("Step 1: Creating checkout session...");
    let request = PaymentSessionRequest {
        currency: "usd".to_string(),
        order_id: order_id.clone(),
        items: vec![
            LineItem {
                name: "Test keyboard".to_string(),
                price: 49.99,
                quantity: 1,
            },
            LineItem {
                name: "Test mouse".to_string(),
                price: 10.5,
                quantity: 2,
            },
        ],
    };

    match client.create_payment_session(&request).await {
        Ok(session) => {
            println!("   [OK] Checkout URL: {}", session.url.unwrap_or_default());
            println!("   Success URL: {}", session.success_url.unwrap_or_default());
            println!("   Cancel URL:  {}", session.cancel_url.unwrap_or_default());
        }
        Err(e) => println!("   [FAILED] {}", e),
    }
    println!();

    println!("Step 2: Sending signed charge.succeeded webhook...");
    let charge_id = format!("ch_test_{}", uuid::Uuid::new_v4().simple());
    let now = chrono::Utc::now().timestamp();
    let event = json!({
        "id": format!("evt_test_{}", uuid::Uuid::new_v4().simple()),
        "object": "event",
        "created": now,
        "livemode": false,
        "pending_webhooks": 1,
        "request": { "id": null, "idempotency_key": null },
        "type": "charge.succeeded",
        "data": {
            "object": {
                "id": charge_id,
                "object": "charge",
                "amount": 2100,
                "amount_captured": 2100,
                "amount_refunded": 0,
                "billing_details": { "address": null, "email": null, "name": null, "phone": null },
                "captured": true,
                "created": now,
                "currency": "usd",
                "disputed": false,
                "livemode": false,
                "metadata": { "orderId": order_id },
                "paid": true,
                "refunded": false,
                "status": "succeeded",
                "receipt_url": format!("https://pay.stripe.com/receipts/{}", charge_id),
            }
        }
    });
    let payload = serde_json::to_vec(&event)?;

    let (status, body) = client.send_signed_webhook(&payload, &signing_secret).await?;
    println!("   Response: {} {}", status, body);

    println!();
    println!("Step 3: Sending webhook with a bad signature (expecting 400)...");
    let (status, body) = client
        .send_signed_webhook(&payload, "whsec_not_the_secret")
        .await?;
    println!("   Response: {} {}", status, body);

    Ok(())
}
