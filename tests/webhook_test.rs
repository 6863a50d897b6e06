mod common;

use axum::{body::Body, http::Request};
use common::*;
use payments_gateway::client::payment::signature_header;
use serde_json::{json, Value};

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn charge_succeeded(metadata: Value) -> Vec<u8> {
    charge_event("charge.succeeded", metadata)
}

fn webhook_request(payload: &[u8], header: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/payments/webhook")
        .header("content-type", "application/json");
    if let Some(header) = header {
        builder = builder.header("stripe-signature", header);
    }
    builder.body(Body::from(payload.to_vec())).unwrap()
}

fn app() -> TestApp {
    TestApp::new("http://127.0.0.1:9")
}

#[tokio::test]
async fn charge_succeeded_emits_payment_succeeded() {
    let app = app();
    let payload = charge_succeeded(json!({
        "id": "pi_1",
        "orderId": "ord_1",
        "receipt_url": "https://x"
    }));
    let header = signature_header(&payload, SIGNING_SECRET, now());

    let (status, body) = app.send(webhook_request(&payload, Some(&header))).await;

    assert_eq!(status, 200);
    assert_eq!(
        serde_json::from_slice::<Value>(&body).unwrap(),
        json!({ "sig": header })
    );

    let messages = app.bus.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].pattern, "payment.succeeded");
    assert_eq!(
        messages[0].data,
        json!({
            "stripePaymentId": "pi_1",
            "orderId": "ord_1",
            "receipUrl": "https://x"
        })
    );
}

#[tokio::test]
async fn charge_fields_fill_in_missing_metadata() {
    let app = app();
    let payload = charge_succeeded(json!({ "orderId": "ord_7" }));
    let header = signature_header(&payload, SIGNING_SECRET, now());

    let (status, _) = app.send(webhook_request(&payload, Some(&header))).await;

    assert_eq!(status, 200);
    let messages = app.bus.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0].data,
        json!({
            "stripePaymentId": "pi_3Nabc",
            "orderId": "ord_7",
            "receipUrl": "https://pay.stripe.com/receipts/ch_3Nabc"
        })
    );
}

#[tokio::test]
async fn missing_signature_is_rejected() {
    let app = app();
    let payload = charge_succeeded(json!({ "orderId": "ord_1" }));

    let (status, body) = app.send(webhook_request(&payload, None)).await;

    assert_eq!(status, 400);
    assert!(String::from_utf8(body).unwrap().starts_with("Webhook Error: "));
    assert!(app.bus.messages().is_empty());
}

#[tokio::test]
async fn invalid_signature_is_rejected() {
    let app = app();
    let payload = charge_succeeded(json!({ "orderId": "ord_1" }));
    let header = signature_header(&payload, "whsec_wrong", now());

    let (status, body) = app.send(webhook_request(&payload, Some(&header))).await;

    assert_eq!(status, 400);
    assert!(String::from_utf8(body).unwrap().starts_with("Webhook Error: "));
    assert!(app.bus.messages().is_empty());
}

#[tokio::test]
async fn api_secret_does_not_verify_webhooks() {
    let app = app();
    let payload = charge_succeeded(json!({ "orderId": "ord_1" }));
    let header = signature_header(&payload, API_SECRET, now());

    let (status, _) = app.send(webhook_request(&payload, Some(&header))).await;

    assert_eq!(status, 400);
    assert!(app.bus.messages().is_empty());
}

#[tokio::test]
async fn stale_signature_is_rejected() {
    let app = app();
    let payload = charge_succeeded(json!({ "orderId": "ord_1" }));
    let header = signature_header(&payload, SIGNING_SECRET, now() - 600);

    let (status, body) = app.send(webhook_request(&payload, Some(&header))).await;

    assert_eq!(status, 400);
    assert!(String::from_utf8(body).unwrap().starts_with("Webhook Error: "));
    assert!(app.bus.messages().is_empty());
}

#[tokio::test]
async fn tampered_body_is_rejected() {
    let app = app();
    let payload = charge_succeeded(json!({ "orderId": "ord_1" }));
    let header = signature_header(&payload, SIGNING_SECRET, now());
    let tampered = charge_succeeded(json!({ "orderId": "ord_2" }));

    let (status, _) = app.send(webhook_request(&tampered, Some(&header))).await;

    assert_eq!(status, 400);
    assert!(app.bus.messages().is_empty());
}

#[tokio::test]
async fn other_event_types_are_acknowledged_without_emission() {
    let app = app();
    let payload = charge_event("charge.failed", json!({ "orderId": "ord_1" }));
    let header = signature_header(&payload, SIGNING_SECRET, now());

    let (status, body) = app.send(webhook_request(&payload, Some(&header))).await;

    assert_eq!(status, 200);
    assert_eq!(
        serde_json::from_slice::<Value>(&body).unwrap(),
        json!({ "sig": header })
    );
    assert!(app.bus.messages().is_empty());
}

#[tokio::test]
async fn future_signature_is_rejected() {
    let app = app();
    let payload = charge_succeeded(json!({ "orderId": "ord_1" }));
    let header = signature_header(&payload, SIGNING_SECRET, now() + 600);

    let (status, _) = app.send(webhook_request(&payload, Some(&header))).await;

    assert_eq!(status, 400);
    assert!(app.bus.messages().is_empty());
}

#[tokio::test]
async fn charge_without_order_id_is_acknowledged_only() {
    let app = app();
    let payload = charge_succeeded(json!({}));
    let header = signature_header(&payload, SIGNING_SECRET, now());

    let (status, _) = app.send(webhook_request(&payload, Some(&header))).await;

    assert_eq!(status, 200);
    assert!(app.bus.messages().is_empty());
}

#[tokio::test]
async fn redelivered_event_is_emitted_again() {
    let app = app();
    let payload = charge_succeeded(json!({ "orderId": "ord_1" }));
    let header = signature_header(&payload, SIGNING_SECRET, now());

    let (first, _) = app.send(webhook_request(&payload, Some(&header))).await;
    let (second, _) = app.send(webhook_request(&payload, Some(&header))).await;

    assert_eq!((first, second), (200, 200));
    assert_eq!(app.bus.messages().len(), 2);
}

#[tokio::test]
async fn health_reports_bus() {
    let app = app();

    let (status, body) = app
        .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, 200);
    let health: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["bus"], true);
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
}
