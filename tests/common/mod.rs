#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use payments_gateway::{
    handlers::{router, AppState},
    models::BusMessage,
    services::{EventBus, PaymentProvider, SessionService, StripeClient, WebhookDispatcher},
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tower::ServiceExt;

pub const API_SECRET: &str = "sk_test_123";
pub const SIGNING_SECRET: &str = "whsec_test123secret456";
pub const SUCCESS_URL: &str = "http://localhost:3003/payments/success";
pub const CANCEL_URL: &str = "http://localhost:3003/payments/cancel";

const CHARGE_SUCCEEDED: &str = include_str!("../fixtures/charge_succeeded.json");

/// A provider event wrapping the fixture charge, with the given type and
/// charge metadata.
pub fn charge_event(event_type: &str, metadata: Value) -> Vec<u8> {
    let mut event: Value = serde_json::from_str(CHARGE_SUCCEEDED).unwrap();
    event["type"] = Value::from(event_type);
    event["data"]["object"]["metadata"] = metadata;
    serde_json::to_vec(&event).unwrap()
}

/// Bus double that keeps every emitted message.
#[derive(Default)]
pub struct RecordingBus {
    messages: Mutex<Vec<BusMessage>>,
}

impl RecordingBus {
    pub fn messages(&self) -> Vec<BusMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventBus for RecordingBus {
    fn emit(&self, message: BusMessage) {
        self.messages.lock().unwrap().push(message);
    }

    async fn ping(&self) -> bool {
        true
    }
}

pub struct TestApp {
    pub router: Router,
    pub bus: Arc<RecordingBus>,
}

impl TestApp {
    pub fn new(provider_base: &str) -> Self {
        let bus = Arc::new(RecordingBus::default());
        let provider: Arc<dyn PaymentProvider> =
            Arc::new(StripeClient::new(provider_base, API_SECRET));

        let state = AppState {
            sessions: Arc::new(SessionService::new(
                provider,
                SUCCESS_URL.to_string(),
                CANCEL_URL.to_string(),
            )),
            webhooks: Arc::new(WebhookDispatcher::new(
                SIGNING_SECRET.to_string(),
                bus.clone(),
            )),
            bus: bus.clone(),
            started_at: Instant::now(),
        };

        Self {
            router: router(state),
            bus,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (u16, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }
}
