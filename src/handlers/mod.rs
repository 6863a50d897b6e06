pub mod health;
pub mod payments;
pub mod webhook;

pub use health::*;
pub use payments::*;
pub use webhook::*;

use crate::services::{EventBus, SessionService, WebhookDispatcher};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionService>,
    pub webhooks: Arc<WebhookDispatcher>,
    pub bus: Arc<dyn EventBus>,
    pub started_at: Instant,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/payments/create-payment-session",
            post(create_payment_session),
        )
        .route("/payments/success", get(payment_success))
        .route("/payments/cancel", get(payment_cancelled))
        .route("/payments/webhook", post(stripe_webhook))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
}
