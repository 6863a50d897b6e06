use crate::{
    handlers::AppState,
    models::WebhookAck,
    services::webhook::SIGNATURE_HEADER,
};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// POST /payments/webhook
///
/// Takes the body as raw bytes; the signature covers the exact payload.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok());

    match state.webhooks.dispatch(&body, signature) {
        Ok(outcome) => {
            tracing::debug!(?outcome, "Webhook processed");
            let ack = WebhookAck {
                sig: signature.unwrap_or_default().to_string(),
            };
            (StatusCode::OK, Json(ack)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Webhook rejected");
            (StatusCode::BAD_REQUEST, format!("Webhook Error: {}", e)).into_response()
        }
    }
}
