use crate::{
    error::PaymentsError,
    handlers::AppState,
    models::{PaymentSessionRequest, RedirectMessage, SessionResult},
};
use axum::{extract::State, Json};

pub async fn create_payment_session(
    State(state): State<AppState>,
    Json(request): Json<PaymentSessionRequest>,
) -> Result<Json<SessionResult>, PaymentsError> {
    let result = state.sessions.create_payment_session(&request).await?;
    Ok(Json(result))
}

pub async fn payment_success() -> Json<RedirectMessage> {
    Json(RedirectMessage {
        ok: true,
        message: "Payment successful".to_string(),
    })
}

pub async fn payment_cancelled() -> Json<RedirectMessage> {
    Json(RedirectMessage {
        ok: false,
        message: "Payment cancelled".to_string(),
    })
}
