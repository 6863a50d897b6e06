use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum PaymentsError {
    #[error("Payment provider rejected request: {message}")]
    Provider {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Payment provider unreachable: {0}")]
    Upstream(String),

    #[error("Unsupported currency: {0}")]
    InvalidCurrency(String),
}

impl From<stripe::StripeError> for PaymentsError {
    fn from(err: stripe::StripeError) -> Self {
        match err {
            stripe::StripeError::Stripe(request) => PaymentsError::Provider {
                status: request.http_status,
                code: request
                    .code
                    .map(|code| code.to_string())
                    .or_else(|| Some(request.error_type.to_string())),
                message: request
                    .message
                    .unwrap_or_else(|| format!("request failed with {}", request.http_status)),
            },
            other => PaymentsError::Upstream(other.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub timestamp: chrono::DateTime<Utc>,
    pub request_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_code: Option<String>,
}

impl PaymentsError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            PaymentsError::Provider { status, .. } => match StatusCode::from_u16(*status) {
                Ok(status) if status.is_client_error() => (status, "PROVIDER_REJECTED"),
                _ => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            },
            PaymentsError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            PaymentsError::InvalidCurrency(_) => (StatusCode::BAD_REQUEST, "INVALID_CURRENCY"),
        }
    }
}

impl IntoResponse for PaymentsError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status, error_code) = self.status_and_code();

        let provider_code = match &self {
            PaymentsError::Provider { code, .. } => code.clone(),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            error_code: error_code.to_string(),
            timestamp: Utc::now(),
            request_id,
            provider_code,
        };

        tracing::error!(
            error = ?self,
            error_code = error_code,
            "Request failed"
        );

        (status, Json(body)).into_response()
    }
}
