use crate::{
    models::{PaymentSessionRequest, SessionResult},
    services::webhook::SIGNATURE_HEADER,
};
use anyhow::{Context, Result};
use reqwest::StatusCode;
use ring::hmac;

/// Header value for `payload` as the provider would send it:
/// `t={timestamp},v1={hex HMAC-SHA256("{timestamp}." ++ payload)}`.
pub fn signature_header(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let mut ctx = hmac::Context::with_key(&key);
    ctx.update(format!("{}.", timestamp).as_bytes());
    ctx.update(payload);
    let tag = ctx.sign();
    format!("t={},v1={}", timestamp, hex::encode(tag.as_ref()))
}

/// HTTP client for a running payments-gateway instance.
pub struct PaymentsClient {
    base_url: String,
    client: reqwest::Client,
}

impl PaymentsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn create_payment_session(
        &self,
        request: &PaymentSessionRequest,
    ) -> Result<SessionResult> {
        let response = self
            .client
            .post(format!("{}/payments/create-payment-session", self.base_url))
            .json(request)
            .send()
            .await
            .context("Failed to reach payments-gateway")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Session creation failed ({}): {}", status, body);
        }

        response
            .json()
            .await
            .context("Invalid session response")
    }

    /// Signs `payload` the way the provider does and posts it to the webhook
    /// endpoint. Returns the status and body as received.
    pub async fn send_signed_webhook(
        &self,
        payload: &[u8],
        signing_secret: &str,
    ) -> Result<(StatusCode, String)> {
        let timestamp = chrono::Utc::now().timestamp();
        let header = signature_header(payload, signing_secret, timestamp);

        tracing::debug!("Posting webhook signed at {}", timestamp);

        let response = self
            .client
            .post(format!("{}/payments/webhook", self.base_url))
            .header(SIGNATURE_HEADER, header)
            .header("content-type", "application/json")
            .body(payload.to_vec())
            .send()
            .await
            .context("Failed to reach payments-gateway")?;

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}
