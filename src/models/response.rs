use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub bus: bool,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

/// Body for the checkout redirect landing pages.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct RedirectMessage {
    pub ok: bool,
    pub message: String,
}

/// Acknowledgement returned to the provider for every verified webhook.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct WebhookAck {
    pub sig: String,
}
