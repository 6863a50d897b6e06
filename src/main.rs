use anyhow::Result;
use payments_gateway::{
    config::Config,
    handlers::{router, AppState},
    services::*,
};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Starting payments-gateway v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {:?}", config.environment);

    // Initialize services
    let provider: Arc<dyn PaymentProvider> = Arc::new(StripeClient::new(
        &config.stripe_api_base,
        &config.stripe_secret,
    ));

    let redis = RedisBus::new(&config.redis_url)?;
    if !redis.ping().await {
        tracing::warn!("Event bus not reachable yet, will keep retrying on publish");
    }
    let bus: Arc<dyn EventBus> = Arc::new(redis);

    let sessions = Arc::new(SessionService::new(
        provider,
        config.stripe_success_url.clone(),
        config.stripe_cancel_url.clone(),
    ));
    let webhooks = Arc::new(WebhookDispatcher::new(
        config.stripe_endpoint_secret.clone(),
        bus.clone(),
    ));

    let app = router(AppState {
        sessions,
        webhooks,
        bus,
        started_at: Instant::now(),
    });

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Webhook endpoint: http://{}/payments/webhook", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl+c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down gracefully...");
}
