use crate::models::BusMessage;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisResult};
use std::{sync::Arc, time::Duration};
use tokio::sync::OnceCell;

const PING_TIMEOUT: Duration = Duration::from_secs(1);

/// Publishing side of the internal event bus.
///
/// `emit` does not wait for delivery: a failed publish is logged and the
/// message is lost.
#[async_trait]
pub trait EventBus: Send + Sync {
    fn emit(&self, message: BusMessage);

    async fn ping(&self) -> bool;
}

/// Redis pub/sub transport; the channel is the message pattern.
///
/// The connection is opened on first use and retried on every later call
/// until it succeeds, so a Redis that comes up after the service does is
/// picked up without a restart.
#[derive(Clone)]
pub struct RedisBus {
    client: redis::Client,
    conn: Arc<OnceCell<ConnectionManager>>,
}

impl RedisBus {
    /// Fails only on a malformed URL; nothing is dialed here.
    pub fn new(redis_url: &str) -> RedisResult<Self> {
        Ok(Self {
            client: redis::Client::open(redis_url)?,
            conn: Arc::new(OnceCell::new()),
        })
    }

    async fn connection(&self) -> RedisResult<ConnectionManager> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                let conn = self.client.get_connection_manager().await?;
                tracing::info!("Event bus connected");
                Ok::<_, redis::RedisError>(conn)
            })
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl EventBus for RedisBus {
    fn emit(&self, message: BusMessage) {
        let serialized = match serde_json::to_string(&message) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::error!(pattern = %message.pattern, "Failed to serialize event: {}", e);
                return;
            }
        };

        let bus = self.clone();
        tokio::spawn(async move {
            let mut redis = match bus.connection().await {
                Ok(redis) => redis,
                Err(e) => {
                    tracing::warn!(
                        pattern = %message.pattern,
                        "Event bus unavailable, dropping event: {}",
                        e
                    );
                    return;
                }
            };

            match redis
                .publish::<_, _, i64>(&message.pattern, serialized)
                .await
            {
                Ok(receivers) => {
                    tracing::debug!(pattern = %message.pattern, receivers, "Event published")
                }
                Err(e) => tracing::error!(pattern = %message.pattern, "Event publish failed: {}", e),
            }
        });
    }

    async fn ping(&self) -> bool {
        let mut redis = match tokio::time::timeout(PING_TIMEOUT, self.connection()).await {
            Ok(Ok(redis)) => redis,
            Ok(Err(e)) => {
                tracing::debug!("Event bus ping failed: {}", e);
                return false;
            }
            Err(_) => return false,
        };

        redis::cmd("PING")
            .query_async::<_, String>(&mut redis)
            .await
            .is_ok()
    }
}
