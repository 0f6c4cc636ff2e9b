use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Book source results for a query at a given limit
    BookSearch { query: String, limit: usize },
    /// A user's preference profile
    Profile(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::BookSearch { query, limit } => {
                write!(f, "books:{}:{}", limit, query.trim().to_lowercase())
            }
            CacheKey::Profile(user_id) => write!(f, "profile:{}", user_id),
        }
    }
}

/// Creates a Redis client
///
/// Opening a client does not connect; connections are made per operation.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    /// Seconds until expiry; `None` keeps the value until overwritten
    ttl: Option<u64>,
}

/// Redis handle with a single background writer
///
/// Writes are queued and applied in the order they were sent, so the last
/// value sent for a key is the one that ends up stored.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    writer: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer to flush everything still queued and waits for it to stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
        if let Err(e) = self.writer.await {
            tracing::error!(error = %e, "Cache writer task ended abnormally");
        }
    }
}

impl Cache {
    /// Creates a new Cache and spawns its background writer task
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let writer = tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx, writer })
    }

    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");
        let mut failed_writes: u64 = 0;

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    let key = msg.key.clone();
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        failed_writes += 1;
                        tracing::error!(error = %e, key = %key, failed_writes, "Failed to write to Redis");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Cache writer shutting down, flushing remaining writes");

                    // Senders live in every Cache clone, so drain what is queued
                    // right now instead of waiting for the channel to close.
                    while let Ok(msg) = write_rx.try_recv() {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }

                    tracing::info!("Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        match msg.ttl {
            Some(ttl) => {
                let _: () = conn.set_ex(msg.key, msg.value, ttl).await?;
            }
            None => {
                let _: () = conn.set(msg.key, msg.value).await?;
            }
        }
        Ok(())
    }

    /// Retrieves and deserializes the value stored under `key`
    ///
    /// Returns `Ok(None)` when the key is absent. A value that no longer
    /// deserializes into `T` is reported as a serialization error.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        match cached {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Queues a write without waiting for Redis
    pub fn set_in_background<T: serde::Serialize>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Option<u64>,
    ) -> AppResult<()> {
        let json = serde_json::to_string(value)?;

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        self.write_tx
            .send(msg)
            .map_err(|e| AppError::Internal(format!("Cache writer unavailable: {}", e)))
    }
}
