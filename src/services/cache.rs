use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use crate::models::{PairKey, StoredCompatibility};

const KEY_PREFIX: &str = "compat";

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Two-tier cache of stored pair results
///
/// L1 is a per-process moka cache holding decoded records; L2 is Redis,
/// shared between instances and holding JSON. Both tiers expire after the
/// same TTL.
pub struct ResultCache {
    redis: ConnectionManager,
    l1: moka::future::Cache<PairKey, Arc<StoredCompatibility>>,
    ttl_secs: u64,
}

impl ResultCache {
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        let l1 = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Ok(Self { redis, l1, ttl_secs })
    }

    /// Cached record for a pair, checking L1 before Redis
    pub async fn get_result(
        &self,
        key: &PairKey,
    ) -> Result<Option<StoredCompatibility>, CacheError> {
        if let Some(record) = self.l1.get(key).await {
            tracing::trace!("L1 hit: {}", key);
            return Ok(Some(record.as_ref().clone()));
        }

        let mut conn = self.redis.clone();
        let json: Option<String> = conn.get(redis_key(key)).await?;

        let Some(json) = json else {
            tracing::trace!("Cache miss: {}", key);
            return Ok(None);
        };

        tracing::trace!("L2 hit: {}", key);
        let record: StoredCompatibility = serde_json::from_str(&json)?;
        self.l1.insert(key.clone(), Arc::new(record.clone())).await;

        Ok(Some(record))
    }

    /// Write a record through both tiers, replacing any previous entry
    pub async fn put_result(&self, record: &StoredCompatibility) -> Result<(), CacheError> {
        let json = serde_json::to_string(record)?;

        self.l1
            .insert(record.pair_key.clone(), Arc::new(record.clone()))
            .await;

        let mut conn = self.redis.clone();
        let _: () = conn
            .set_ex(redis_key(&record.pair_key), json, self.ttl_secs)
            .await?;

        tracing::trace!("Cached {}", record.pair_key);
        Ok(())
    }

    /// Drop a pair from both tiers
    pub async fn evict(&self, key: &PairKey) -> Result<(), CacheError> {
        self.l1.invalidate(key).await;

        let mut conn = self.redis.clone();
        let _: () = conn.del(redis_key(key)).await?;
        Ok(())
    }
}

/// Redis key for a pair's result
pub fn redis_key(key: &PairKey) -> String {
    format!("{}:{}", KEY_PREFIX, key)
}
