//! Key-value cache backend for user snapshots.
//!
//! Two modes, chosen at startup:
//!
//! - **Local**: single-instance mode backed by an in-process `moka` cache
//! - **Redis**: multi-instance mode with per-entry TTL in Redis
//!
//! Values are opaque serialized bytes; the accessor layer decides the
//! snapshot format. Cache failures are never surfaced to callers: a Redis
//! error on read degrades to a miss, and an error on write is logged and
//! dropped, because the relational store stays the system of record.

use std::sync::Arc;
use std::time::Duration;

use deadpool_redis::Pool;
use moka::future::Cache;
use redis::AsyncCommands;

/// Maximum number of entries held by the local tier.
const LOCAL_CAPACITY: u64 = 10_000;

/// Cache backend for serialized snapshots.
#[derive(Clone)]
pub enum CacheBackend {
    /// Single-instance: in-process cache with a uniform TTL.
    Local(Cache<String, Arc<Vec<u8>>>),

    /// Multi-instance: shared Redis cache with per-entry TTL.
    Redis {
        pool: Pool,
        ttl: Duration,
    },
}

impl CacheBackend {
    /// Create a local-only cache backend with the given entry TTL.
    #[must_use]
    pub fn new_local(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(LOCAL_CAPACITY)
            .time_to_live(ttl)
            .build();
        Self::Local(cache)
    }

    /// Create a Redis-backed cache backend with the given entry TTL.
    #[must_use]
    pub const fn new_redis(pool: Pool, ttl: Duration) -> Self {
        Self::Redis { pool, ttl }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` on a miss, an expired entry, or any Redis error
    /// (logged at `warn`).
    pub async fn get(&self, key: &str) -> Option<Arc<Vec<u8>>> {
        match self {
            Self::Local(cache) => cache.get(key).await,
            Self::Redis { pool, .. } => {
                let mut conn = match pool.get().await {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to get Redis connection");
                        return None;
                    }
                };
                match conn.get::<_, Option<Vec<u8>>>(key).await {
                    Ok(value) => value.map(Arc::new),
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Redis GET error");
                        None
                    }
                }
            }
        }
    }

    /// Store a value under `key` with the backend's configured TTL.
    ///
    /// Best-effort: a Redis write failure is logged and dropped.
    pub async fn set(&self, key: &str, value: Vec<u8>) {
        match self {
            Self::Local(cache) => {
                cache.insert(key.to_owned(), Arc::new(value)).await;
            }
            Self::Redis { pool, ttl } => {
                let mut conn = match pool.get().await {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to get Redis connection");
                        return;
                    }
                };
                if let Err(e) = conn
                    .set_ex::<_, _, ()>(key, value, ttl.as_secs())
                    .await
                {
                    tracing::warn!(key = %key, error = %e, "Redis SET error");
                } else {
                    tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "cache set");
                }
            }
        }
    }
}
