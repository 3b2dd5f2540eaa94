//! Read-through cache for computed portfolio views.
//!
//! Views are keyed by operation, owner, and extra parameters. Values are
//! stored as serialized JSON in an in-process LRU tier with a TTL, and
//! optionally in Redis. Redis failures degrade to a miss.
//!
//! ## Configuration
//!
//! - `VIEW_CACHE_CAPACITY`: local entries (default: 512)
//! - `VIEW_CACHE_TTL_SECS`: entry lifetime in both tiers (default: 300)
//! - `REDIS_ENABLED`: enable the Redis tier (default: false)
//! - `REDIS_URL`: Redis connection URL (default: redis://localhost:6379)

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use folio_core::defaults::VIEW_CACHE_PREFIX;

use crate::config::ServerConfig;

struct CachedView {
    json: String,
    expires_at: Instant,
}

/// View cache with a local LRU tier and an optional Redis tier.
#[derive(Clone)]
pub struct ViewCache {
    inner: Arc<ViewCacheInner>,
}

struct ViewCacheInner {
    local: Mutex<LruCache<String, CachedView>>,
    redis: RwLock<Option<ConnectionManager>>,
    ttl: Duration,
    prefix: String,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl ViewCache {
    /// Local-only cache.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(ViewCacheInner {
                local: Mutex::new(LruCache::new(capacity)),
                redis: RwLock::new(None),
                ttl,
                prefix: VIEW_CACHE_PREFIX.to_string(),
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
            }),
        }
    }

    /// Cache configured from server settings, connecting to Redis if enabled.
    pub async fn from_config(config: &ServerConfig) -> Self {
        let cache = Self::new(
            config.view_cache_capacity,
            Duration::from_secs(config.view_cache_ttl_secs),
        );
        if !config.redis_enabled {
            info!(
                subsystem = "api",
                component = "view_cache",
                capacity = config.view_cache_capacity,
                ttl_secs = config.view_cache_ttl_secs,
                "View cache enabled (local only)"
            );
            return cache;
        }

        let connection = match redis::Client::open(config.redis_url.as_str()) {
            Ok(client) => match ConnectionManager::new(client).await {
                Ok(conn) => {
                    info!(
                        subsystem = "api",
                        component = "view_cache",
                        ttl_secs = config.view_cache_ttl_secs,
                        "View cache Redis tier connected"
                    );
                    Some(conn)
                }
                Err(e) => {
                    warn!("Failed to connect to Redis, using local view cache only: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Invalid Redis URL, using local view cache only: {}", e);
                None
            }
        };
        *cache.inner.redis.write().await = connection;
        cache
    }

    /// Key for `operation` over `owner_id` with extra parameters.
    ///
    /// Parameters are hashed so arbitrary user input (search terms) stays
    /// out of the key space.
    pub fn cache_key(&self, operation: &str, owner_id: i64, params: &[(&str, String)]) -> String {
        if params.is_empty() {
            return format!("{}{}:{}", self.inner.prefix, operation, owner_id);
        }
        let mut hasher = Sha256::new();
        for (name, value) in params {
            hasher.update(name.as_bytes());
            hasher.update(b"=");
            hasher.update(value.as_bytes());
            hasher.update(b";");
        }
        let hash = hex::encode(hasher.finalize());
        format!(
            "{}{}:{}:{}",
            self.inner.prefix,
            operation,
            owner_id,
            &hash[..16]
        )
    }

    /// Cached value for `key`, or `None` on a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = match self.get_local(key).await {
            Some(json) => Some(json),
            None => self.get_remote(key).await,
        };
        let Some(json) = json else {
            self.inner.misses.fetch_add(1, Ordering::Relaxed);
            debug!(subsystem = "api", component = "view_cache", cache_key = key, "Cache MISS");
            return None;
        };

        match serde_json::from_str(&json) {
            Ok(value) => {
                self.inner.hits.fetch_add(1, Ordering::Relaxed);
                debug!(subsystem = "api", component = "view_cache", cache_key = key, "Cache HIT");
                Some(value)
            }
            Err(e) => {
                warn!(
                    subsystem = "api",
                    component = "view_cache",
                    cache_key = key,
                    error = %e,
                    "Cached view failed to deserialize"
                );
                self.inner.local.lock().await.pop(key);
                self.inner.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store `value` under `key` in every available tier.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("View cache serialization error: {}", e);
                return;
            }
        };

        self.inner.local.lock().await.put(
            key.to_string(),
            CachedView {
                json: json.clone(),
                expires_at: Instant::now() + self.inner.ttl,
            },
        );

        let mut guard = self.inner.redis.write().await;
        if let Some(conn) = guard.as_mut() {
            if let Err(e) = conn
                .set_ex::<_, _, ()>(key, json, self.inner.ttl.as_secs().max(1))
                .await
            {
                warn!(
                    subsystem = "api",
                    component = "view_cache",
                    cache_key = key,
                    error = %e,
                    "Redis SET failed"
                );
            }
        }
    }

    /// Return the cached view for `key` or compute and store it.
    ///
    /// Errors from `compute` are returned and never cached.
    pub async fn get_or_compute<T, F, Fut>(&self, key: &str, compute: F) -> folio_core::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = folio_core::Result<T>>,
    {
        if let Some(hit) = self.get(key).await {
            return Ok(hit);
        }
        let value = compute().await?;
        self.set(key, &value).await;
        Ok(value)
    }

    /// Empty the local tier.
    pub async fn clear(&self) {
        let mut local = self.inner.local.lock().await;
        let removed = local.len();
        local.clear();
        info!(
            subsystem = "api",
            component = "view_cache",
            removed,
            "View cache cleared"
        );
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
            entries: self.inner.local.lock().await.len(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    async fn get_local(&self, key: &str) -> Option<String> {
        let mut local = self.inner.local.lock().await;
        let expired = match local.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => return Some(entry.json.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            local.pop(key);
        }
        None
    }

    async fn get_remote(&self, key: &str) -> Option<String> {
        let mut guard = self.inner.redis.write().await;
        let conn = guard.as_mut()?;
        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(json)) => {
                self.inner.local.lock().await.put(
                    key.to_string(),
                    CachedView {
                        json: json.clone(),
                        expires_at: Instant::now() + self.inner.ttl,
                    },
                );
                Some(json)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(
                    subsystem = "api",
                    component = "view_cache",
                    cache_key = key,
                    error = %e,
                    "Redis GET failed, treating as miss"
                );
                None
            }
        }
    }
}
