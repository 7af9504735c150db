use crate::models::{CacheStats, RankQuery};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// In-process cache for ranked match lists
///
/// Values are stored JSON-encoded so any serde type can be cached behind a
/// single moka instance with one TTL.
pub struct MatchCache {
    entries: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl MatchCache {
    /// Create a new cache
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let entries = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { entries, ttl_secs }
    }

    /// Get a value from cache
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.entries.get(key).await {
            Some(bytes) => {
                tracing::trace!("Cache hit: {}", key);
                Ok(serde_json::from_slice(&bytes)?)
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Err(CacheError::CacheMiss(key.to_string()))
            }
        }
    }

    /// Set a value in cache
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.entries.insert(key.to_string(), bytes).await;
        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.entry_count(),
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Ranked investors for a startup
    pub fn startup_matches(startup_id: &str, query: &RankQuery) -> String {
        format!("matches:startup:{}:{}", startup_id, Self::query_suffix(query))
    }

    /// Ranked startups for an investor
    pub fn investor_matches(investor_id: &str, query: &RankQuery) -> String {
        format!("matches:investor:{}:{}", investor_id, Self::query_suffix(query))
    }

    fn query_suffix(query: &RankQuery) -> String {
        format!(
            "{}:{}:{}",
            query.limit,
            query.min_score.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
            query.good_fit_only
        )
    }
}
