//! Persistent TTL cache for the read-heavy public catalog
//!
//! Tour and blog listings are rendered far more often than they change, so
//! the default listing responses are kept in a small disk-backed cache and
//! dropped whenever an admin write lands. Entries carry their own expiry;
//! an expired entry reads as a miss and is removed on the way out.

use std::fmt::Debug;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use fjall::Keyspace;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::task;

/// Cache key for the unfiltered published-tour listing
pub const TOURS_KEY: &str = "catalog:tours";
/// Cache key for the published blog listing
pub const POSTS_KEY: &str = "catalog:posts";

#[derive(Serialize, Deserialize)]
struct StoredEntry<T> {
    value: T,
    expires_at: u64, // Unix timestamp (seconds)
}

/// Disk-backed TTL cache; cheap to clone, shared across handlers
#[derive(Clone)]
pub struct CatalogCache {
    store: Keyspace,
    default_ttl: Duration,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

impl CatalogCache {
    /// Open (or create) the cache at `path` with the given entry lifetime
    pub fn open(path: impl AsRef<Path>, default_ttl: Duration) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        let store = db.keyspace("catalog", fjall::KeyspaceCreateOptions::default)?;
        Ok(Self { store, default_ttl })
    }

    /// Store a serializable value under the default TTL
    #[tracing::instrument(name = "cache_put", level = "debug", skip(self, value))]
    pub async fn put<T: Serialize + Send + Debug + 'static>(
        &self,
        key: &str,
        value: T,
    ) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let expires_at = SystemTime::now()
            .checked_add(self.default_ttl)
            .ok_or(anyhow!("TTL overflow"))?
            .duration_since(UNIX_EPOCH)?
            .as_secs();
        let entry = StoredEntry { value, expires_at };
        let bytes = postcard::to_stdvec(&entry)?;

        task::spawn_blocking(move || store.insert(key, bytes)).await??;
        Ok(())
    }

    /// Retrieve a value if present and fresh; expired entries are removed
    /// and read as a miss
    #[tracing::instrument(name = "cache_get", level = "debug", skip(self))]
    pub async fn get<T: DeserializeOwned + Send + 'static>(&self, key: &str) -> Result<Option<T>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes: Option<Vec<u8>> =
            task::spawn_blocking(move || get_from_store(store, key_bytes)).await??;

        let Some(bytes) = maybe_bytes else {
            tracing::debug!("cache miss");
            return Ok(None);
        };

        let entry: StoredEntry<T> = postcard::from_bytes(&bytes)?;
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        if now < entry.expires_at {
            tracing::debug!("cache hit");
            Ok(Some(entry.value))
        } else {
            tracing::debug!("cache entry expired");
            self.remove(key).await?;
            Ok(None)
        }
    }

    /// Drop a single key
    pub async fn remove(&self, key: &str) -> Result<()> {
        let key = key.as_bytes().to_vec();
        let store = self.store.clone();
        task::spawn_blocking(move || store.remove(key)).await??;
        Ok(())
    }

    /// Drop every cached catalog listing. Called after admin writes so the
    /// public site never serves stale content for longer than one request.
    pub async fn invalidate_catalog(&self) -> Result<()> {
        self.remove(TOURS_KEY).await?;
        self.remove(POSTS_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cache(ttl: Duration) -> (tempfile::TempDir, CatalogCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = CatalogCache::open(dir.path().join("cache"), ttl).unwrap();
        (dir, cache)
    }

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let (_dir, cache) = temp_cache(Duration::from_secs(60));
        cache.put(TOURS_KEY, vec!["annapurna".to_string()]).await.unwrap();

        let hit: Option<Vec<String>> = cache.get(TOURS_KEY).await.unwrap();
        assert_eq!(hit, Some(vec!["annapurna".to_string()]));
    }

    #[tokio::test]
    async fn test_miss_on_unknown_key() {
        let (_dir, cache) = temp_cache(Duration::from_secs(60));
        let miss: Option<String> = cache.get("nothing-here").await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_entry_reads_as_miss() {
        let (_dir, cache) = temp_cache(Duration::from_secs(0));
        cache.put(POSTS_KEY, "stale".to_string()).await.unwrap();

        let miss: Option<String> = cache.get(POSTS_KEY).await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_catalog_drops_listings() {
        let (_dir, cache) = temp_cache(Duration::from_secs(60));
        cache.put(TOURS_KEY, "tours".to_string()).await.unwrap();
        cache.put(POSTS_KEY, "posts".to_string()).await.unwrap();

        cache.invalidate_catalog().await.unwrap();

        let tours: Option<String> = cache.get(TOURS_KEY).await.unwrap();
        let posts: Option<String> = cache.get(POSTS_KEY).await.unwrap();
        assert!(tours.is_none());
        assert!(posts.is_none());
    }
}
