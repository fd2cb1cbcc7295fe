//! Read-through cache for computed dashboard snapshots.
//!
//! Entries are keyed by source identity, computed on first use and kept
//! until `invalidate` clears everything. There is no expiry. Failed
//! computations are not cached.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct SnapshotCache<T> {
    entries: Mutex<HashMap<String, Arc<T>>>,
}

impl<T> SnapshotCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key`, computing it if absent. The lock
    /// is held while computing so concurrent callers share one computation.
    pub async fn get_or_try_compute<F, Fut, E>(&self, key: &str, compute: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut entries = self.entries.lock().await;
        if let Some(hit) = entries.get(key) {
            return Ok(Arc::clone(hit));
        }
        let value = Arc::new(compute().await?);
        entries.insert(key.to_string(), Arc::clone(&value));
        Ok(value)
    }

    pub async fn get(&self, key: &str) -> Option<Arc<T>> {
        self.entries.lock().await.get(key).cloned()
    }

    pub async fn invalidate(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_computes_once_until_invalidated() {
        let cache: SnapshotCache<String> = SnapshotCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let v = cache
                .get_or_try_compute("k", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>("value".to_string())
                })
                .await
                .unwrap();
            assert_eq!(v.as_str(), "value");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.invalidate().await;
        assert_eq!(cache.len().await, 0);
        cache
            .get_or_try_compute("k", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ()>("again".to_string())
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: SnapshotCache<u32> = SnapshotCache::new();
        let err = cache
            .get_or_try_compute("k", || async { Err::<u32, _>("boom") })
            .await;
        assert_eq!(err, Err("boom"));
        assert!(cache.get("k").await.is_none());

        let ok = cache
            .get_or_try_compute("k", || async { Ok::<_, &str>(7) })
            .await
            .unwrap();
        assert_eq!(*ok, 7);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache: SnapshotCache<u32> = SnapshotCache::new();
        cache.get_or_try_compute("a", || async { Ok::<_, ()>(1) }).await.unwrap();
        cache.get_or_try_compute("b", || async { Ok::<_, ()>(2) }).await.unwrap();
        assert_eq!(cache.get("a").await.as_deref(), Some(&1));
        assert_eq!(cache.get("b").await.as_deref(), Some(&2));
        assert_eq!(cache.len().await, 2);
    }
}
