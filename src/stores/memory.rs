use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::CacheError;
use crate::store::Store;
use crate::utils::resolve_range;

const TIER: &str = "memory";

/// The kinds of values a key can hold.
#[derive(Clone)]
enum Slot {
    Bytes(Vec<u8>),
    List(Vec<Vec<u8>>),
}

/// Internal stored entry with optional expiration time.
#[derive(Clone)]
struct StoredEntry {
    slot: Slot,
    expires: Option<Instant>,
}

impl StoredEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires.is_some_and(|at| at <= now)
    }
}

/// Thread-safe in-memory store using HashMap with RwLock.
///
/// Implements the whole store contract in process, which makes it the store
/// of choice for tests and single-process deployments. Expiry is measured on
/// the tokio clock and enforced lazily: an expired key is dropped the next
/// time it is touched.
///
/// Each primitive takes the write lock once, so primitives are atomic with
/// respect to each other.
pub struct HashMapStore {
    state: RwLock<HashMap<String, StoredEntry>>,
}

impl HashMapStore {
    /// Create a new, empty HashMapStore.
    pub fn new() -> Self {
        HashMapStore {
            state: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live keys, counting keys that expired but were not yet touched.
    pub async fn len(&self) -> usize {
        self.state.read().await.len()
    }

    /// Whether the store holds no keys at all.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.is_empty()
    }

    fn wrong_type(key: &str) -> CacheError {
        CacheError::unavailable(
            TIER,
            key,
            "WRONGTYPE Operation against a key holding the wrong kind of value",
        )
    }

    /// Remove `key` if it has expired, returning the live entry if any.
    fn live<'a>(
        state: &'a mut HashMap<String, StoredEntry>,
        key: &str,
    ) -> Option<&'a mut StoredEntry> {
        let now = Instant::now();
        if state.get(key).is_some_and(|e| e.is_expired(now)) {
            state.remove(key);
        }
        state.get_mut(key)
    }
}

impl Default for HashMapStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for HashMapStore {
    fn name(&self) -> &'static str {
        TIER
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let mut state = self.state.write().await;
        state.insert(
            key.to_string(),
            StoredEntry {
                slot: Slot::Bytes(value),
                expires: None,
            },
        );
        Ok(())
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut state = self.state.write().await;
        state.insert(
            key.to_string(),
            StoredEntry {
                slot: Slot::Bytes(value),
                expires: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        {
            let state = self.state.read().await;
            match state.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(Instant::now()) => {
                    return match &entry.slot {
                        Slot::Bytes(bytes) => Ok(Some(bytes.clone())),
                        Slot::List(_) => Err(Self::wrong_type(key)),
                    };
                }
                Some(_) => {}
            }
        }

        // Entry is expired, remove it unless it was rewritten meanwhile
        let mut state = self.state.write().await;
        match Self::live(&mut state, key) {
            None => Ok(None),
            Some(StoredEntry {
                slot: Slot::Bytes(bytes),
                ..
            }) => Ok(Some(bytes.clone())),
            Some(_) => Err(Self::wrong_type(key)),
        }
    }

    async fn incr(&self, key: &str) -> Result<i64, CacheError> {
        let mut state = self.state.write().await;

        let current = match Self::live(&mut state, key) {
            None => 0,
            Some(StoredEntry {
                slot: Slot::Bytes(bytes),
                ..
            }) => std::str::from_utf8(bytes.as_slice())
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| {
                    CacheError::unavailable(TIER, key, "value is not an integer or out of range")
                })?,
            Some(_) => return Err(Self::wrong_type(key)),
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| CacheError::unavailable(TIER, key, "increment would overflow"))?;

        // INCR keeps an existing expiry
        let expires = state.get(key).and_then(|e| e.expires);
        state.insert(
            key.to_string(),
            StoredEntry {
                slot: Slot::Bytes(next.to_string().into_bytes()),
                expires,
            },
        );
        Ok(next)
    }

    async fn rpush(&self, key: &str, item: Vec<u8>) -> Result<usize, CacheError> {
        let mut state = self.state.write().await;

        match Self::live(&mut state, key) {
            Some(StoredEntry {
                slot: Slot::List(items),
                ..
            }) => {
                items.push(item);
                Ok(items.len())
            }
            Some(_) => Err(Self::wrong_type(key)),
            None => {
                state.insert(
                    key.to_string(),
                    StoredEntry {
                        slot: Slot::List(vec![item]),
                        expires: None,
                    },
                );
                Ok(1)
            }
        }
    }

    async fn lrange(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<Vec<u8>>, CacheError> {
        let mut state = self.state.write().await;

        match Self::live(&mut state, key) {
            None => Ok(Vec::new()),
            Some(StoredEntry {
                slot: Slot::List(items),
                ..
            }) => Ok(match resolve_range(items.len(), start, stop) {
                Some((from, to)) => items[from..=to].to_vec(),
                None => Vec::new(),
            }),
            Some(_) => Err(Self::wrong_type(key)),
        }
    }

    async fn flush_all(&self) -> Result<(), CacheError> {
        self.state.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_set() {
        let store = HashMapStore::new();

        // Initially empty
        assert!(store.get("key1").await.unwrap().is_none());

        store.set("key1", b"value1".to_vec()).await.unwrap();
        assert_eq!(store.get("key1").await.unwrap(), Some(b"value1".to_vec()));

        // Empty value is present, not absent
        store.set("empty", Vec::new()).await.unwrap();
        assert_eq!(store.get("empty").await.unwrap(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_incr_starts_from_zero() {
        let store = HashMapStore::new();

        assert_eq!(store.incr("counter").await.unwrap(), 1);
        assert_eq!(store.incr("counter").await.unwrap(), 2);
        assert_eq!(store.get("counter").await.unwrap(), Some(b"2".to_vec()));
    }

    #[tokio::test]
    async fn test_incr_rejects_non_integer() {
        let store = HashMapStore::new();
        store.set("text", b"abc".to_vec()).await.unwrap();

        let err = store.incr("text").await.unwrap_err();
        assert!(matches!(err, CacheError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = HashMapStore::new();

        assert_eq!(store.rpush("list", b"a".to_vec()).await.unwrap(), 1);
        assert_eq!(store.rpush("list", b"b".to_vec()).await.unwrap(), 2);
        assert_eq!(store.rpush("list", b"c".to_vec()).await.unwrap(), 3);

        let all = store.lrange("list", 0, -1).await.unwrap();
        assert_eq!(all, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);

        let tail = store.lrange("list", -2, -1).await.unwrap();
        assert_eq!(tail, vec![b"b".to_vec(), b"c".to_vec()]);

        assert!(store.lrange("missing", 0, -1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_type() {
        let store = HashMapStore::new();
        store.rpush("list", b"a".to_vec()).await.unwrap();
        store.set("string", b"a".to_vec()).await.unwrap();

        assert!(store.get("list").await.is_err());
        assert!(store.incr("list").await.is_err());
        assert!(store.rpush("string", b"b".to_vec()).await.is_err());
        assert!(store.lrange("string", 0, -1).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_is_lazy() {
        let store = HashMapStore::new();
        store
            .set_with_expiry("page", b"body".to_vec(), Duration::from_secs(10))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(store.get("page").await.unwrap(), Some(b"body".to_vec()));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(store.len().await, 1);
        assert!(store.get("page").await.unwrap().is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_clears_expiry() {
        let store = HashMapStore::new();
        store
            .set_with_expiry("key", b"short".to_vec(), Duration::from_secs(1))
            .await
            .unwrap();
        store.set("key", b"forever".to_vec()).await.unwrap();

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(store.get("key").await.unwrap(), Some(b"forever".to_vec()));
    }

    #[tokio::test]
    async fn test_flush_all() {
        let store = HashMapStore::new();
        store.set("a", b"1".to_vec()).await.unwrap();
        store.incr("b").await.unwrap();
        store.rpush("c", b"x".to_vec()).await.unwrap();

        store.flush_all().await.unwrap();

        assert!(store.is_empty().await);
        assert!(store.get("a").await.unwrap().is_none());
    }
}
