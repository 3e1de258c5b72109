use async_trait::async_trait;
use std::sync::Arc;

use crate::convert::{Convert, Float, Integer, Raw, Utf8};
use crate::error::CacheError;
use crate::instrument::{Counted, Operation, Recorded, with_counting, with_history};
use crate::replay::{Replay, replay};
use crate::store::Store;
use crate::utils::generate_key;
use crate::value::Value;

/// Operation name `store` is counted and recorded under by default.
pub const DEFAULT_STORE_OPERATION: &str = "Cache.store";

/// Configuration for [`Cache`].
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Name the store operation is counted and recorded under.
    ///
    /// The counter lives at `{operation_name}` and the history at
    /// `{operation_name}:inputs` / `{operation_name}:outputs`.
    pub operation_name: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            operation_name: DEFAULT_STORE_OPERATION.to_string(),
        }
    }
}

/// The uninstrumented write: persist a value under a fresh key.
pub struct StoreValue {
    store: Arc<dyn Store>,
}

impl StoreValue {
    pub fn new(store: Arc<dyn Store>) -> Self {
        StoreValue { store }
    }
}

#[async_trait]
impl Operation for StoreValue {
    type Input = Value;
    type Output = String;

    async fn call(&self, value: Value) -> Result<String, CacheError> {
        let key = generate_key();
        self.store.set(&key, value.to_bytes()).await?;
        Ok(key)
    }
}

/// Instrumented key-value cache.
///
/// Values are stored under freshly generated keys. Every `store` call is
/// counted and recorded so it can later be replayed.
///
/// # Example
/// ```ignore
/// let store: Arc<dyn Store> = Arc::new(RedisStore::new(RedisStoreConfig::from_env()).await?);
/// let cache = Cache::new(store, CacheConfig::default()).await?;
///
/// let key = cache.store("foo").await?;
/// assert_eq!(cache.get_str(&key).await?, Some("foo".to_string()));
/// println!("{}", cache.replay().await?);
/// ```
pub struct Cache {
    store: Arc<dyn Store>,
    operation_name: String,
    store_op: Recorded<Counted<StoreValue>>,
}

impl Cache {
    /// Connect the cache to `store` and flush it.
    ///
    /// Flushing destroys every value, counter and history list previously
    /// held by the store, so each cache starts from a clean namespace.
    pub async fn new(store: Arc<dyn Store>, config: CacheConfig) -> Result<Self, CacheError> {
        store.flush_all().await?;
        tracing::debug!(tier = store.name(), "flushed store for new cache");

        let name = config.operation_name;
        let store_op = with_history(
            with_counting(StoreValue::new(store.clone()), store.clone(), name.clone()),
            store.clone(),
            name.clone(),
        );

        Ok(Cache {
            store,
            operation_name: name,
            store_op,
        })
    }

    /// Name the store operation is counted and recorded under.
    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    /// Store `value` under a freshly generated key and return the key.
    ///
    /// The input is recorded first, then the counter is incremented, then
    /// the value is written and finally the key is recorded as the output.
    /// A failure past the input record leaves that input without an output.
    pub async fn store(&self, value: impl Into<Value>) -> Result<String, CacheError> {
        let key = self.store_op.call(value.into()).await?;
        tracing::debug!(operation = %self.operation_name, key = %key, "stored value");
        Ok(key)
    }

    /// Return the value stored at `key`, converted with `converter`.
    ///
    /// Returns `None` when the key does not exist.
    pub async fn get<C: Convert>(
        &self,
        key: &str,
        converter: C,
    ) -> Result<Option<C::Output>, CacheError> {
        let Some(raw) = self.store.get(key).await? else {
            tracing::trace!(key, "cache miss");
            return Ok(None);
        };

        converter
            .convert(raw)
            .map(Some)
            .map_err(|message| CacheError::conversion(key, message))
    }

    /// Return the raw bytes stored at `key`.
    pub async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.get(key, Raw).await
    }

    /// Return the value at `key` decoded as UTF-8.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.get(key, Utf8).await
    }

    /// Return the value at `key` parsed as an integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>, CacheError> {
        self.get(key, Integer).await
    }

    /// Return the value at `key` parsed as a float.
    pub async fn get_float(&self, key: &str) -> Result<Option<f64>, CacheError> {
        self.get(key, Float).await
    }

    /// How many times `store` has been called since the cache was created.
    pub async fn calls(&self) -> Result<i64, CacheError> {
        Ok(self
            .get(&self.operation_name, Integer)
            .await?
            .unwrap_or_default())
    }

    /// Replay the recorded history of `store`.
    pub async fn replay(&self) -> Result<Replay, CacheError> {
        replay(self.store.as_ref(), &self.operation_name).await
    }
}
