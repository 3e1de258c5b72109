//! tracked-cache - An instrumented key-value cache library for Rust
//!
//! This library provides a caching layer over an external key-value store with:
//! - Storage of scalar values under generated keys
//! - Per-operation call counting and input/output history
//! - Replay of recorded history as a readable call trace
//! - A TTL-bounded cache for expensive fetches with per-resource miss counters
//!
//! # Example
//!
//! ```ignore
//! use tracked_cache::{Cache, CacheConfig, RedisStore, RedisStoreConfig, Store};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tracked_cache::CacheError> {
//!     let store: Arc<dyn Store> = Arc::new(RedisStore::new(RedisStoreConfig::from_env()).await?);
//!
//!     // Flushes the store, then counts and records every `store` call
//!     let cache = Cache::new(store, CacheConfig::default()).await?;
//!
//!     let key = cache.store("foo").await?;
//!     assert_eq!(cache.get_str(&key).await?, Some("foo".to_string()));
//!
//!     // Cache.store was called 1 times:
//!     // Cache.store(*('foo',)) -> 1c5c6f0e-...
//!     println!("{}", cache.replay().await?);
//!     Ok(())
//! }
//! ```

mod cache;
pub mod convert;
mod error;
pub mod instrument;
mod page;
mod replay;
mod store;
pub mod stores;
mod utils;
mod value;

// Re-export public API
pub use cache::{Cache, CacheConfig, DEFAULT_STORE_OPERATION, StoreValue};
pub use convert::Convert;
pub use error::CacheError;
pub use instrument::{Operation, with_counting, with_history};
pub use page::{DEFAULT_PAGE_TTL, Fetch, PageCache, PageCacheConfig, count_key, page_key};
pub use replay::{CallRecord, Replay, replay};
pub use store::Store;
pub use stores::memory::HashMapStore;
pub use stores::metrics::{MetricsSink, MetricsStore, StoreCommand, StoreMetric};
pub use stores::redis::{RedisStore, RedisStoreConfig};
pub use utils::generate_key;
pub use value::{CallArgs, Value};
