//! Store implementations for the cache library.

pub mod memory;
pub mod metrics;
pub mod redis;

pub use self::memory::HashMapStore;
pub use self::metrics::{MetricsSink, MetricsStore, StoreCommand, StoreMetric};
pub use self::redis::{RedisStore, RedisStoreConfig};
