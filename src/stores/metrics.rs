//! Metrics middleware for backing stores.
//!
//! This module provides a `MetricsStore` wrapper that emits one metric per
//! store primitive to a user-provided sink.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tracked_cache::{Cache, CacheConfig, HashMapStore, MetricsStore, Store};
//!
//! // Create metrics sink
//! let sink = Arc::new(MyMetricsSink::new());
//!
//! // Wrap store with metrics
//! let memory: Arc<dyn Store> = Arc::new(HashMapStore::new());
//! let store: Arc<dyn Store> = Arc::new(MetricsStore::new(memory, sink.clone()));
//!
//! // Use in Cache - metrics emitted automatically
//! let cache = Cache::new(store, CacheConfig::default()).await?;
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::CacheError;
use crate::store::Store;

/// The store primitive a metric describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCommand {
    Set,
    SetWithExpiry,
    Get,
    Incr,
    RPush,
    LRange,
    FlushAll,
}

/// Metric emitted by the MetricsStore wrapper for every primitive.
#[derive(Debug, Clone)]
pub struct StoreMetric {
    /// Which primitive ran.
    pub command: StoreCommand,
    /// The key the primitive touched (`"*"` for flushes).
    pub key: String,
    /// Whether the key was found. Only present for `Get`.
    pub hit: Option<bool>,
    /// Whether the primitive returned an error.
    pub failed: bool,
    /// Latency of the operation in milliseconds.
    pub latency_ms: f64,
    /// Name of the wrapped store (from Store::name()).
    pub tier: String,
}

/// Trait for receiving store metrics.
///
/// Implement this trait to collect metrics from `MetricsStore`.
///
/// # Example
///
/// ```ignore
/// use std::sync::Mutex;
/// use async_trait::async_trait;
/// use tracked_cache::{MetricsSink, StoreMetric};
///
/// struct BufferedSink {
///     buffer: Mutex<Vec<StoreMetric>>,
/// }
///
/// #[async_trait]
/// impl MetricsSink for BufferedSink {
///     fn emit(&self, metric: StoreMetric) {
///         self.buffer.lock().unwrap().push(metric);
///     }
///
///     async fn flush(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///         // Send buffered metrics to your backend
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Emit a single metric.
    ///
    /// This is called synchronously in the hot path of store operations.
    /// Implementations should be fast (e.g., buffer metrics in memory).
    fn emit(&self, metric: StoreMetric);

    /// Flush any buffered metrics.
    async fn flush(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// A store wrapper that emits metrics for all primitives.
///
/// `MetricsStore` wraps any `Store` implementation and forwards every call
/// unchanged, timing it and reporting the outcome to the sink.
pub struct MetricsStore {
    inner: Arc<dyn Store>,
    sink: Arc<dyn MetricsSink>,
    tier_name: String,
}

impl MetricsStore {
    /// Create a new MetricsStore wrapping the given store.
    ///
    /// # Arguments
    /// * `inner` - The store to wrap
    /// * `sink` - The metrics sink to emit metrics to
    pub fn new(inner: Arc<dyn Store>, sink: Arc<dyn MetricsSink>) -> Self {
        let tier_name = inner.name().to_string();
        MetricsStore {
            inner,
            sink,
            tier_name,
        }
    }

    /// Get a reference to the metrics sink.
    pub fn sink(&self) -> &Arc<dyn MetricsSink> {
        &self.sink
    }

    fn record<T>(
        &self,
        command: StoreCommand,
        key: &str,
        start: Instant,
        result: &Result<T, CacheError>,
        hit: Option<bool>,
    ) {
        self.sink.emit(StoreMetric {
            command,
            key: key.to_string(),
            hit,
            failed: result.is_err(),
            latency_ms: start.elapsed().as_secs_f64() * 1000.0,
            tier: self.tier_name.clone(),
        });
    }
}

#[async_trait]
impl Store for MetricsStore {
    fn name(&self) -> &'static str {
        "metrics"
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let start = Instant::now();
        let result = self.inner.set(key, value).await;
        self.record(StoreCommand::Set, key, start, &result, None);
        result
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let start = Instant::now();
        let result = self.inner.set_with_expiry(key, value, ttl).await;
        self.record(StoreCommand::SetWithExpiry, key, start, &result, None);
        result
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let start = Instant::now();
        let result = self.inner.get(key).await;
        let hit = matches!(result, Ok(Some(_)));
        self.record(StoreCommand::Get, key, start, &result, Some(hit));
        result
    }

    async fn incr(&self, key: &str) -> Result<i64, CacheError> {
        let start = Instant::now();
        let result = self.inner.incr(key).await;
        self.record(StoreCommand::Incr, key, start, &result, None);
        result
    }

    async fn rpush(&self, key: &str, item: Vec<u8>) -> Result<usize, CacheError> {
        let start = Instant::now();
        let result = self.inner.rpush(key, item).await;
        self.record(StoreCommand::RPush, key, start, &result, None);
        result
    }

    async fn lrange(
        &self,
        key: &str,
        start_index: isize,
        stop_index: isize,
    ) -> Result<Vec<Vec<u8>>, CacheError> {
        let start = Instant::now();
        let result = self.inner.lrange(key, start_index, stop_index).await;
        self.record(StoreCommand::LRange, key, start, &result, None);
        result
    }

    async fn flush_all(&self) -> Result<(), CacheError> {
        let start = Instant::now();
        let result = self.inner.flush_all().await;
        self.record(StoreCommand::FlushAll, "*", start, &result, None);
        result
    }
}
