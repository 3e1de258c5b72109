use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracked_cache::{CacheError, Value};

/// Simulated origin server with configurable latency
#[derive(Clone)]
pub struct FakeOrigin {
    latency_ms: u64,
    fetch_count: Arc<AtomicUsize>,
}

impl FakeOrigin {
    pub fn new(latency_ms: u64) -> Self {
        Self {
            latency_ms,
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn fetch(&self, resource: String) -> Result<String, CacheError> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);

        // Simulate network latency
        tokio::time::sleep(Duration::from_millis(self.latency_ms)).await;

        Ok(format!("<html><body>{}</body></html>", resource))
    }

    #[allow(dead_code)]
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::Relaxed)
    }
}

/// Generate values of every storable kind
pub struct ValueGenerator;

impl ValueGenerator {
    /// A mix of strings, bytes, integers and floats
    pub fn mixed(count: usize) -> Vec<Value> {
        let mut rng = rand::thread_rng();
        (0..count)
            .map(|i| match i % 4 {
                0 => Value::from(format!("value-{}", i)),
                1 => Value::from((0..32).map(|_| rng.r#gen::<u8>()).collect::<Vec<u8>>()),
                2 => Value::from(rng.gen_range(-1_000_000i64..1_000_000)),
                _ => Value::from(rng.r#gen::<f64>()),
            })
            .collect()
    }
}

/// Generate resource identifiers for different workload patterns
pub struct ResourceGenerator {
    num_resources: usize,
}

impl ResourceGenerator {
    pub fn new(num_resources: usize) -> Self {
        Self { num_resources }
    }

    /// Generate sequential resources (for cold cache tests)
    pub fn sequential(&self) -> Vec<String> {
        (0..self.num_resources)
            .map(|i| format!("http://example.com/page/{}", i))
            .collect()
    }

    /// Generate resources with a skewed distribution (80% of requests hit 20% of pages)
    pub fn skewed(&self, count: usize) -> Vec<String> {
        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| {
                let id = if rng.gen_bool(0.8) {
                    rng.gen_range(0..(self.num_resources / 5))
                } else {
                    rng.gen_range((self.num_resources / 5)..self.num_resources)
                };
                format!("http://example.com/page/{}", id)
            })
            .collect()
    }
}
