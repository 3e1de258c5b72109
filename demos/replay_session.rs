//! Example session: store a few values, read them back, replay the history
//! and cache a slow fetch.
//!
//! Uses Redis when `REDIS_URL` is set, the in-memory store otherwise.
//!
//! ```text
//! RUST_LOG=tracked_cache=debug cargo run --example replay_session
//! ```

use std::sync::Arc;
use std::time::Duration;
use tracked_cache::{
    Cache, CacheConfig, CacheError, HashMapStore, PageCache, PageCacheConfig, RedisStore,
    RedisStoreConfig, Store,
};
use tracing_subscriber::EnvFilter;

async fn slow_fetch(resource: String) -> Result<String, CacheError> {
    tokio::time::sleep(Duration::from_millis(200)).await;
    Ok(format!("<html><title>{}</title></html>", resource))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store: Arc<dyn Store> = if std::env::var("REDIS_URL").is_ok() {
        Arc::new(RedisStore::new(RedisStoreConfig::from_env()).await?)
    } else {
        Arc::new(HashMapStore::new())
    };
    println!("Using the {} store", store.name());

    let cache = Cache::new(store.clone(), CacheConfig::default()).await?;

    let text = cache.store("foo").await?;
    let bytes = cache.store(b"bar".to_vec()).await?;
    let number = cache.store(3).await?;
    let ratio = cache.store(0.75).await?;

    println!("{} -> {:?}", text, cache.get_str(&text).await?);
    println!("{} -> {:?}", bytes, cache.get_raw(&bytes).await?);
    println!("{} -> {:?}", number, cache.get_int(&number).await?);
    println!("{} -> {:?}", ratio, cache.get_float(&ratio).await?);
    println!("missing -> {:?}", cache.get_str("nonexistent-key").await?);

    println!();
    println!("{}", cache.replay().await?);
    println!();

    let pages = PageCache::new(store, slow_fetch, PageCacheConfig::default());
    for _ in 0..3 {
        let started = std::time::Instant::now();
        let body = pages.get_page("http://example.com").await?;
        println!("{} bytes in {:?}", body.len(), started.elapsed());
    }
    println!(
        "http://example.com was fetched {} time(s)",
        pages.miss_count("http://example.com").await?
    );

    Ok(())
}
