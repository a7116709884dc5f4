//! Tests for the Moka cache provider

use std::time::Duration;

use trellis_domain::ports::{CacheEntryConfig, CacheProvider};
use trellis_providers::MokaCacheProvider;

#[tokio::test]
async fn stores_and_reads_json() {
    let cache = MokaCacheProvider::new();
    cache
        .set_json("Users@1", r#"{"id":"1"}"#, CacheEntryConfig::default())
        .await
        .unwrap();

    assert_eq!(
        cache.get_json("Users@1").await.unwrap().as_deref(),
        Some(r#"{"id":"1"}"#)
    );
    assert!(cache.exists("Users@1").await.unwrap());
    assert_eq!(cache.provider_name(), "moka");
}

#[tokio::test]
async fn entries_expire_after_their_own_ttl() {
    let cache = MokaCacheProvider::new();
    cache
        .set_json(
            "short",
            "1",
            CacheEntryConfig::default().with_ttl(Duration::from_millis(100)),
        )
        .await
        .unwrap();
    cache
        .set_json(
            "long",
            "2",
            CacheEntryConfig::default().with_ttl(Duration::from_secs(60)),
        )
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(cache.get_json("short").await.unwrap(), None);
    assert_eq!(cache.get_json("long").await.unwrap().as_deref(), Some("2"));
}

#[tokio::test]
async fn delete_reports_presence() {
    let cache = MokaCacheProvider::new();
    cache
        .set_json("k", "true", CacheEntryConfig::default())
        .await
        .unwrap();

    assert!(cache.delete("k").await.unwrap());
    assert!(!cache.delete("k").await.unwrap());
    assert!(!cache.exists("k").await.unwrap());
}

#[tokio::test]
async fn clear_empties_the_cache() {
    let cache = MokaCacheProvider::with_capacity(16);
    for i in 0..4 {
        cache
            .set_json(&format!("k{i}"), "0", CacheEntryConfig::default())
            .await
            .unwrap();
    }
    assert_eq!(cache.size().await.unwrap(), 4);

    cache.clear().await.unwrap();
    assert_eq!(cache.size().await.unwrap(), 0);
}

#[tokio::test]
async fn zero_ttl_is_rejected() {
    let cache = MokaCacheProvider::new();
    let result = cache
        .set_json("k", "0", CacheEntryConfig::default().with_ttl(Duration::ZERO))
        .await;
    assert!(result.is_err());
}
