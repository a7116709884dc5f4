//! Cache service over the registered moka provider

// Force linkme registration of the real providers
extern crate trellis_providers;

use trellis_domain::error::Error;
use trellis_domain::value_objects::TimeUnit;
use trellis_infrastructure::CacheService;
use trellis_infrastructure::config::CacheConfig;

#[tokio::test]
async fn values_round_trip_with_ttl() {
    let cache = CacheService::from_config(&CacheConfig::default()).unwrap();
    assert_eq!(cache.provider().provider_name(), "moka");

    cache
        .set_with_ttl("userToken@7", "token-value", 30, TimeUnit::Day)
        .await
        .unwrap();

    assert!(cache.has("userToken@7").await.unwrap());
    let stored: Option<String> = cache.get("userToken@7").await.unwrap();
    assert_eq!(stored.as_deref(), Some("token-value"));

    assert!(cache.remove("userToken@7").await.unwrap());
    assert!(!cache.has("userToken@7").await.unwrap());
}

#[tokio::test]
async fn non_positive_ttl_is_a_cache_error() {
    let cache = CacheService::from_config(&CacheConfig::default()).unwrap();
    let err = cache
        .set_with_ttl("Users@1", &1, 0, TimeUnit::Second)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cache { .. }));
    assert!(!cache.has("Users@1").await.unwrap());
}

#[tokio::test]
async fn session_marker_lives_under_user_token_key() {
    use trellis_infrastructure::SessionService;

    let cache = CacheService::from_config(&CacheConfig::default()).unwrap();
    let sessions = SessionService::from(cache.clone());

    assert_eq!(SessionService::session_key("12"), "userToken@12");
    assert!(!sessions.is_open("12").await.unwrap());

    sessions.open("12", "jwt").await.unwrap();
    assert!(sessions.is_open("12").await.unwrap());
    assert!(cache.has("userToken@12").await.unwrap());

    assert!(sessions.close("12").await.unwrap());
    assert!(!sessions.is_open("12").await.unwrap());
}
