//! Tests for cache provider auto-registration

use trellis_application::ports::registry::{
    CacheProviderConfig, list_cache_providers, resolve_cache_provider,
};

#[test]
fn moka_is_registered() {
    let names: Vec<&str> = list_cache_providers().into_iter().map(|(n, _)| n).collect();
    assert!(names.contains(&"moka"));
}

#[test]
fn resolves_by_name() {
    let provider = resolve_cache_provider(&CacheProviderConfig::new("moka").with_max_size(8))
        .expect("moka provider");
    assert_eq!(provider.provider_name(), "moka");
}

#[test]
fn unknown_provider_lists_alternatives() {
    let err = resolve_cache_provider(&CacheProviderConfig::new("memcached")).unwrap_err();
    assert!(err.contains("memcached"));
    assert!(err.contains("moka"));
}
