//! Account application booted in-process

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use trellis::accounts::{self, AccessControl, UserStore};
use trellis::domain::ports::{CacheEntryConfig, CacheProvider};
use trellis::domain::value_objects::{HttpMethod, InboundRequest};
use trellis::infrastructure::CacheService;
use trellis::infrastructure::config::ConfigBuilder;
use trellis::infrastructure::crypto::JwtService;
use trellis::server::{Application, DispatchResponse};
use trellis_providers::MokaCacheProvider;

pub const PASSWORD: &str = "s3cret-pass";

pub struct Accounts {
    pub app: Application,
}

impl Accounts {
    pub fn new() -> Self {
        let app = accounts::application()
            .with_config(ConfigBuilder::new().build())
            .with_logging(false)
            .build()
            .unwrap();
        Self { app }
    }

    /// Application whose cache writes are recorded
    pub fn recorded() -> (Self, Arc<RecordingCache>) {
        let cache = Arc::new(RecordingCache::default());
        let app = accounts::application()
            .with_config(ConfigBuilder::new().build())
            .with_cache_provider(cache.clone())
            .with_logging(false)
            .build()
            .unwrap();
        (Self { app }, cache)
    }

    pub async fn send(&self, request: InboundRequest) -> DispatchResponse {
        self.app.dispatcher().dispatch(request).await
    }

    /// Register `username` and return its id
    pub async fn register(&self, username: &str) -> u64 {
        let response = self
            .send(post(
                "/users/register",
                &json!({
                    "username": username,
                    "password": PASSWORD,
                    "confirmedPassword": PASSWORD,
                    "age": "31",
                }),
            ))
            .await;
        assert_eq!(response.status, 201, "{}", response.body);
        response.body["id"].as_u64().unwrap()
    }

    /// Log `username` in and return its token
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .send(put(
                "/users/login",
                &json!({ "username": username, "password": PASSWORD }),
            ))
            .await;
        assert_eq!(response.status, 200, "{}", response.body);
        response.body["token"].as_str().unwrap().to_string()
    }

    /// Register and log in a user holding `role` in addition to the default one
    pub async fn signed_in(&self, username: &str, role: Option<&str>) -> (u64, String) {
        let id = self.register(username).await;
        if let Some(role) = role {
            self.access().assign_role(id, role).unwrap();
        }
        (id, self.login(username).await)
    }

    pub fn store(&self) -> Arc<UserStore> {
        self.app.container().get::<UserStore>().unwrap()
    }

    pub fn access(&self) -> Arc<AccessControl> {
        self.app.container().get::<AccessControl>().unwrap()
    }

    pub fn cache(&self) -> Arc<CacheService> {
        self.app.container().get::<CacheService>().unwrap()
    }

    pub fn jwt(&self) -> Arc<JwtService> {
        self.app.container().get::<JwtService>().unwrap()
    }
}

pub fn get(path: &str) -> InboundRequest {
    InboundRequest::new(HttpMethod::Get, path)
}

pub fn post(path: &str, body: &Value) -> InboundRequest {
    InboundRequest::new(HttpMethod::Post, path).with_json(body)
}

pub fn put(path: &str, body: &Value) -> InboundRequest {
    InboundRequest::new(HttpMethod::Put, path).with_json(body)
}

pub fn delete(path: &str) -> InboundRequest {
    InboundRequest::new(HttpMethod::Delete, path)
}

pub fn bearer(request: InboundRequest, token: &str) -> InboundRequest {
    request.with_header("Authorization", format!("Bearer {token}"))
}

/// Moka-backed cache remembering the entry config of every write
#[derive(Debug, Default)]
pub struct RecordingCache {
    inner: MokaCacheProvider,
    writes: Mutex<Vec<(String, CacheEntryConfig)>>,
}

impl RecordingCache {
    /// Entry configs written under `key`, oldest first
    pub fn writes_to(&self, key: &str) -> Vec<CacheEntryConfig> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(written, _)| written == key)
            .map(|(_, config)| config.clone())
            .collect()
    }
}

#[async_trait]
impl CacheProvider for RecordingCache {
    async fn get_json(&self, key: &str) -> trellis::Result<Option<String>> {
        self.inner.get_json(key).await
    }

    async fn set_json(
        &self,
        key: &str,
        value: &str,
        config: CacheEntryConfig,
    ) -> trellis::Result<()> {
        self.writes
            .lock()
            .unwrap()
            .push((key.to_string(), config.clone()));
        self.inner.set_json(key, value, config).await
    }

    async fn delete(&self, key: &str) -> trellis::Result<bool> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> trellis::Result<bool> {
        self.inner.exists(key).await
    }

    async fn clear(&self) -> trellis::Result<()> {
        self.inner.clear().await
    }

    async fn size(&self) -> trellis::Result<usize> {
        self.inner.size().await
    }

    fn provider_name(&self) -> &str {
        "recording"
    }
}
