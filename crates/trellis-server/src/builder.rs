//! Application builder
//!
//! Collects what the bootstrap sequence needs before anything is
//! constructed: configuration, the component registry, the cache and
//! permission providers and lifecycle hooks.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use trellis_domain::error::Result;
use trellis_domain::ports::{CacheProvider, PermissionProvider};
use trellis_infrastructure::config::{AppConfig, ConfigLoader};
use trellis_infrastructure::di::{ComponentRegistry, Container, Named};

use crate::app::Application;

/// Hook run after startup or before teardown
pub type LifecycleHook = Arc<dyn Fn(Arc<Container>) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Resolves the permission provider once the container is ready
pub(crate) type PermissionSource =
    Box<dyn FnOnce(&Container) -> Result<Arc<dyn PermissionProvider>> + Send>;

/// Builder for [`Application`]
pub struct ApplicationBuilder {
    pub(crate) config: Option<AppConfig>,
    pub(crate) loader: ConfigLoader,
    pub(crate) registry: Option<ComponentRegistry>,
    pub(crate) cache: Option<Arc<dyn CacheProvider>>,
    pub(crate) permissions: Option<PermissionSource>,
    pub(crate) on_ready: Vec<LifecycleHook>,
    pub(crate) on_close: Vec<LifecycleHook>,
    pub(crate) init_logging: bool,
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self {
            config: None,
            loader: ConfigLoader::new(),
            registry: None,
            cache: None,
            permissions: None,
            on_ready: Vec::new(),
            on_close: Vec::new(),
            init_logging: true,
        }
    }
}

impl ApplicationBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` instead of loading one
    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration with `loader`
    #[must_use]
    pub fn with_loader(mut self, loader: ConfigLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Use `registry` instead of link-time discovery
    #[must_use]
    pub fn with_registry(mut self, registry: ComponentRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Store cache entries in `provider` instead of the configured backend
    #[must_use]
    pub fn with_cache_provider(mut self, provider: Arc<dyn CacheProvider>) -> Self {
        self.cache = Some(provider);
        self
    }

    /// Check permissions with `provider`
    #[must_use]
    pub fn with_permission_provider(mut self, provider: Arc<dyn PermissionProvider>) -> Self {
        self.permissions = Some(Box::new(move |_| Ok(provider)));
        self
    }

    /// Check permissions with the singleton of component `T`
    #[must_use]
    pub fn with_permission_component<T>(mut self) -> Self
    where
        T: PermissionProvider + Named + Send + Sync + 'static,
    {
        self.permissions = Some(Box::new(|container: &Container| {
            let provider: Arc<dyn PermissionProvider> = container.get::<T>()?;
            Ok(provider)
        }));
        self
    }

    /// Whether to install the tracing subscriber; on by default
    #[must_use]
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.init_logging = enabled;
        self
    }

    /// Run `hook` once the application has started
    #[must_use]
    pub fn on_ready<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Arc<Container>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.on_ready.push(Arc::new(move |container| Box::pin(hook(container))));
        self
    }

    /// Run `hook` during shutdown
    #[must_use]
    pub fn on_close<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Arc<Container>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.on_close.push(Arc::new(move |container| Box::pin(hook(container))));
        self
    }

    /// Run the bootstrap sequence
    pub fn build(self) -> Result<Application> {
        Application::from_builder(self)
    }
}
