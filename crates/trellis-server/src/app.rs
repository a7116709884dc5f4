//! Application lifecycle
//!
//! Startup is strictly sequential:
//!
//! ```text
//! config → logging → cache → discovery → container → routes → jobs → on_ready → transport
//! ```
//!
//! Any failure before the transport binds aborts startup. Shutdown stops
//! the jobs, runs the `on_close` hooks and closes the cache provider; each
//! teardown failure is logged and not retried.

use std::sync::Arc;

use rocket::{Build, Rocket};
use tracing::{error, info};
use trellis_application::decorators::{JobFn, JobScheduler, ScheduledJob};
use trellis_domain::error::Result;
use trellis_infrastructure::cache::CacheService;
use trellis_infrastructure::config::AppConfig;
use trellis_infrastructure::crypto::{JwtService, PasswordService};
use trellis_infrastructure::di::{ComponentRegistry, Container};
use trellis_infrastructure::logging::init_logging;
use trellis_infrastructure::session::SessionService;

use crate::builder::{ApplicationBuilder, LifecycleHook};
use crate::dispatch::{Authenticator, Dispatcher, PermissionGuard};
use crate::routing::RouteTable;
use crate::transport::HttpTransport;

/// A bootstrapped application
pub struct Application {
    config: AppConfig,
    container: Arc<Container>,
    dispatcher: Arc<Dispatcher>,
    scheduler: JobScheduler,
    cache: CacheService,
    on_ready: Vec<LifecycleHook>,
    on_close: Vec<LifecycleHook>,
}

impl Application {
    /// Create a new builder
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    pub(crate) fn from_builder(builder: ApplicationBuilder) -> Result<Self> {
        let config = match builder.config {
            Some(config) => config,
            None => builder.loader.load()?,
        };
        if builder.init_logging {
            init_logging(&config.logging)?;
        }
        info!(port = config.server.port, "bootstrapping application");

        let cache = match builder.cache {
            Some(provider) => CacheService::new(provider),
            None => CacheService::from_config(&config.cache)?,
        };
        let registry = match builder.registry {
            Some(registry) => registry,
            None => ComponentRegistry::discover()?,
        };
        let registry = registry
            .provide(Arc::new(config.clone()))?
            .provide(Arc::new(cache.clone()))?
            .provide(Arc::new(JwtService::new(&config.auth.jwt)))?
            .provide(Arc::new(PasswordService::new()))?
            .provide(Arc::new(SessionService::from_config(cache.clone(), &config.auth)))?;
        let container = Arc::new(Container::initialize(&registry)?);

        let routes = RouteTable::build(&container, Some(&cache))?;
        if config.app.print_routes {
            for line in routes.describe() {
                info!("{line}");
            }
        }
        let permissions = match builder.permissions {
            Some(source) => {
                PermissionGuard::new(source(&container)?, config.auth.privileged_roles.clone())
            }
            None => PermissionGuard::disabled(),
        };
        let authenticator = Authenticator::new(
            container.get::<JwtService>()?,
            container.get::<SessionService>()?,
        );
        let dispatcher = Arc::new(Dispatcher::new(routes, authenticator, permissions)?);

        let mut scheduler = JobScheduler::new();
        for binding in container.jobs() {
            let instance = binding.instance.clone();
            let job = binding.job.clone();
            let run: JobFn = Arc::new(move || job(instance.clone()));
            scheduler.add(ScheduledJob::new(
                format!("{}.{}", binding.component, binding.method),
                &binding.schedule,
                run,
            )?);
        }

        Ok(Self {
            config,
            container,
            dispatcher,
            scheduler,
            cache,
            on_ready: builder.on_ready,
            on_close: builder.on_close,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Singleton graph
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// Request dispatcher
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Bound routes
    pub fn routes(&self) -> &RouteTable {
        self.dispatcher.routes()
    }

    /// Scheduled jobs
    pub fn scheduler(&self) -> &JobScheduler {
        &self.scheduler
    }

    /// HTTP transport over this application's dispatcher
    pub fn transport(&self) -> HttpTransport {
        HttpTransport::new(self.config.server.clone(), Arc::clone(&self.dispatcher))
    }

    /// Rocket application, for embedding or local clients
    pub fn rocket(&self) -> Rocket<Build> {
        self.transport().rocket()
    }

    /// Start enabled jobs and run the `on_ready` hooks
    ///
    /// Returns the number of jobs started.
    pub async fn start(&mut self) -> Result<usize> {
        let jobs = &self.config.jobs;
        let started = self.scheduler.start(|scope| jobs.is_enabled(scope));
        for hook in &self.on_ready {
            hook(Arc::clone(&self.container)).await?;
        }
        info!(jobs = started, routes = self.routes().len(), "application ready");
        Ok(started)
    }

    /// Start, serve until the transport stops, then shut down
    pub async fn run(mut self) -> Result<()> {
        if let Err(e) = self.start().await {
            self.shutdown().await;
            return Err(e);
        }
        let served = self.transport().start().await;
        self.shutdown().await;
        served
    }

    /// Release resources in reverse dependency order
    pub async fn shutdown(&mut self) {
        self.scheduler.shutdown().await;
        for hook in &self.on_close {
            if let Err(e) = hook(Arc::clone(&self.container)).await {
                error!(error = %e, "on_close hook failed");
            }
        }
        if let Err(e) = self.cache.close().await {
            error!(error = %e, "failed to close cache provider");
        }
        info!("application stopped");
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("container", &self.container)
            .field("routes", &self.routes().len())
            .field("jobs", &self.scheduler.jobs().len())
            .finish_non_exhaustive()
    }
}
