//! Configuration loader
//!
//! Merges configuration sources with figment, lowest precedence first:
//!
//! 1. `AppConfig::default()`
//! 2. `config/trellis.toml`
//! 3. `config/trellis.<env>.toml`, `<env>` from `TRELLIS_ENV` (default `development`)
//! 4. An explicit file given with [`ConfigLoader::with_config_path`]
//! 5. Environment variables `TRELLIS__SECTION__KEY`

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use trellis_domain::error::{Error, Result};

use crate::config::{AppConfig, AuthConfig, CacheBackend, CacheConfig, LoggingConfig, ServerConfig};
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, CONFIG_ENV_VAR, DEFAULT_CONFIG_DIR,
    DEFAULT_ENVIRONMENT, SHARED_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Directory holding the shared and environment files
    config_dir: PathBuf,

    /// Environment name; read from `TRELLIS_ENV` when unset
    environment: Option<String>,

    /// Explicit configuration file
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            environment: None,
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the directory searched for `trellis.toml` and `trellis.<env>.toml`
    #[must_use]
    pub fn with_config_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.config_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the environment name instead of reading `TRELLIS_ENV`
    #[must_use]
    pub fn with_environment<S: Into<String>>(mut self, environment: S) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Set an explicit configuration file, merged over the environment file
    #[must_use]
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    #[must_use]
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Get the explicit configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Environment whose override file is merged
    pub fn environment(&self) -> String {
        self.environment.clone().unwrap_or_else(|| {
            std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string())
        })
    }

    /// Load configuration from all sources
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        let shared = self.config_dir.join(SHARED_CONFIG_FILENAME);
        figment = merge_optional(figment, &shared);

        let environment = self.config_dir.join(format!("trellis.{}.toml", self.environment()));
        figment = merge_optional(figment, &environment);

        // An explicit file must exist
        if let Some(config_path) = &self.config_path {
            if !config_path.exists() {
                log_config_loaded(config_path, false);
                return Err(Error::configuration(format!(
                    "Configuration file not found: {}",
                    config_path.display()
                )));
            }
            figment = figment.merge(Toml::file(config_path));
            log_config_loaded(config_path, true);
        }

        // Double underscore separates nested keys (e.g., TRELLIS__SERVER__PORT)
        let prefix = format!("{}{CONFIG_ENV_SEPARATOR}", self.env_prefix);
        figment = figment.merge(Env::prefixed(&prefix).split(CONFIG_ENV_SEPARATOR));

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

        let path = path.as_ref();
        std::fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_optional(figment: Figment, path: &Path) -> Figment {
    if path.exists() {
        log_config_loaded(path, true);
        figment.merge(Toml::file(path))
    } else {
        tracing::debug!("Optional configuration file absent: {}", path.display());
        figment
    }
}

/// Validate application configuration
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_server_config(&config.server)?;
    validate_auth_config(&config.auth)?;
    validate_cache_config(&config.cache)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<()> {
    if config.port == 0 {
        return Err(Error::configuration("Server port cannot be 0"));
    }
    Ok(())
}

fn validate_auth_config(config: &AuthConfig) -> Result<()> {
    if config.jwt.secret.is_empty() {
        return Err(Error::configuration("JWT secret cannot be empty"));
    }
    if config.jwt.expiration_days == 0 {
        return Err(Error::configuration("JWT expiration cannot be 0 days"));
    }
    if config.session_ttl_days <= 0 {
        return Err(Error::configuration(
            "Session TTL must be a positive number of days",
        ));
    }
    Ok(())
}

fn validate_cache_config(config: &CacheConfig) -> Result<()> {
    if config.provider == CacheBackend::Redis && config.redis_url.is_none() {
        return Err(Error::configuration(
            "Redis URL is required when the redis cache provider is selected",
        ));
    }
    if config.provider == CacheBackend::Moka && config.max_capacity == 0 {
        return Err(Error::configuration("Cache capacity cannot be 0"));
    }
    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    parse_log_level(&config.level).map(|_| ())
}

/// Configuration builder for programmatic configuration
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set server configuration
    #[must_use]
    pub fn with_server(mut self, server: ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    /// Set the listen port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Set logging configuration
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Set authentication configuration
    #[must_use]
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.config.auth = auth;
        self
    }

    /// Set cache configuration
    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.config.cache = cache;
        self
    }

    /// Enable or disable the jobs of a scope
    #[must_use]
    pub fn with_job(mut self, scope: &str, start: bool) -> Self {
        self.config.jobs.set(scope, start);
        self
    }

    /// Build the configuration
    pub fn build(self) -> AppConfig {
        self.config
    }
}
