//! Layered configuration loading

use figment::Jail;
use trellis_domain::error::Error;
use trellis_infrastructure::config::{CacheBackend, ConfigBuilder, ConfigLoader};

fn load(jail: &Jail, environment: &str) -> Result<trellis_infrastructure::AppConfig, Error> {
    ConfigLoader::new()
        .with_config_dir(jail.directory())
        .with_environment(environment)
        .load()
}

#[test]
fn defaults_apply_without_files() {
    Jail::expect_with(|jail| {
        let config = load(jail, "development").map_err(|e| e.to_string())?;
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cache.provider, CacheBackend::Moka);
        assert_eq!(config.auth.jwt.expiration_days, 30);
        assert_eq!(config.auth.privileged_roles, vec!["ADMIN"]);
        assert!(!config.jobs.is_enabled("cleanup"));
        Ok(())
    });
}

#[test]
fn environment_file_overrides_shared_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "trellis.toml",
            r#"
                [server]
                port = 4000

                [logging]
                level = "debug"

                [jobs.cleanup]
                start = true
            "#,
        )?;
        jail.create_file(
            "trellis.staging.toml",
            r"
                [server]
                port = 5000
            ",
        )?;

        let config = load(jail, "staging").map_err(|e| e.to_string())?;
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.logging.level, "debug");
        assert!(config.jobs.is_enabled("cleanup"));
        Ok(())
    });
}

#[test]
fn environment_is_read_from_trellis_env() {
    Jail::expect_with(|jail| {
        jail.create_file("trellis.production.toml", "[server]\nport = 8443")?;
        jail.set_env("TRELLIS_ENV", "production");

        let config = ConfigLoader::new()
            .with_config_dir(jail.directory())
            .load()
            .map_err(|e| e.to_string())?;
        assert_eq!(config.server.port, 8443);
        Ok(())
    });
}

#[test]
fn environment_variables_take_precedence() {
    Jail::expect_with(|jail| {
        jail.create_file("trellis.toml", "[server]\nport = 4000")?;
        jail.set_env("TRELLIS__SERVER__PORT", "7000");
        jail.set_env("TRELLIS__AUTH__JWT__SECRET", "from-env");

        let config = load(jail, "development").map_err(|e| e.to_string())?;
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.auth.jwt.secret, "from-env");
        Ok(())
    });
}

#[test]
fn explicit_file_must_exist() {
    Jail::expect_with(|jail| {
        let result = ConfigLoader::new()
            .with_config_dir(jail.directory())
            .with_environment("development")
            .with_config_path(jail.directory().join("missing.toml"))
            .load();
        assert!(matches!(result, Err(Error::Configuration { .. })));
        Ok(())
    });
}

#[test]
fn redis_provider_requires_url() {
    Jail::expect_with(|jail| {
        jail.create_file("trellis.toml", "[cache]\nprovider = \"redis\"")?;
        let err = load(jail, "development").unwrap_err();
        assert!(err.to_string().contains("Redis URL"));
        Ok(())
    });
}

#[test]
fn unknown_log_level_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("trellis.toml", "[logging]\nlevel = \"chatty\"")?;
        assert!(load(jail, "development").is_err());
        Ok(())
    });
}

#[test]
fn saved_configuration_loads_back() {
    Jail::expect_with(|jail| {
        let config = ConfigBuilder::new()
            .with_port(9100)
            .with_job("cleanup", true)
            .build();
        let path = jail.directory().join("saved.toml");
        ConfigLoader::new()
            .save_to_file(&config, &path)
            .map_err(|e| e.to_string())?;

        let loaded = ConfigLoader::new()
            .with_config_dir(jail.directory())
            .with_environment("development")
            .with_config_path(&path)
            .load()
            .map_err(|e| e.to_string())?;
        assert_eq!(loaded.server.port, 9100);
        assert!(loaded.jobs.is_enabled("cleanup"));
        Ok(())
    });
}

#[test]
fn explicit_file_overrides_config_dir() {
    Jail::expect_with(|jail| {
        jail.create_file("trellis.toml", "[server]\nport = 4000\nhost = \"0.0.0.0\"")?;
        let external = tempfile::tempdir().map_err(|e| e.to_string())?;
        let path = external.path().join("override.toml");
        std::fs::write(&path, "[server]\nport = 4100").map_err(|e| e.to_string())?;

        let config = ConfigLoader::new()
            .with_config_dir(jail.directory())
            .with_environment("development")
            .with_config_path(&path)
            .load()
            .map_err(|e| e.to_string())?;
        assert_eq!(config.server.port, 4100);
        assert_eq!(config.server.host, "0.0.0.0");
        Ok(())
    });
}

#[test]
fn saving_into_missing_directory_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent").join("trellis.toml");

    let err = ConfigLoader::new()
        .save_to_file(&ConfigBuilder::new().build(), &path)
        .unwrap_err();

    assert!(matches!(err, Error::Infrastructure { .. }));
    assert!(err.to_string().contains(&path.display().to_string()));
}
