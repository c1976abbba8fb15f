use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Tenant the authorization endpoint serves. User lookups are scoped to it.
    pub tenant_id: String,
    /// Symmetric secret used to sign authorization codes (HS256).
    pub code_signing_secret: String,
}

/// Load application configuration from `config.yaml` + environment overrides.
///
/// Environment variable override convention: any var matching the key path
/// separated by double underscores (e.g. `DATABASE_URL`) will override the
/// file value.
///
/// Returns a `ConfigError` instead of panicking so the caller can decide how to fail.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::with_name("config.yaml"))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    validate(&app)?;

    Ok(app)
}

fn validate(app: &AppConfig) -> Result<(), ConfigError> {
    if app.code_signing_secret.len() < 32 {
        return Err(ConfigError::Validation(
            "code_signing_secret must be at least 32 characters".into(),
        ));
    }
    if app.tenant_id.is_empty() {
        return Err(ConfigError::Validation("tenant_id must not be empty".into()));
    }
    Ok(())
}

/// Convenience helper for binaries wanting panic-on-error behaviour.
pub fn load_config_or_panic() -> AppConfig {
    match load_config() {
        Ok(c) => c,
        Err(e) => panic!("Failed to load configuration: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".to_string(),
            tenant_id: "tenant-1".to_string(),
            code_signing_secret: "0123456789abcdef0123456789abcdef".to_string(),
        }
    }

    #[test]
    fn accepts_valid_config() {
        assert!(validate(&base_config()).is_ok());
    }

    #[test]
    fn rejects_short_signing_secret() {
        let mut cfg = base_config();
        cfg.code_signing_secret = "too-short".to_string();
        let err = validate(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("code_signing_secret"));
    }

    #[test]
    fn rejects_empty_tenant() {
        let mut cfg = base_config();
        cfg.tenant_id = String::new();
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));
    }
}
