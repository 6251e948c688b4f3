//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. `GITLAB_URL` / `GITLAB_TOKEN`
//! 2. Environment variables (GITLAB_GATEWAY__*)
//! 3. Configuration file (TOML)
//! 4. Default values

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use std::path::Path;
use tracing::debug;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "gitlab-gateway.toml",
    ".gitlab-gateway.toml",
    "~/.config/gitlab-gateway/config.toml",
];

/// Prefix for nested environment overrides, e.g. `GITLAB_GATEWAY__GITLAB__TIMEOUT_SECS`
const ENV_PREFIX: &str = "GITLAB_GATEWAY";

/// Load configuration from a TOML string (useful for testing)
///
/// The token requirement is not enforced here.
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_common(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                debug!(path = %expanded, "Using configuration file");
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    builder = apply_gitlab_env(builder)?;

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Apply the conventional `GITLAB_URL` and `GITLAB_TOKEN` variables
fn apply_gitlab_env(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for (env_var, key) in [("GITLAB_URL", "gitlab.url"), ("GITLAB_TOKEN", "gitlab.token")] {
        if let Ok(value) = std::env::var(env_var) {
            builder = builder
                .set_override(key, value)
                .map_err(|e| ConfigError::Load(e.to_string()))?;
        }
    }
    Ok(builder)
}

/// Checks shared by both loaders
fn validate_common(config: &AppConfig) -> Result<(), ConfigError> {
    if config.gitlab.url.is_empty() {
        return Err(ConfigError::Missing {
            field: "gitlab.url".to_string(),
        });
    }

    if !config.gitlab.url.starts_with("http://") && !config.gitlab.url.starts_with("https://") {
        return Err(ConfigError::Invalid {
            message: format!(
                "gitlab.url must start with http:// or https://, got: {}",
                config.gitlab.url
            ),
        });
    }

    if config.gitlab.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            message: "gitlab.timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.server.port == 0 {
        return Err(ConfigError::Invalid {
            message: "server.port must be greater than 0".to_string(),
        });
    }

    Ok(())
}

/// Validate configuration values, including the token requirement
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    validate_common(config)?;

    match &config.gitlab.token {
        Some(token) if !token.is_blank() => Ok(()),
        _ => Err(ConfigError::Missing {
            field: "gitlab.token (set GITLAB_TOKEN environment variable)".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::SecretString;

    #[test]
    fn test_load_config_from_str_basic() {
        let toml = r#"
[server]
name = "test-server"

[gitlab]
url = "https://gitlab.example.com"
token = "test-token"
"#;

        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.gitlab.url, "https://gitlab.example.com");
        assert_eq!(
            config.gitlab.token.as_ref().map(|t| t.expose_secret()),
            Some("test-token")
        );
        assert_eq!(config.server.name, "test-server");
    }

    #[test]
    fn test_invalid_url_error() {
        let toml = r#"
[gitlab]
url = "not-a-url"
"#;

        assert!(matches!(
            load_config_from_str(toml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_empty_url_error() {
        let toml = r#"
[gitlab]
url = ""
"#;

        assert!(matches!(
            load_config_from_str(toml),
            Err(ConfigError::Missing { .. })
        ));
    }

    #[test]
    fn test_zero_timeout_error() {
        let toml = r#"
[gitlab]
timeout_secs = 0
"#;

        assert!(load_config_from_str(toml).is_err());
    }

    #[test]
    fn test_validate_requires_token() {
        let config = AppConfig::default();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Missing { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_blank_token() {
        let mut config = AppConfig::default();
        config.gitlab.token = Some(SecretString::new(""));
        assert!(validate_config(&config).is_err());

        config.gitlab.token = Some(SecretString::new("glpat-ok"));
        assert!(validate_config(&config).is_ok());
    }
}
