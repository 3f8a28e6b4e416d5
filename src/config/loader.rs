//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{
    GatewayConfig, BLOGS_HTTP, IDENTITY_HTTP, IDENTITY_RPC, TOURS_HTTP, TOURS_RPC,
};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding the listen address.
pub const ENV_GATEWAY_ADDRESS: &str = "GATEWAY_ADDRESS";

/// Environment variables overriding backend addresses, by backend name.
pub const BACKEND_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("AUTH_STAKEHOLDERS_SERVICE_GRPC_ADDRESS", IDENTITY_RPC),
    ("AUTH_STAKEHOLDERS_SERVICE_HTTP_ADDRESS", IDENTITY_HTTP),
    ("TOUR_ADDRESS", TOURS_HTTP),
    ("TOUR_SERVICE_GRPC_ADDRESS", TOURS_RPC),
    ("BLOG_SERVICE_ADDRESS", BLOGS_HTTP),
];

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file into a configuration, without validating it.
pub fn read_config_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load the effective configuration.
///
/// Defaults, then the optional TOML file, then environment overrides; the
/// result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => GatewayConfig::default(),
    };

    config.apply_env_overrides(|key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

impl GatewayConfig {
    /// Apply address overrides from the given variable lookup.
    ///
    /// Empty values count as unset. An override for a backend that is not
    /// configured is ignored with a warning.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(addr) = lookup(ENV_GATEWAY_ADDRESS) {
            self.listener.bind_address = addr;
        }

        for (var, backend) in BACKEND_ENV_OVERRIDES {
            let Some(addr) = lookup(var) else { continue };
            match self.backend_mut(backend) {
                Some(b) => b.address = addr,
                None => tracing::warn!(
                    variable = %var,
                    backend = %backend,
                    "Override set for a backend that is not configured"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_overrides_replace_addresses() {
        let vars = env(&[
            ("GATEWAY_ADDRESS", "0.0.0.0:7000"),
            ("AUTH_STAKEHOLDERS_SERVICE_GRPC_ADDRESS", "auth:9000"),
            ("TOUR_ADDRESS", "http://tours:80"),
        ]);
        let mut config = GatewayConfig::default();
        config.apply_env_overrides(|k| vars.get(k).cloned());

        assert_eq!(config.listener.bind_address, "0.0.0.0:7000");
        assert_eq!(config.backend(IDENTITY_RPC).unwrap().address, "auth:9000");
        assert_eq!(config.backend(TOURS_HTTP).unwrap().address, "http://tours:80");
        assert_eq!(
            config.backend(BLOGS_HTTP).unwrap().address,
            "http://localhost:8083"
        );
    }

    #[test]
    fn test_empty_env_value_is_ignored() {
        let vars = env(&[("GATEWAY_ADDRESS", ""), ("BLOG_SERVICE_ADDRESS", "")]);
        let mut config = GatewayConfig::default();
        config.apply_env_overrides(|k| vars.get(k).cloned());

        assert_eq!(config.listener.bind_address, "localhost:7070");
        assert_eq!(
            config.backend(BLOGS_HTTP).unwrap().address,
            "http://localhost:8083"
        );
    }

    #[test]
    fn test_read_config_file() {
        let path = std::env::temp_dir().join(format!("gateway-{}.toml", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[shutdown]\ngrace_period_secs = 3").unwrap();

        let config = read_config_file(&path).unwrap();
        assert_eq!(config.shutdown.grace_period_secs, 3);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_config_file(Path::new("/nonexistent/gateway.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
