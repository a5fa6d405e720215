//! Configuration loading for huginnd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.huginn/config.toml` (user)
//! 3. `/etc/huginn/config.toml` (system)
//! 4. built-in defaults
//!
//! CLI flags and environment variables (`HUGINN_ADDRESS`,
//! `MODEL_SERVICE_URL`) override whatever the file says; see
//! [`Config::apply_overrides`].

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::gateway::{Huginn, HuginnGateway};
use crate::providers::DEFAULT_BASE_URL;
use crate::{HuginnError, Result};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model_service: ModelServiceConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:5001).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0:5001".to_string()
}

/// Model service connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelServiceConfig {
    /// Base URL (default: http://localhost:5000).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Analyze call timeout in seconds (default: 10).
    #[serde(default = "default_analyze_timeout")]
    pub analyze_timeout_secs: u64,
    /// Version and feedback call timeout in seconds (default: 5).
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,
}

impl Default for ModelServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            analyze_timeout_secs: default_analyze_timeout(),
            lookup_timeout_secs: default_lookup_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_analyze_timeout() -> u64 {
    10
}

fn default_lookup_timeout() -> u64 {
    5
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; must exist)
    /// 2. `~/.huginn/config.toml`
    /// 3. `/etc/huginn/config.toml`
    ///
    /// Falls back to defaults when no file is found.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            HuginnError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path, `None` when no file exists.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(HuginnError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".huginn").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/huginn/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Apply CLI/environment overrides on top of the loaded file.
    pub fn apply_overrides(&mut self, address: Option<String>, model_service_url: Option<String>) {
        if let Some(address) = address {
            self.server.address = address;
        }
        if let Some(url) = model_service_url {
            self.model_service.base_url = url;
        }
    }

    /// Build the gateway described by this configuration.
    pub fn build_gateway(&self) -> Result<HuginnGateway> {
        Huginn::builder()
            .model_service_url(&self.model_service.base_url)
            .analyze_timeout(Duration::from_secs(self.model_service.analyze_timeout_secs))
            .lookup_timeout(Duration::from_secs(self.model_service.lookup_timeout_secs))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.address, "0.0.0.0:5001");
        assert_eq!(config.model_service.base_url, "http://localhost:5000");
        assert_eq!(config.model_service.analyze_timeout_secs, 10);
        assert_eq!(config.model_service.lookup_timeout_secs, 5);
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [model_service]
            base_url = "http://model:8080"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.model_service.base_url, "http://model:8080");
        // Defaults preserved
        assert_eq!(config.model_service.analyze_timeout_secs, 10);
        assert_eq!(config.server.address, "0.0.0.0:5001");
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [server]
            address = "127.0.0.1:8000"

            [model_service]
            base_url = "https://model.internal"
            analyze_timeout_secs = 3
            lookup_timeout_secs = 1
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.address, "127.0.0.1:8000");
        assert_eq!(config.model_service.base_url, "https://model.internal");
        assert_eq!(config.model_service.analyze_timeout_secs, 3);
        assert_eq!(config.model_service.lookup_timeout_secs, 1);
    }

    #[test]
    fn overrides_win_over_file() {
        let mut config: Config = toml::from_str(
            r#"
            [server]
            address = "127.0.0.1:8000"
        "#,
        )
        .unwrap();
        config.apply_overrides(None, Some("http://other:5000".into()));
        assert_eq!(config.server.address, "127.0.0.1:8000");
        assert_eq!(config.model_service.base_url, "http://other:5000");

        config.apply_overrides(Some("0.0.0.0:9000".into()), None);
        assert_eq!(config.server.address, "0.0.0.0:9000");
    }

    #[test]
    fn load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\naddress = \"127.0.0.1:7000\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.server.address, "127.0.0.1:7000");
    }

    #[test]
    fn invalid_toml_is_a_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\naddress = ").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, HuginnError::Configuration(_)));
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[test]
    fn build_gateway_rejects_bad_url() {
        let mut config = Config::default();
        config.apply_overrides(None, Some("localhost:5000".into()));
        assert!(config.build_gateway().is_err());
    }
}
