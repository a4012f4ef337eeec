//! Configuration loading
//!
//! Config file resolution follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. `EMOTUNE_CONFIG` environment variable
//! 3. `~/.config/emotune/config.toml`
//! 4. Compiled defaults (fallback)
//!
//! A missing file is not an error: the client logs a warning and starts with
//! defaults. A file that exists but does not parse is.

use crate::{Error, Language, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Backend address of a local development server
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "EMOTUNE_CONFIG";

/// Environment variable overriding `backend_url`
pub const BACKEND_URL_ENV_VAR: &str = "EMOTUNE_BACKEND_URL";

/// Client configuration (TOML)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the emotion/recommendation/account backend
    pub backend_url: String,
    /// Initial recommendation language
    pub language: Language,
    /// Per-request timeout for every backend call
    pub request_timeout_secs: u64,
    /// Live frame written by the capture daemon (camera mode)
    pub camera_frame_path: Option<PathBuf>,
    /// Override for the preferences file location
    pub preferences_path: Option<PathBuf>,
    pub logging: LoggingConfig,
}

/// Logging section
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing level when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            language: Language::default(),
            request_timeout_secs: 30,
            camera_frame_path: None,
            preferences_path: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: ClientConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.normalize()?;
        Ok(config)
    }

    /// Load from a file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Preferences file, configured or platform default
    pub fn preferences_path(&self) -> PathBuf {
        self.preferences_path
            .clone()
            .unwrap_or_else(default_preferences_path)
    }

    /// Replace the backend URL (env/CLI override), re-validating it
    pub fn set_backend_url(&mut self, url: &str) -> Result<()> {
        self.backend_url = url.to_string();
        self.normalize()
    }

    fn normalize(&mut self) -> Result<()> {
        let url = self.backend_url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "backend_url must be an http(s) URL, got {:?}",
                self.backend_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config("request_timeout_secs must be > 0".to_string()));
        }
        self.backend_url = url;
        Ok(())
    }
}

/// Config file resolver
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<&Path>) -> Self {
        Self {
            cli_path: cli_path.map(Path::to_path_buf),
        }
    }

    /// Path of the config file to read, highest priority first
    pub fn config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.cli_path {
            return Some(path.clone());
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        dirs::config_dir().map(|d| d.join("emotune").join("config.toml"))
    }

    /// Resolve the effective configuration
    ///
    /// Applies `EMOTUNE_BACKEND_URL` on top of whatever the file provides.
    pub fn resolve(&self) -> Result<ClientConfig> {
        let mut config = match self.config_path() {
            Some(path) if path.exists() => {
                info!("Loading config from {}", path.display());
                ClientConfig::load(&path)?
            }
            Some(path) => {
                warn!(
                    "Config file {} not found, using defaults",
                    path.display()
                );
                ClientConfig::default()
            }
            None => {
                warn!("Could not determine config directory, using defaults");
                ClientConfig::default()
            }
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV_VAR) {
            if !url.trim().is_empty() {
                info!(backend_url = %url, "Backend URL overridden by environment");
                config.set_backend_url(&url)?;
            }
        }

        Ok(config)
    }
}

/// `<data_local_dir>/emotune/preferences.toml`
pub fn default_preferences_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("emotune"))
        .unwrap_or_else(|| PathBuf::from("./emotune_data"))
        .join("preferences.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.language, Language::English);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml_str("language = \"Tamil\"\n").unwrap();
        assert_eq!(config.language, Language::Tamil);
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config =
            ClientConfig::from_toml_str("backend_url = \"http://example.test:9000/\"\n").unwrap();
        assert_eq!(config.backend_url, "http://example.test:9000");
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err = ClientConfig::from_toml_str("backend_url = \"ftp://x\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(ClientConfig::from_toml_str("request_timeout_secs = 0\n").is_err());
    }

    #[test]
    fn test_cli_path_wins() {
        let resolver = ConfigResolver::new(Some(Path::new("/tmp/emotune-cli.toml")));
        assert_eq!(
            resolver.config_path(),
            Some(PathBuf::from("/tmp/emotune-cli.toml"))
        );
    }
}
