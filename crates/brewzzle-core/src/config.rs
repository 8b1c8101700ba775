//! Application configuration management.
//!
//! Configuration is layered with the `config` crate:
//!
//! 1. Built-in defaults (the `Default` impls below)
//! 2. `GOOGLE_MAPS_API_KEY`, as a default for `provider.api_key`
//! 3. A TOML file: `$BREWZZLE_CONFIG`, else `./brewzzle.toml`, else the
//!    platform config directory (`~/.config/brewzzle/config.toml` on Linux)
//! 4. `BREWZZLE__*` environment variables, e.g. `BREWZZLE__SERVER__PORT=8080`

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "BREWZZLE_CONFIG";

/// Environment variable read as a fallback API key.
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

const ENV_PREFIX: &str = "BREWZZLE";
const LOCAL_CONFIG_FILE: &str = "brewzzle.toml";

/// Google Places legacy web service root.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Reading or deserializing the layered sources failed.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// A single field failed validation.
    #[error("invalid {field}: {message}")]
    ValidationError {
        /// Dotted field path.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// More than one field failed validation.
    #[error("{} configuration errors", .0.len())]
    MultipleValidationErrors(Vec<ConfigError>),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Places provider settings.
    pub provider: ProviderConfig,

    /// Log output settings.
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to bind.
    pub port: u16,

    /// Production mode switches logging to JSON files.
    pub production: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5050,
            production: false,
        }
    }
}

/// Places provider settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Google Maps API key.
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Root URL of the places web service.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum concurrent place-details calls for the hours filters.
    pub details_concurrency: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            details_concurrency: 8,
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("details_concurrency", &self.details_concurrency)
            .finish()
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,

    /// Directory for rolling log files in production.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Config {
    /// Load configuration from the default locations and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if `$BREWZZLE_CONFIG` points at a missing file, a
    /// source cannot be parsed, or validation fails.
    pub fn load() -> ConfigResult<Self> {
        let config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load_from(Path::new(&path))?,
            None => {
                let local = PathBuf::from(LOCAL_CONFIG_FILE);
                if local.exists() {
                    Self::build(Some((local.as_path(), true)))?
                } else {
                    match default_config_path() {
                        Some(path) => Self::build(Some((path.as_path(), false)))?,
                        None => Self::build(None)?,
                    }
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from a specific file (plus environment) without validating.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::build(Some((path, true)))
    }

    fn build(file: Option<(&Path, bool)>) -> ConfigResult<Self> {
        let mut builder = ::config::Config::builder();

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            builder = builder.set_default("provider.api_key", key)?;
        }

        if let Some((path, required)) = file {
            builder = builder.add_source(
                ::config::File::new(&path.to_string_lossy(), ::config::FileFormat::Toml)
                    .required(required),
            );
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Check every field, collecting all problems.
    ///
    /// # Errors
    ///
    /// Returns a single [`ConfigError::ValidationError`] or
    /// [`ConfigError::MultipleValidationErrors`].
    pub fn validate(&self) -> ConfigResult<()> {
        let mut errors = Vec::new();

        if self.server.host.parse::<IpAddr>().is_err() {
            errors.push(ConfigError::ValidationError {
                field: "server.host",
                message: format!("'{}' is not an IP address", self.server.host),
            });
        }

        if self.provider.api_key.trim().is_empty() {
            errors.push(ConfigError::ValidationError {
                field: "provider.api_key",
                message: format!("must be set (or export {API_KEY_ENV})"),
            });
        }

        match url::Url::parse(&self.provider.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => errors.push(ConfigError::ValidationError {
                field: "provider.base_url",
                message: format!("'{}' is not an http(s) URL", self.provider.base_url),
            }),
        }

        if !(1..=120).contains(&self.provider.timeout_secs) {
            errors.push(ConfigError::ValidationError {
                field: "provider.timeout_secs",
                message: format!("{} is outside 1..=120", self.provider.timeout_secs),
            });
        }

        if !(1..=20).contains(&self.provider.details_concurrency) {
            errors.push(ConfigError::ValidationError {
                field: "provider.details_concurrency",
                message: format!("{} is outside 1..=20", self.provider.details_concurrency),
            });
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ConfigError::MultipleValidationErrors(errors)),
        }
    }
}

impl ServerConfig {
    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `host` is not an IP address.
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::ValidationError {
                field: "server.host",
                message: format!("'{}' is not an IP address", self.host),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Platform config file location, e.g. `~/.config/brewzzle/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "brewzzle")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
