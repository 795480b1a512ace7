//! Layered server configuration
//!
//! Priority (lowest to highest):
//! 1. Built-in defaults
//! 2. Config file: `monitor.toml`, or the path in `MONITOR_CONFIG`
//! 3. Environment: `MONITOR__<SECTION>__<KEY>`, e.g. `MONITOR__CLASSIFIER__EAR_THRESHOLD=0.2`

use config::{Config, Environment, File, Source};
use monitor::{ClassifierConfig, TemporalClassifier};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ApiError;

/// Environment variable holding the config file path
pub const CONFIG_PATH_ENV: &str = "MONITOR_CONFIG";

/// Config file looked up when `MONITOR_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "monitor.toml";

const ENV_PREFIX: &str = "MONITOR";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub metrics: MetricsConfig,
    pub classifier: ClassifierConfig,
}

/// Listener and CORS settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind
    pub bind_addr: String,
    /// Allowed browser origins; `*` allows any
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Prometheus exporter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AppConfig {
    /// Load defaults, then the config file (if present), then the environment
    pub fn load() -> Result<Self, ApiError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        debug!("Loading configuration (file: {})", path);

        Self::from_sources(
            File::with_name(&path).required(false),
            Environment::with_prefix(ENV_PREFIX).separator("__"),
        )
    }

    fn from_sources<F, E>(file: F, env: E) -> Result<Self, ApiError>
    where
        F: Source + Send + Sync + 'static,
        E: Source + Send + Sync + 'static,
    {
        let config: AppConfig = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check the classifier section and build the classifier it describes
    pub fn validate(&self) -> Result<(), ApiError> {
        TemporalClassifier::new(self.classifier.clone())?;
        Ok(())
    }
}
