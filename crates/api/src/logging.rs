//! Tracing subscriber setup

use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::{LogConfig, LogFormat};

/// Initialize logging. `RUST_LOG` takes precedence over the configured level.
///
/// Calling this more than once keeps the first subscriber.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true);

    let result = match config.format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.finish()),
    };

    if let Err(e) = result {
        debug!("Tracing subscriber already installed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let config = LogConfig::default();
        init_logging(&config);
        init_logging(&LogConfig {
            format: LogFormat::Json,
            ..config
        });
    }

    #[test]
    fn test_bad_level_falls_back() {
        init_logging(&LogConfig {
            level: "not a [valid directive".to_string(),
            format: LogFormat::Pretty,
        });
    }
}
