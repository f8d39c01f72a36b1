//! Logger setup.
//!
//! The crate only talks to the `log` facade. Binaries that don't bring their
//! own logger can call [init_logging] early in `main`.

use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "dog_gl=debug"). When it is `None`, `RUST_LOG` is used, and if that is not
/// set either, everything at `info` and above is shown.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl LoggingConfig {
    pub fn new() -> Self {
        LoggingConfig {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }

    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    pub fn with_write_style(mut self, write_style: env_logger::WriteStyle) -> Self {
        self.write_style = write_style;
        self
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new()
    }
}

static INIT: Once = Once::new();

/// Install `env_logger` as the global logger. Only the first call does anything.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);

        // Another logger may already be installed by the host application
        if builder.try_init().is_err() {
            log::debug!("a global logger was already installed, keeping it");
            return;
        }

        log::debug!("logging initialized");
    });
}
