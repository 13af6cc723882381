// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Structured logging configuration.

use anyhow::Result;
use std::env;
use std::io;
use tracing::info;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
}

#[derive(Debug, Clone)]
pub enum LogFormat {
    /// JSON format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables.
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };
        Self { level, format }
    }

    /// Initialize the global tracing subscriber.
    pub fn init(&self) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let registry = tracing_subscriber::registry().with(env_filter);

        match self.format {
            LogFormat::Json => {
                registry
                    .with(fmt::layer().with_target(true).with_writer(io::stdout).json())
                    .init();
            }
            LogFormat::Pretty => {
                registry
                    .with(fmt::layer().with_target(true).with_writer(io::stdout))
                    .init();
            }
            LogFormat::Compact => {
                registry
                    .with(fmt::layer().compact().with_target(false).with_writer(io::stdout))
                    .init();
            }
        }

        info!(
            service.name = env!("CARGO_PKG_NAME"),
            service.version = env!("CARGO_PKG_VERSION"),
            log.level = %self.level,
            log.format = ?self.format,
            "Garmin report bot starting up"
        );

        Ok(())
    }
}

/// Initialize logging from environment.
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}
