// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based configuration, loaded once at process start and
//! immutable for the process lifetime.

use anyhow::{Context, Result};
use std::env;
use tracing::warn;

use crate::report::FeelingFallback;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Pre-established Garmin Connect session token.
    pub garmin_access_token: String,
    /// Telegram bot token.
    pub telegram_token: String,
    /// Two-letter report language code.
    pub language: String,
    /// Webhook listen port.
    pub http_port: u16,
    /// What a missing feeling value maps to.
    pub feeling_fallback: FeelingFallback,
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// `GARMIN_ACCESS_TOKEN` and `TELEGRAM_TOKEN` are required; everything
    /// else has a default.
    pub fn from_env() -> Result<Self> {
        let garmin_access_token =
            env::var("GARMIN_ACCESS_TOKEN").context("GARMIN_ACCESS_TOKEN must be set")?;
        let telegram_token = env::var("TELEGRAM_TOKEN").context("TELEGRAM_TOKEN must be set")?;

        let language = env::var("BOT_LANGUAGE").unwrap_or_else(|_| "es".to_string());

        let http_port = match env::var("HTTP_PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("HTTP_PORT is not a valid port: {raw}"))?,
            Err(_) => 8080,
        };

        let feeling_fallback = match env::var("FEELING_FALLBACK").as_deref() {
            Ok("sentinel") => FeelingFallback::Sentinel,
            Ok("neutral") | Err(_) => FeelingFallback::NeutralLabel,
            Ok(other) => {
                warn!("unknown FEELING_FALLBACK value {other:?}, using neutral label");
                FeelingFallback::NeutralLabel
            }
        };

        Ok(Self {
            garmin_access_token,
            telegram_token,
            language,
            http_port,
            feeling_fallback,
        })
    }
}
