// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Garmin Report Bot Server Binary
//!
//! Starts the Telegram webhook server: loads configuration from the
//! environment, builds the Garmin and Telegram clients, and serves until
//! stopped.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use garmin_report_bot::{
    config::BotConfig,
    logging,
    providers::garmin::GarminClient,
    report::LocaleTable,
    routes::{self, WebhookHandler},
    telegram::TelegramClient,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "garmin-report-bot")]
#[command(about = "Telegram webhook bot rendering Garmin activity reports")]
pub struct Args {
    /// Port to listen on (overrides HTTP_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Report language code (overrides BOT_LANGUAGE)
    #[arg(short, long)]
    language: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_from_env()?;

    let args = Args::parse();
    let config = BotConfig::from_env()?;

    let port = args.port.unwrap_or(config.http_port);
    let language = args.language.unwrap_or_else(|| config.language.clone());
    let locale = LocaleTable::builtin(&language)
        .with_context(|| format!("Unsupported report language: {language}"))?;

    let mut garmin = GarminClient::new();
    garmin.authenticate(config.garmin_access_token.clone());
    let telegram = TelegramClient::new(config.telegram_token.clone());

    let handler = WebhookHandler::new(
        Arc::new(garmin),
        Arc::new(telegram),
        locale,
        config.feeling_fallback,
    );

    info!("🚀 Webhook server starting on port {port}");
    info!("📊 Ready to serve activity reports in '{language}'");
    routes::serve(handler, port).await;

    Ok(())
}
