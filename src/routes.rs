// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Telegram webhook dispatch.
//!
//! One route: Telegram posts an update, the handler parses the message
//! text as an activity index and runs fetch → normalize → render →
//! deliver. Collaborator failures become chat-visible error text; the
//! webhook itself always answers 200 so Telegram does not re-deliver.

use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, error, info};
use warp::Filter;

use crate::models::{RawActivity, RawSplits, RawZoneEntry};
use crate::providers::FitnessDataSource;
use crate::report::{normalize, render, FeelingFallback, LocaleTable, TableStyle};
use crate::telegram::TelegramClient;

/// Incoming Telegram update. Only the message subset the bot reads.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub chat: ChatRef,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRef {
    pub id: i64,
}

/// Webhook handler tying the data source, the report pipeline, and the
/// chat transport together.
pub struct WebhookHandler<S> {
    source: Arc<S>,
    telegram: Arc<TelegramClient>,
    locale: LocaleTable,
    feeling_fallback: FeelingFallback,
}

impl<S> Clone for WebhookHandler<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            telegram: Arc::clone(&self.telegram),
            locale: self.locale.clone(),
            feeling_fallback: self.feeling_fallback,
        }
    }
}

impl<S: FitnessDataSource> WebhookHandler<S> {
    pub fn new(
        source: Arc<S>,
        telegram: Arc<TelegramClient>,
        locale: LocaleTable,
        feeling_fallback: FeelingFallback,
    ) -> Self {
        Self {
            source,
            telegram,
            locale,
            feeling_fallback,
        }
    }

    /// Process one Telegram update end to end.
    ///
    /// Never fails outward: non-command updates are ignored and every
    /// error is reported to the chat instead of the webhook response.
    pub async fn handle_update(&self, update: TelegramUpdate) {
        let Some(message) = update.message else {
            // Status updates, edits, joins: acknowledged and ignored.
            return;
        };
        let chat_id = message.chat.id;
        let text = message.text.unwrap_or_default();
        let Ok(index) = text.trim().parse::<usize>() else {
            debug!(chat.id = chat_id, "ignoring non-numeric message");
            return;
        };

        info!(chat.id = chat_id, index, "activity report requested");
        self.notify(chat_id, self.locale.text("chat.processing")).await;

        match self.run_report(index).await {
            Ok(Some(report)) => {
                self.notify(chat_id, &report).await;
                info!(chat.id = chat_id, index, "report delivered");
            }
            Ok(None) => {
                self.notify(chat_id, self.locale.text("chat.not_found")).await;
            }
            Err(e) => {
                error!(chat.id = chat_id, index, "report failed: {e:#}");
                let text = format!("{}: {e}", self.locale.text("chat.error"));
                self.notify(chat_id, &text).await;
            }
        }
    }

    /// Fetch the three documents and run the report pipeline.
    async fn run_report(&self, index: usize) -> Result<Option<String>> {
        let Some(docs) = self.source.fetch_activity_documents(index).await? else {
            return Ok(None);
        };

        let activity = RawActivity::from_value(&docs.detail)?;
        let zones = docs
            .zones
            .map(|v| RawZoneEntry::list_from_value(&v))
            .unwrap_or_default();
        let splits = docs.splits.map(|v| RawSplits::from_value(&v));

        let metrics = normalize(
            &activity,
            &zones,
            splits.as_ref(),
            &self.locale,
            self.feeling_fallback,
        );
        debug!(laps = metrics.laps.len(), "metrics normalized");
        Ok(Some(render(&metrics, &self.locale, TableStyle::Monospace)))
    }

    /// Best-effort delivery; a transport failure must not sink the webhook.
    async fn notify(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.telegram.send_message(chat_id, text).await {
            error!(chat.id = chat_id, "Telegram delivery failed: {e:#}");
        }
    }
}

/// Build the warp filter: the webhook endpoint plus a health check.
pub fn webhook_filter<S>(
    handler: WebhookHandler<S>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
where
    S: FitnessDataSource + Send + Sync + 'static,
{
    let webhook = warp::path("webhook")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(move |update: TelegramUpdate| {
            let handler = handler.clone();
            async move {
                handler.handle_update(update).await;
                Ok::<_, warp::Rejection>(warp::reply::with_status(
                    "OK",
                    warp::http::StatusCode::OK,
                ))
            }
        });

    let health = warp::path("health").and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "status": "ok",
            "service": "garmin-report-bot"
        }))
    });

    webhook.or(health)
}

/// Serve the webhook until the process is stopped.
pub async fn serve<S>(handler: WebhookHandler<S>, port: u16)
where
    S: FitnessDataSource + Send + Sync + 'static,
{
    info!("webhook server ready on port {port}");
    warp::serve(webhook_filter(handler))
        .run(([0, 0, 0, 0], port))
        .await;
}
