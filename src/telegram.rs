// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Telegram delivery.
//!
//! A thin sink for rendered reports. Messages go out with Markdown
//! formatting first; when Telegram rejects the formatting (it is strict
//! about unbalanced markup) the same text is retried once without a parse
//! mode so the report still arrives, just unstyled.

use anyhow::{bail, Result};
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{info, warn};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

pub struct TelegramClient {
    client: Client,
    api_base: String,
    bot_token: String,
}

impl TelegramClient {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self::with_api_base(TELEGRAM_API_BASE, bot_token)
    }

    /// Point the client at a different API base; used by tests.
    pub fn with_api_base(api_base: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            bot_token: bot_token.into(),
        }
    }

    /// Deliver a message to a chat, falling back to plain text when the
    /// Markdown variant is rejected.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let status = self.post_message(chat_id, text, Some("Markdown")).await?;
        if status.is_success() {
            return Ok(());
        }
        if !status.is_client_error() {
            bail!("Telegram send failed with status {status}");
        }

        warn!(
            chat.id = chat_id,
            "Markdown message rejected ({status}), retrying as plain text"
        );
        let status = self.post_message(chat_id, text, None).await?;
        if !status.is_success() {
            bail!("Telegram plain-text retry failed with status {status}");
        }
        info!(chat.id = chat_id, "message delivered without formatting");
        Ok(())
    }

    async fn post_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<StatusCode> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let mut payload = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(mode) = parse_mode {
            payload["parse_mode"] = json!(mode);
        }

        let response = self.client.post(&url).json(&payload).send().await?;
        Ok(response.status())
    }
}
