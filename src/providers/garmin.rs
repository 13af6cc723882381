// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Garmin Connect client.
//!
//! Fetches the activity list and, per activity, the three documents the
//! report pipeline needs. Authentication flows are out of scope: the
//! client takes a pre-established session token and sends it as a bearer
//! header. Zone and split fetch failures degrade to absent documents; the
//! activity detail itself is the only hard requirement.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ActivityDocuments, FitnessDataSource};

const GARMIN_API_BASE: &str = "https://connectapi.garmin.com";

pub struct GarminClient {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl GarminClient {
    pub fn new() -> Self {
        Self::with_base_url(GARMIN_API_BASE)
    }

    /// Point the client at a different API base; used by tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            access_token: None,
        }
    }

    /// Attach a pre-established session token.
    pub fn authenticate(&mut self, access_token: impl Into<String>) {
        self.access_token = Some(access_token.into());
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let token = self.access_token.as_ref().context("Not authenticated")?;
        let value = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }

    /// Resolve the index-th most recent activity to its id.
    async fn activity_id_at(&self, index: usize) -> Result<Option<u64>> {
        let list = self
            .get_json(&format!(
                "/activitylist-service/activities/search/activities?start={index}&limit=1"
            ))
            .await
            .context("Failed to fetch activity list")?;

        Ok(list
            .as_array()
            .and_then(|a| a.first())
            .and_then(|entry| entry.get("activityId"))
            .and_then(Value::as_u64))
    }
}

impl Default for GarminClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FitnessDataSource for GarminClient {
    async fn fetch_activity_documents(&self, index: usize) -> Result<Option<ActivityDocuments>> {
        let Some(activity_id) = self.activity_id_at(index).await? else {
            return Ok(None);
        };
        debug!("resolved activity index {index} to id {activity_id}");

        let detail = self
            .get_json(&format!("/activity-service/activity/{activity_id}"))
            .await
            .with_context(|| format!("Failed to fetch activity {activity_id}"))?;

        // Sub-document failures are expected for some activity types and
        // must not sink the report.
        let zones = match self
            .get_json(&format!(
                "/activity-service/activity/{activity_id}/hrTimeInZones"
            ))
            .await
        {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("zone fetch failed for activity {activity_id}: {e}");
                None
            }
        };
        let splits = match self
            .get_json(&format!("/activity-service/activity/{activity_id}/splits"))
            .await
        {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("split fetch failed for activity {activity_id}: {e}");
                None
            }
        };

        Ok(Some(ActivityDocuments {
            detail,
            zones,
            splits,
        }))
    }
}
