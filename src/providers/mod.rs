// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Upstream fitness-data providers.
//!
//! The report core treats the upstream platform as an opaque source of
//! semi-structured documents; this module defines that seam. The webhook
//! handler depends only on [`FitnessDataSource`], so tests substitute a
//! fake source without any HTTP.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

pub mod garmin;

/// The three documents the report pipeline consumes for one activity.
///
/// `zones` and `splits` are `None` when their fetch failed or returned
/// nothing; the normalizer tolerates both.
#[derive(Debug, Clone)]
pub struct ActivityDocuments {
    /// Activity detail, summary included. Always present.
    pub detail: Value,
    /// Heart-rate time-in-zone breakdown.
    pub zones: Option<Value>,
    /// Lap/split breakdown.
    pub splits: Option<Value>,
}

/// An upstream source of activity documents.
#[async_trait]
pub trait FitnessDataSource: Send + Sync {
    /// Fetch the documents for the index-th most recent activity.
    ///
    /// Returns `Ok(None)` when no activity exists at that index. Failures
    /// fetching the zone or split sub-documents are absorbed into `None`
    /// fields; only a failure on the activity itself is an error.
    async fn fetch_activity_documents(&self, index: usize) -> Result<Option<ActivityDocuments>>;
}
