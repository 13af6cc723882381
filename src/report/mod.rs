// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Report Pipeline
//!
//! The core of the bot: normalize three raw Garmin documents into a flat
//! [`MetricsRecord`](normalizer::MetricsRecord), then render it as a
//! formatted text report. Both halves are pure; all I/O lives in the
//! provider and transport collaborators.

pub mod locale;
pub mod normalizer;
pub mod renderer;

pub use locale::LocaleTable;
pub use normalizer::{normalize, FeelingFallback, LapMetrics, MetricValue, MetricsRecord};
pub use renderer::{render, TableStyle};

use crate::models::{RawActivity, RawSplits, RawZoneEntry};

/// Convenience wrapper running the whole pipeline in one call.
pub fn build_report(
    activity: &RawActivity,
    zones: &[RawZoneEntry],
    splits: Option<&RawSplits>,
    locale: &LocaleTable,
    feeling_fallback: FeelingFallback,
    style: TableStyle,
) -> String {
    let metrics = normalize(activity, zones, splits, locale, feeling_fallback);
    render(&metrics, locale, style)
}
