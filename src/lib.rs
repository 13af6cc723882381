// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Garmin Report Bot
//!
//! A Telegram webhook bot that fetches activity data from Garmin Connect
//! and renders it as formatted chat reports.
//!
//! ## Features
//!
//! - **Metrics normalization**: reconciles inconsistently-shaped Garmin
//!   payloads into one flat, display-ready metrics record
//! - **Report rendering**: multi-section text reports with a compact lap
//!   table, in Spanish or English
//! - **Telegram delivery**: Markdown messages with a plain-text fallback
//!   when Telegram rejects the formatting
//! - **Resilient by default**: missing or malformed upstream fields render
//!   as sentinels, never as errors
//!
//! ## Architecture
//!
//! Two pure components form the core, with I/O pushed to the edges:
//! - **Normalizer**: three raw documents in, one [`report::MetricsRecord`] out
//! - **Renderer**: a metrics record plus a locale table in, report text out
//!
//! Everything else is a collaborator: the Garmin provider supplies the raw
//! documents, the Telegram client delivers the rendered text, and the
//! webhook route wires them together one request at a time.
//!
//! ## Example Usage
//!
//! ```rust
//! use garmin_report_bot::models::RawActivity;
//! use garmin_report_bot::report::{build_report, FeelingFallback, LocaleTable, TableStyle};
//! use serde_json::json;
//!
//! let detail = json!({
//!     "activityTypeDTO": {"typeKey": "running"},
//!     "summaryDTO": {"distance": 5000.0, "duration": 1500.0, "averageSpeed": 3.33}
//! });
//! let activity = RawActivity::from_value(&detail)?;
//! let report = build_report(
//!     &activity,
//!     &[],
//!     None,
//!     &LocaleTable::default(),
//!     FeelingFallback::default(),
//!     TableStyle::Monospace,
//! );
//! assert!(report.contains("running"));
//! # Ok::<(), garmin_report_bot::models::DocumentError>(())
//! ```

/// Typed shapes for the raw upstream documents
pub mod models;

/// Metrics normalization and report rendering
pub mod report;

/// Upstream fitness-data providers
pub mod providers;

/// Telegram message delivery
pub mod telegram;

/// Webhook routes
pub mod routes;

/// Environment-based configuration
pub mod config;

/// Structured logging setup
pub mod logging;
