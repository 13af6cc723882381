// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Report rendering: one [`MetricsRecord`] plus a locale table in, one
//! formatted text report out.
//!
//! Pure and deterministic. Sentinel values pass through verbatim; the
//! renderer never fails on missing data. All labels and units come from
//! the locale table so adding a language never touches this module.

use std::fmt::Write as _;

use crate::report::locale::LocaleTable;
use crate::report::normalizer::{LapMetrics, MetricsRecord};

/// How the lap table is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableStyle {
    /// Fixed-width columns inside a code fence, for transports that
    /// render monospace blocks (Telegram Markdown does).
    #[default]
    Monospace,
    /// Plain pipe-delimited rows for transports that do not.
    Delimited,
}

/// Render the full multi-section report.
pub fn render(metrics: &MetricsRecord, locale: &LocaleTable, style: TableStyle) -> String {
    let mut out = String::new();

    // Header
    let _ = writeln!(
        out,
        "# 🏃 {}: {}",
        locale.text("report.title"),
        metrics.activity_type
    );
    let _ = writeln!(out, "📅 {}", metrics.timestamp);
    let _ = writeln!(out, "📍 {}", metrics.location);
    out.push('\n');

    // Main stats
    let _ = writeln!(out, "⏱️ *{}*", locale.text("section.main"));
    let _ = writeln!(
        out,
        "{}: {} m | {}: {}",
        locale.text("label.distance"),
        metrics.distance,
        locale.text("label.time"),
        metrics.duration
    );
    let _ = writeln!(
        out,
        "{}: {}/km | {}: {}/km",
        locale.text("label.pace"),
        metrics.pace,
        locale.text("label.gap"),
        metrics.grade_adjusted_pace
    );
    let _ = writeln!(
        out,
        "{}: {} km/h | {}: {} m",
        locale.text("label.speed"),
        metrics.speed_kmh,
        locale.text("label.ascent"),
        metrics.elevation_gain
    );
    out.push('\n');

    // Cardio & load
    let _ = writeln!(out, "❤️ *{}*", locale.text("section.cardio"));
    let _ = writeln!(
        out,
        "{}: {} / {} {}",
        locale.text("label.hr"),
        metrics.heart_rate_avg,
        metrics.heart_rate_max,
        locale.text("unit.bpm")
    );
    let _ = writeln!(
        out,
        "{}: {} / {} | {}: {}",
        locale.text("label.training_effect"),
        metrics.training_effect_aerobic,
        metrics.training_effect_anaerobic,
        locale.text("label.load"),
        metrics.training_load
    );
    let _ = writeln!(out, "*{}:*", locale.text("section.zones"));
    let _ = writeln!(out, "{}", metrics.zones_text);
    out.push('\n');

    // Efficiency
    let _ = writeln!(out, "⚡ *{}*", locale.text("section.efficiency"));
    let _ = writeln!(
        out,
        "{}: {} | {}: {} W | {}: {}",
        locale.text("label.ef"),
        metrics.efficiency_factor,
        locale.text("label.power"),
        metrics.power,
        locale.text("label.calories"),
        metrics.calories
    );
    out.push('\n');

    // Running dynamics
    let _ = writeln!(out, "👟 *{}*", locale.text("section.dynamics"));
    let _ = writeln!(
        out,
        "{}: {} | {}: {} cm",
        locale.text("label.cadence"),
        metrics.cadence_avg,
        locale.text("label.stride"),
        metrics.stride_length
    );
    let _ = writeln!(
        out,
        "{}: {} ms | {}: {} cm ({}%)",
        locale.text("label.gct"),
        metrics.ground_contact_time,
        locale.text("label.vertical_osc"),
        metrics.vertical_oscillation,
        metrics.vertical_ratio
    );
    out.push('\n');

    // Lap table
    let _ = writeln!(out, "📊 *{}*", locale.text("section.splits"));
    out.push_str(&lap_table(&metrics.laps, locale, style));
    out.push('\n');

    // Footer
    let _ = write!(
        out,
        "{}: {}/10 | {}: {}",
        locale.text("label.rpe"),
        metrics.rpe,
        locale.text("label.feeling"),
        metrics.feeling
    );

    out
}

/// Render the compact lap table on its own.
pub fn lap_table(laps: &[LapMetrics], locale: &LocaleTable, style: TableStyle) -> String {
    match style {
        TableStyle::Monospace => monospace_table(laps, locale),
        TableStyle::Delimited => delimited_table(laps, locale),
    }
}

/// Column widths for the monospace layout.
const COLUMN_WIDTHS: [usize; 8] = [3, 6, 6, 6, 4, 4, 4, 5];

fn header_labels(locale: &LocaleTable) -> [&str; 8] {
    [
        locale.text("table.lap"),
        locale.text("table.km"),
        locale.text("table.pace"),
        locale.text("table.gap"),
        locale.text("table.hr"),
        locale.text("table.cadence"),
        locale.text("table.gct"),
        locale.text("table.ef"),
    ]
}

fn lap_cells(lap: &LapMetrics) -> [String; 8] {
    [
        lap.number.to_string(),
        format!("{:.2}", lap.distance_meters / 1000.0),
        lap.pace.clone(),
        lap.grade_adjusted_pace.clone(),
        lap.heart_rate_avg.to_string(),
        lap.cadence.to_string(),
        lap.ground_contact_time.to_string(),
        lap.efficiency_factor.clone(),
    ]
}

fn monospace_table(laps: &[LapMetrics], locale: &LocaleTable) -> String {
    let mut out = String::from("```\n");
    for (label, width) in header_labels(locale).iter().zip(COLUMN_WIDTHS) {
        let _ = write!(out, "{label:>width$} ");
    }
    out.push('\n');
    for lap in laps {
        for (cell, width) in lap_cells(lap).iter().zip(COLUMN_WIDTHS) {
            let _ = write!(out, "{cell:>width$} ");
        }
        out.push('\n');
    }
    out.push_str("```\n");
    out
}

fn delimited_table(laps: &[LapMetrics], locale: &LocaleTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "| {} |", header_labels(locale).join(" | "));
    for lap in laps {
        let _ = writeln!(out, "| {} |", lap_cells(lap).join(" | "));
    }
    out
}
