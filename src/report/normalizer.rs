// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Metrics normalization: three raw Garmin documents in, one flat
//! display-ready [`MetricsRecord`] out.
//!
//! The normalizer never fails. Every field lookup has a fallback: missing
//! or malformed values surface as the `-` sentinel (`__` for RPE), laps
//! and zones degrade to empty, and the record is always complete.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::models::{ConnectIqMeasurement, RawActivity, RawSplit, RawSplits, RawZoneEntry};
use crate::report::locale::LocaleTable;

/// ConnectIQ application that publishes the Efficiency Factor field.
pub const EF_APP_ID: &str = "e9f83886-2e1d-448e-aa0a-0cdfb9160df9";
/// Developer field number of the activity-level EF value.
pub const EF_FIELD_GLOBAL: i64 = 2;
/// Developer field number of the per-lap EF value.
pub const EF_FIELD_LAP: i64 = 1;

/// Display sentinel for a missing or malformed value.
pub const MISSING: &str = "-";
/// Display sentinel for a missing RPE, kept visually distinct on purpose.
pub const MISSING_RPE: &str = "__";

const LAP_MIN_DISTANCE_METERS: f64 = 10.0;
const LAP_MIN_DURATION_SECS: f64 = 10.0;
/// Tolerance for dropping the duplicate whole-activity row some payloads
/// append to the split-summary list. Tunable, not load-bearing.
const WHOLE_ACTIVITY_TOLERANCE_SECS: f64 = 2.0;

const FEELING_BREAKPOINTS: [u8; 5] = [0, 25, 50, 75, 100];

/// What a missing feeling value maps to.
///
/// The source history is inconsistent here: some revisions default to the
/// neutral label, others to a sentinel. Both behaviors are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeelingFallback {
    /// Map a missing feeling to the locale's neutral label.
    #[default]
    NeutralLabel,
    /// Map a missing feeling to the `-` sentinel.
    Sentinel,
}

/// A display-ready metric value: a rounded number or the `-` sentinel.
///
/// Floats carry their display precision so rendering and serialization
/// never re-expose an unrounded value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Int(i64),
    Float(f64, u8),
    Text(String),
}

impl MetricValue {
    pub fn missing() -> Self {
        MetricValue::Text(MISSING.to_string())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, MetricValue::Text(t) if t == MISSING)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{v}"),
            MetricValue::Float(v, precision) => write!(f, "{:.*}", *precision as usize, v),
            MetricValue::Text(t) => f.write_str(t),
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Int(v) => serializer.serialize_i64(*v),
            MetricValue::Float(v, _) => serializer.serialize_f64(*v),
            MetricValue::Text(t) => serializer.serialize_str(t),
        }
    }
}

/// Flat, display-ready metrics for one activity.
///
/// Constructed fresh per request, consumed by the renderer, discarded.
/// Serializable so collaborators that want raw values instead of text
/// (a future JSON API, say) can take it as-is.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsRecord {
    pub timestamp: String,
    pub location: String,
    pub activity_type: String,
    /// Distance in meters, 2 decimals.
    pub distance: MetricValue,
    /// Total duration formatted `MM:SS` / `H:MM:SS`.
    pub duration: String,
    /// Raw duration in seconds, kept for zone percentages and consumers
    /// that want the unformatted value.
    pub duration_seconds: f64,
    pub pace: String,
    pub grade_adjusted_pace: String,
    /// Average speed in km/h, 2 decimals.
    pub speed_kmh: MetricValue,
    pub heart_rate_avg: MetricValue,
    pub heart_rate_max: MetricValue,
    pub training_effect_aerobic: MetricValue,
    pub training_effect_anaerobic: MetricValue,
    pub training_load: MetricValue,
    pub calories: MetricValue,
    pub cadence_avg: MetricValue,
    pub cadence_max: MetricValue,
    pub stride_length: MetricValue,
    pub vertical_ratio: MetricValue,
    pub vertical_oscillation: MetricValue,
    pub ground_contact_time: MetricValue,
    pub power: MetricValue,
    pub elevation_gain: MetricValue,
    /// RPE on the 0-10 scale, or `__` when not reported.
    pub rpe: String,
    pub feeling: String,
    /// Activity-level Efficiency Factor, formatted to 2 decimals.
    pub efficiency_factor: String,
    /// Pre-rendered zone breakdown block, one line per non-empty zone.
    pub zones_text: String,
    pub laps: Vec<LapMetrics>,
}

/// One retained lap, renumbered after filtering.
#[derive(Debug, Clone, Serialize)]
pub struct LapMetrics {
    /// 1-based, contiguous over retained laps; never the source index.
    pub number: usize,
    /// Raw lap distance in meters; the renderer converts to km.
    pub distance_meters: f64,
    pub pace: String,
    pub pace_max: String,
    pub grade_adjusted_pace: String,
    pub heart_rate_avg: MetricValue,
    pub heart_rate_max: MetricValue,
    pub cadence: MetricValue,
    pub ground_contact_time: MetricValue,
    pub vertical_ratio: MetricValue,
    pub elevation_gain: MetricValue,
    pub efficiency_factor: String,
}

/// Normalize the three raw documents into one flat metrics record.
///
/// `zones` and `splits` may be empty/absent; the caller is expected to have
/// converted upstream fetch failures into exactly that.
pub fn normalize(
    activity: &RawActivity,
    zones: &[RawZoneEntry],
    splits: Option<&RawSplits>,
    locale: &LocaleTable,
    feeling_fallback: FeelingFallback,
) -> MetricsRecord {
    let s = &activity.summary;
    let total_duration = s.duration;

    MetricsRecord {
        timestamp: s
            .start_time_local
            .as_deref()
            .map_or_else(|| MISSING.to_string(), format_timestamp),
        location: location_string(activity, locale),
        activity_type: activity
            .activity_type
            .type_key
            .clone()
            .unwrap_or_else(|| MISSING.to_string()),
        distance: safe_round(s.distance, 2),
        duration: format_time(total_duration),
        duration_seconds: total_duration.unwrap_or(0.0),
        pace: format_pace(s.average_speed),
        grade_adjusted_pace: format_pace(s.avg_grade_adjusted_speed),
        speed_kmh: safe_round(s.average_speed.map(|v| v * 3.6), 2),
        heart_rate_avg: safe_round(s.average_hr, 0),
        heart_rate_max: safe_round(s.max_hr, 0),
        training_effect_aerobic: safe_round(s.training_effect, 1),
        training_effect_anaerobic: safe_round(s.anaerobic_training_effect, 1),
        training_load: safe_round(s.activity_training_load, 0),
        calories: safe_round(s.calories, 0),
        cadence_avg: safe_round(s.average_run_cadence, 0),
        cadence_max: safe_round(s.max_run_cadence, 0),
        stride_length: safe_round(s.stride_length, 0),
        vertical_ratio: safe_round(s.vertical_ratio, 1),
        vertical_oscillation: safe_round(s.vertical_oscillation, 1),
        ground_contact_time: safe_round(s.ground_contact_time, 0),
        power: safe_round(s.average_power, 0),
        elevation_gain: safe_round(s.elevation_gain, 0),
        rpe: format_rpe(s.direct_workout_rpe),
        feeling: feeling_label(s.direct_workout_feel, locale, feeling_fallback),
        efficiency_factor: format_ef(connect_iq_value(
            activity.connect_iq(),
            EF_FIELD_GLOBAL,
        )),
        zones_text: zone_breakdown(zones, total_duration, locale),
        laps: build_laps(resolve_lap_source(activity, splits), total_duration),
    }
}

/// Reformat the upstream local timestamp (`2026-08-20T07:31:02`, with an
/// optional fractional part) for display. A timestamp that does not parse
/// passes through with the `T` separator replaced.
fn format_timestamp(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.replace('T', " "))
}

/// Format a speed in m/s as a `MM:SS` pace per kilometer.
///
/// Zero, negative, and missing speeds yield the sentinel. Minutes are not
/// modulo-wrapped: a crawl renders as `99`-plus minutes, not a clock wrap.
pub fn format_pace(speed_mps: Option<f64>) -> String {
    match speed_mps {
        Some(v) if v > 0.0 => {
            let secs_per_km = 1000.0 / v;
            let minutes = (secs_per_km / 60.0) as u64;
            let seconds = (secs_per_km % 60.0) as u64;
            format!("{minutes:02}:{seconds:02}")
        }
        _ => MISSING.to_string(),
    }
}

/// Format a duration in seconds as `MM:SS`, or `H:MM:SS` from the hour up.
/// Zero or missing input renders as `00:00`.
pub fn format_time(seconds: Option<f64>) -> String {
    let total = match seconds {
        Some(v) if v > 0.0 => v as u64,
        _ => return "00:00".to_string(),
    };
    let minutes = total / 60;
    let secs = total % 60;
    if minutes >= 60 {
        format!("{}:{:02}:{:02}", minutes / 60, minutes % 60, secs)
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Round to the requested precision, or the sentinel when absent.
/// Zero decimals produce an integer, not a `x.0` float.
pub fn safe_round(value: Option<f64>, decimals: u8) -> MetricValue {
    match value {
        Some(v) if v.is_finite() => {
            if decimals == 0 {
                MetricValue::Int(v.round() as i64)
            } else {
                let factor = 10f64.powi(i32::from(decimals));
                MetricValue::Float((v * factor).round() / factor, decimals)
            }
        }
        _ => MetricValue::missing(),
    }
}

/// RPE arrives on a 0-100 scale meaning 0-10 in tenths. Unreported RPE
/// (absent or zero) gets its own two-character sentinel.
fn format_rpe(raw: Option<f64>) -> String {
    match raw {
        Some(v) if v > 0.0 => ((v / 10.0).round() as i64).to_string(),
        _ => MISSING_RPE.to_string(),
    }
}

/// Map a raw 0-100 feeling to the nearest breakpoint's locale label.
/// Ties resolve toward the lower breakpoint: `min_by` keeps the first of
/// equally-distant candidates and the breakpoints iterate ascending.
fn feeling_label(raw: Option<f64>, locale: &LocaleTable, fallback: FeelingFallback) -> String {
    match raw {
        Some(v) => {
            let nearest = FEELING_BREAKPOINTS
                .iter()
                .copied()
                .min_by(|a, b| {
                    let da = (f64::from(*a) - v).abs();
                    let db = (f64::from(*b) - v).abs();
                    da.partial_cmp(&db).unwrap_or(Ordering::Equal)
                })
                .unwrap_or(50);
            locale.feeling_label(nearest).to_string()
        }
        None => match fallback {
            FeelingFallback::NeutralLabel => locale.neutral_feeling().to_string(),
            FeelingFallback::Sentinel => MISSING.to_string(),
        },
    }
}

/// Format an Efficiency Factor value. Display-string-typed by contract:
/// always 2 decimals, never a bare number.
fn format_ef(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.2}"))
}

/// Find the EF value in a ConnectIQ measurement list by the fixed app id
/// and a developer field number.
fn connect_iq_value(measurements: &[ConnectIqMeasurement], field_number: i64) -> Option<f64> {
    measurements
        .iter()
        .find(|m| {
            m.app_id.as_deref() == Some(EF_APP_ID)
                && m.developer_field_number.map(|n| n as i64) == Some(field_number)
        })
        .and_then(|m| m.value)
}

/// Location with an elevation annotation when both bounds are known:
/// a single `(<max> m)` when the spread is under 5 m, a range otherwise.
fn location_string(activity: &RawActivity, locale: &LocaleTable) -> String {
    let name = activity
        .location_name
        .clone()
        .unwrap_or_else(|| locale.text("location.unknown").to_string());
    match (activity.summary.min_elevation, activity.summary.max_elevation) {
        (Some(min), Some(max)) => {
            let min = min.round() as i64;
            let max = max.round() as i64;
            if (max - min).abs() < 5 {
                format!("{name} ({max} m)")
            } else {
                format!("{name} ({min}-{max} m)")
            }
        }
        _ => name,
    }
}

/// Pre-render the heart-rate-zone block, one line per zone with time in it.
///
/// Zones sort ascending by number; each zone's display range ends one unit
/// below the next zone's low boundary, and the last zone is open-ended.
fn zone_breakdown(
    zones: &[RawZoneEntry],
    total_duration: Option<f64>,
    locale: &LocaleTable,
) -> String {
    let mut sorted: Vec<&RawZoneEntry> = zones.iter().collect();
    sorted.sort_by_key(|z| z.zone_number);

    let bpm = locale.text("unit.bpm");
    let mut lines = Vec::new();
    for (i, zone) in sorted.iter().enumerate() {
        let secs = zone.secs_in_zone.unwrap_or(0.0);
        if secs <= 0.0 {
            continue;
        }
        let low = zone.zone_low_boundary.unwrap_or(0.0) as i64;
        let range = match sorted.get(i + 1) {
            Some(next) => {
                let next_low = next.zone_low_boundary.unwrap_or(0.0) as i64;
                format!("{low}-{} {bpm}", next_low - 1)
            }
            None => format!(">{low} {bpm}"),
        };
        let pct = match total_duration {
            Some(d) if d > 0.0 => secs / d * 100.0,
            _ => 0.0,
        };
        lines.push(format!(
            "  * Z{} ({range}): {pct:.0}% ({})",
            zone.zone_number,
            format_time(Some(secs))
        ));
    }

    if lines.is_empty() {
        locale.text("zones.empty").to_string()
    } else {
        lines.join("\n")
    }
}

/// Which of the three possible shapes supplied the lap list.
///
/// Resolved once by strict first-match-wins precedence; never merged.
#[derive(Debug)]
enum LapSource<'a> {
    /// Lap details from the splits document (`lapDTOs`).
    LapDetails(&'a [RawSplit]),
    /// Lap list embedded in the activity detail.
    EmbeddedLaps(&'a [RawSplit]),
    /// Generic split summaries from the activity detail.
    SplitSummaries(&'a [RawSplit]),
}

fn resolve_lap_source<'a>(
    activity: &'a RawActivity,
    splits: Option<&'a RawSplits>,
) -> LapSource<'a> {
    if let Some(doc) = splits {
        if !doc.lap_dtos.is_empty() {
            return LapSource::LapDetails(&doc.lap_dtos);
        }
    }
    if !activity.laps.is_empty() {
        return LapSource::EmbeddedLaps(&activity.laps);
    }
    LapSource::SplitSummaries(&activity.split_summaries)
}

/// Filter and renumber the lap list.
///
/// A split is dropped only when it is short in both distance and duration.
/// The split-summary source additionally drops a row whose duration is
/// within tolerance of the whole activity, a duplicate some payloads
/// append; that heuristic never applies to the other two sources.
fn build_laps(source: LapSource<'_>, total_duration: Option<f64>) -> Vec<LapMetrics> {
    let (splits, drop_whole_activity_row) = match source {
        LapSource::LapDetails(s) | LapSource::EmbeddedLaps(s) => (s, false),
        LapSource::SplitSummaries(s) => (s, s.len() > 1),
    };

    let mut laps = Vec::new();
    for split in splits {
        let distance = split.distance.unwrap_or(0.0);
        let duration = split.duration.unwrap_or(0.0);
        if distance < LAP_MIN_DISTANCE_METERS && duration < LAP_MIN_DURATION_SECS {
            continue;
        }
        if drop_whole_activity_row {
            if let Some(total) = total_duration {
                if (duration - total).abs() < WHOLE_ACTIVITY_TOLERANCE_SECS {
                    continue;
                }
            }
        }

        laps.push(LapMetrics {
            number: laps.len() + 1,
            distance_meters: distance,
            pace: format_pace(split.average_speed),
            pace_max: format_pace(split.max_speed),
            grade_adjusted_pace: format_pace(split.avg_grade_adjusted_speed),
            heart_rate_avg: safe_round(split.average_hr, 0),
            heart_rate_max: safe_round(split.max_hr, 0),
            cadence: safe_round(split.average_run_cadence, 0),
            ground_contact_time: safe_round(split.ground_contact_time, 0),
            vertical_ratio: safe_round(split.vertical_ratio, 1),
            elevation_gain: safe_round(split.elevation_gain, 0),
            efficiency_factor: format_ef(connect_iq_value(split.connect_iq(), EF_FIELD_LAP)),
        });
    }
    laps
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn locale() -> LocaleTable {
        LocaleTable::default()
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp("2026-08-20T07:31:02"),
            "2026-08-20 07:31:02"
        );
        // Fractional seconds are dropped.
        assert_eq!(
            format_timestamp("2026-08-20T07:31:02.0"),
            "2026-08-20 07:31:02"
        );
        // Unparseable input passes through, separator swapped.
        assert_eq!(format_timestamp("yesterdayTnoon"), "yesterday noon");
    }

    #[test]
    fn test_format_pace() {
        assert_eq!(format_pace(None), "-");
        assert_eq!(format_pace(Some(0.0)), "-");
        assert_eq!(format_pace(Some(-1.0)), "-");
        // 1000 m in 60 s => 1 min/km
        assert_eq!(format_pace(Some(1000.0 / 60.0)), "01:00");
        // 3.0 m/s => 333.3 s/km => 05:33
        assert_eq!(format_pace(Some(3.0)), "05:33");
        // Very slow speeds are not modulo-wrapped.
        assert_eq!(format_pace(Some(0.1)), "166:40");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(None), "00:00");
        assert_eq!(format_time(Some(0.0)), "00:00");
        assert_eq!(format_time(Some(65.0)), "01:05");
        assert_eq!(format_time(Some(3661.0)), "1:01:01");
        assert_eq!(format_time(Some(600.0)), "10:00");
    }

    #[test]
    fn test_safe_round() {
        assert_eq!(safe_round(None, 0), MetricValue::missing());
        assert_eq!(safe_round(Some(f64::NAN), 0), MetricValue::missing());
        assert_eq!(safe_round(Some(149.6), 0), MetricValue::Int(150));
        assert_eq!(safe_round(Some(4.27), 1), MetricValue::Float(4.3, 1));
        assert_eq!(safe_round(Some(4.27), 1).to_string(), "4.3");
        assert_eq!(safe_round(Some(12.0), 2).to_string(), "12.00");
    }

    #[test]
    fn test_rpe_scale_and_sentinel() {
        assert_eq!(format_rpe(None), "__");
        assert_eq!(format_rpe(Some(0.0)), "__");
        assert_eq!(format_rpe(Some(70.0)), "7");
        assert_eq!(format_rpe(Some(85.0)), "9");
    }

    #[test]
    fn test_feeling_nearest_breakpoint() {
        let l = locale();
        // 60 and 50 map to the same label.
        assert_eq!(
            feeling_label(Some(60.0), &l, FeelingFallback::NeutralLabel),
            feeling_label(Some(50.0), &l, FeelingFallback::NeutralLabel)
        );
        assert_eq!(
            feeling_label(Some(90.0), &l, FeelingFallback::NeutralLabel),
            "Muy Fuerte"
        );
    }

    #[test]
    fn test_feeling_tie_breaks_toward_lower_breakpoint() {
        // 37.5 is equidistant from 25 and 50; the lower key wins.
        let l = locale();
        assert_eq!(
            feeling_label(Some(37.5), &l, FeelingFallback::NeutralLabel),
            "Débil"
        );
    }

    #[test]
    fn test_feeling_fallback_policies() {
        let l = locale();
        assert_eq!(
            feeling_label(None, &l, FeelingFallback::NeutralLabel),
            "Normal"
        );
        assert_eq!(feeling_label(None, &l, FeelingFallback::Sentinel), "-");
    }

    #[test]
    fn test_connect_iq_ef_lookup() {
        let doc = json!({
            "connectIQMeasurements": [
                {"appID": "someone-else", "developerFieldNumber": 2, "value": 9.9},
                {"appID": EF_APP_ID, "developerFieldNumber": "2", "value": "1.87"},
                {"appID": EF_APP_ID, "developerFieldNumber": 1, "value": 1.5}
            ]
        });
        let activity = RawActivity::from_value(&doc).unwrap();
        assert_eq!(
            connect_iq_value(activity.connect_iq(), EF_FIELD_GLOBAL),
            Some(1.87)
        );
        assert_eq!(format_ef(Some(1.87)), "1.87");
        assert_eq!(format_ef(None), "-");
    }

    #[test]
    fn test_location_elevation_annotation() {
        let make = |min: f64, max: f64| {
            RawActivity::from_value(&json!({
                "locationName": "Collserola",
                "summaryDTO": {"minElevation": min, "maxElevation": max}
            }))
            .unwrap()
        };
        // Spread under 5 m collapses to the max.
        assert_eq!(
            location_string(&make(120.2, 123.9), &locale()),
            "Collserola (124 m)"
        );
        assert_eq!(
            location_string(&make(80.0, 240.0), &locale()),
            "Collserola (80-240 m)"
        );
    }

    #[test]
    fn test_location_fallbacks() {
        let no_elev = RawActivity::from_value(&json!({"locationName": "Parc"})).unwrap();
        assert_eq!(location_string(&no_elev, &locale()), "Parc");

        let empty = RawActivity::default();
        assert_eq!(
            location_string(&empty, &locale()),
            "Ubicación desconocida"
        );
    }

    #[test]
    fn test_zone_breakdown_ranges_and_percentages() {
        let zones = vec![
            RawZoneEntry {
                zone_number: 2,
                zone_low_boundary: Some(140.0),
                secs_in_zone: Some(300.0),
            },
            RawZoneEntry {
                zone_number: 1,
                zone_low_boundary: Some(100.0),
                secs_in_zone: Some(600.0),
            },
        ];
        let text = zone_breakdown(&zones, Some(900.0), &locale());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        // Sorted ascending despite arrival order; upper bound is the next
        // zone's boundary minus one; the last zone is open-ended.
        assert_eq!(lines[0], "  * Z1 (100-139 ppm): 67% (10:00)");
        assert_eq!(lines[1], "  * Z2 (>140 ppm): 33% (05:00)");
    }

    #[test]
    fn test_zone_breakdown_skips_empty_zones() {
        let zones = vec![
            RawZoneEntry {
                zone_number: 1,
                zone_low_boundary: Some(100.0),
                secs_in_zone: Some(0.0),
            },
            RawZoneEntry {
                zone_number: 2,
                zone_low_boundary: Some(140.0),
                secs_in_zone: Some(900.0),
            },
        ];
        let text = zone_breakdown(&zones, Some(900.0), &locale());
        assert!(!text.contains("Z1"));
        assert!(text.contains("Z2 (>140 ppm): 100%"));
    }

    #[test]
    fn test_zone_breakdown_empty_uses_locale_string() {
        assert_eq!(
            zone_breakdown(&[], Some(900.0), &locale()),
            "Sin datos de zonas."
        );
    }

    fn split(distance: f64, duration: f64) -> RawSplit {
        RawSplit {
            distance: Some(distance),
            duration: Some(duration),
            ..RawSplit::default()
        }
    }

    #[test]
    fn test_lap_filtering_requires_both_conditions() {
        let splits = vec![split(5.0, 5.0), split(5.0, 15.0), split(15.0, 5.0)];
        let laps = build_laps(LapSource::EmbeddedLaps(&splits), Some(1000.0));
        // Only the short-and-brief split is dropped.
        assert_eq!(laps.len(), 2);
        assert_eq!(laps[0].number, 1);
        assert_eq!(laps[0].distance_meters, 5.0);
        assert_eq!(laps[1].number, 2);
        assert_eq!(laps[1].distance_meters, 15.0);
    }

    #[test]
    fn test_split_summaries_drop_whole_activity_duplicate() {
        let splits = vec![split(5000.0, 1500.0), split(3000.0, 1499.5), split(2000.0, 600.0)];
        let laps = build_laps(LapSource::SplitSummaries(&splits), Some(1500.0));
        // Both rows within 2 s of the total are duplicates of the whole
        // activity; the rest renumber contiguously.
        assert_eq!(laps.len(), 1);
        assert_eq!(laps[0].number, 1);
        assert_eq!(laps[0].distance_meters, 2000.0);
    }

    #[test]
    fn test_whole_activity_heuristic_only_for_split_summaries() {
        let splits = vec![split(5000.0, 1500.0), split(2000.0, 600.0)];
        let laps = build_laps(LapSource::LapDetails(&splits), Some(1500.0));
        assert_eq!(laps.len(), 2);
    }

    #[test]
    fn test_whole_activity_heuristic_needs_more_than_one_split() {
        let splits = vec![split(5000.0, 1500.0)];
        let laps = build_laps(LapSource::SplitSummaries(&splits), Some(1500.0));
        assert_eq!(laps.len(), 1);
    }

    #[test]
    fn test_lap_source_precedence() {
        let activity = RawActivity::from_value(&json!({
            "laps": [{"distance": 1000.0, "duration": 300.0}],
            "splitSummaries": [{"distance": 2000.0, "duration": 600.0}]
        }))
        .unwrap();
        let splits_doc = RawSplits::from_value(&json!({
            "lapDTOs": [{"distance": 3000.0, "duration": 900.0}]
        }));

        // (a) lapDTOs win when present.
        match resolve_lap_source(&activity, Some(&splits_doc)) {
            LapSource::LapDetails(s) => assert_eq!(s[0].distance, Some(3000.0)),
            other => panic!("expected LapDetails, got {other:?}"),
        }
        // (b) embedded laps next.
        match resolve_lap_source(&activity, None) {
            LapSource::EmbeddedLaps(s) => assert_eq!(s[0].distance, Some(1000.0)),
            other => panic!("expected EmbeddedLaps, got {other:?}"),
        }
        // (c) split summaries last.
        let bare = RawActivity::from_value(&json!({
            "splitSummaries": [{"distance": 2000.0, "duration": 600.0}]
        }))
        .unwrap();
        match resolve_lap_source(&bare, Some(&RawSplits::default())) {
            LapSource::SplitSummaries(s) => assert_eq!(s[0].distance, Some(2000.0)),
            other => panic!("expected SplitSummaries, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_fully_absent_document() {
        let activity = RawActivity::default();
        let record = normalize(&activity, &[], None, &locale(), FeelingFallback::Sentinel);

        assert_eq!(record.timestamp, "-");
        assert_eq!(record.location, "Ubicación desconocida");
        assert_eq!(record.activity_type, "-");
        assert!(record.distance.is_missing());
        assert_eq!(record.duration, "00:00");
        assert_eq!(record.pace, "-");
        assert_eq!(record.grade_adjusted_pace, "-");
        assert!(record.speed_kmh.is_missing());
        assert!(record.heart_rate_avg.is_missing());
        assert!(record.heart_rate_max.is_missing());
        assert!(record.training_effect_aerobic.is_missing());
        assert!(record.training_effect_anaerobic.is_missing());
        assert!(record.training_load.is_missing());
        assert!(record.calories.is_missing());
        assert!(record.cadence_avg.is_missing());
        assert!(record.cadence_max.is_missing());
        assert!(record.stride_length.is_missing());
        assert!(record.vertical_ratio.is_missing());
        assert!(record.vertical_oscillation.is_missing());
        assert!(record.ground_contact_time.is_missing());
        assert!(record.power.is_missing());
        assert!(record.elevation_gain.is_missing());
        assert_eq!(record.rpe, "__");
        assert_eq!(record.feeling, "-");
        assert_eq!(record.efficiency_factor, "-");
        assert_eq!(record.zones_text, "Sin datos de zonas.");
        assert!(record.laps.is_empty());
    }

    #[test]
    fn test_normalize_timestamp_and_type() {
        let activity = RawActivity::from_value(&json!({
            "activityTypeDTO": {"typeKey": "running"},
            "summaryDTO": {"startTimeLocal": "2026-08-20T07:31:02"}
        }))
        .unwrap();
        let record = normalize(&activity, &[], None, &locale(), FeelingFallback::default());
        assert_eq!(record.timestamp, "2026-08-20 07:31:02");
        assert_eq!(record.activity_type, "running");
    }

    #[test]
    fn test_metric_value_serialization() {
        let v = serde_json::to_value(MetricValue::Int(150)).unwrap();
        assert_eq!(v, json!(150));
        let v = serde_json::to_value(MetricValue::Float(4.3, 1)).unwrap();
        assert_eq!(v, json!(4.3));
        let v = serde_json::to_value(MetricValue::missing()).unwrap();
        assert_eq!(v, json!("-"));
    }
}
