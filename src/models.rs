// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Raw Document Models
//!
//! Typed shapes for the semi-structured documents Garmin Connect returns
//! for a single activity: the activity detail, the heart-rate-zone
//! breakdown, and the lap/split breakdown.
//!
//! ## Design Principles
//!
//! - **Lenient at the boundary**: upstream payloads mix numbers, numeric
//!   strings, the literal `"N/A"`, and missing keys for the same field.
//!   Every numeric field coerces through a lenient deserializer; anything
//!   that is not a number becomes `None` and is never an error.
//! - **Fail fast only on structure**: a document that is not a JSON object
//!   at all is a caller contract violation and raises [`DocumentError`].
//!   Everything below that level has a fallback.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Error raised when a raw document is structurally unusable.
///
/// This is the only condition the report core fails on; every per-field
/// problem inside a well-formed document degrades to an absent value.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("activity document is missing or not a JSON object")]
    InvalidActivity,
}

/// Accept a number, a numeric string, or anything else as absent.
///
/// Garmin serializes some summary fields as strings (`"142"`) and uses the
/// sentinel `"N/A"` for others; both paths land here.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64))
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Activity detail document as fetched from the activity service.
///
/// Only the fields the report pipeline reads are modeled; everything else
/// in the upstream payload is ignored. All containers default to empty so
/// a sparse document deserializes cleanly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawActivity {
    #[serde(rename = "locationName")]
    pub location_name: Option<String>,
    #[serde(rename = "activityTypeDTO")]
    pub activity_type: ActivityTypeDto,
    #[serde(rename = "summaryDTO")]
    pub summary: ActivitySummary,
    /// Two spellings observed upstream for the same list.
    #[serde(rename = "connectIQMeasurements")]
    pub connect_iq_measurements: Vec<ConnectIqMeasurement>,
    #[serde(rename = "connectIQMeasurement")]
    pub connect_iq_measurement: Vec<ConnectIqMeasurement>,
    /// Lap list embedded directly in the detail document.
    pub laps: Vec<RawSplit>,
    /// Generic split summaries; may contain a duplicate whole-activity row.
    #[serde(rename = "splitSummaries")]
    pub split_summaries: Vec<RawSplit>,
}

impl RawActivity {
    /// Coerce a duck-typed document into the typed shape.
    ///
    /// A non-object document fails fast; a well-formed object whose fields
    /// cannot be read degrades to a fully-absent activity so the pipeline
    /// still produces a sentinel-filled report.
    pub fn from_value(value: &Value) -> Result<Self, DocumentError> {
        if !value.is_object() {
            return Err(DocumentError::InvalidActivity);
        }
        Ok(serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            warn!("activity document did not match the expected shape: {e}");
            Self::default()
        }))
    }

    /// The ConnectIQ measurement list under whichever key it arrived.
    pub fn connect_iq(&self) -> &[ConnectIqMeasurement] {
        if !self.connect_iq_measurements.is_empty() {
            &self.connect_iq_measurements
        } else {
            &self.connect_iq_measurement
        }
    }
}

/// Activity type tag (`activityTypeDTO.typeKey`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ActivityTypeDto {
    #[serde(rename = "typeKey")]
    pub type_key: Option<String>,
}

/// Summary section of the activity detail (`summaryDTO`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ActivitySummary {
    #[serde(rename = "startTimeLocal")]
    pub start_time_local: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub distance: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,
    #[serde(rename = "averageSpeed", deserialize_with = "lenient_f64")]
    pub average_speed: Option<f64>,
    #[serde(rename = "maxSpeed", deserialize_with = "lenient_f64")]
    pub max_speed: Option<f64>,
    #[serde(rename = "averageHR", deserialize_with = "lenient_f64")]
    pub average_hr: Option<f64>,
    #[serde(rename = "maxHR", deserialize_with = "lenient_f64")]
    pub max_hr: Option<f64>,
    #[serde(rename = "trainingEffect", deserialize_with = "lenient_f64")]
    pub training_effect: Option<f64>,
    #[serde(rename = "anaerobicTrainingEffect", deserialize_with = "lenient_f64")]
    pub anaerobic_training_effect: Option<f64>,
    #[serde(rename = "activityTrainingLoad", deserialize_with = "lenient_f64")]
    pub activity_training_load: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub calories: Option<f64>,
    #[serde(rename = "averageRunCadence", deserialize_with = "lenient_f64")]
    pub average_run_cadence: Option<f64>,
    #[serde(rename = "maxRunCadence", deserialize_with = "lenient_f64")]
    pub max_run_cadence: Option<f64>,
    #[serde(rename = "strideLength", deserialize_with = "lenient_f64")]
    pub stride_length: Option<f64>,
    #[serde(rename = "verticalRatio", deserialize_with = "lenient_f64")]
    pub vertical_ratio: Option<f64>,
    #[serde(rename = "verticalOscillation", deserialize_with = "lenient_f64")]
    pub vertical_oscillation: Option<f64>,
    #[serde(rename = "groundContactTime", deserialize_with = "lenient_f64")]
    pub ground_contact_time: Option<f64>,
    #[serde(rename = "averagePower", deserialize_with = "lenient_f64")]
    pub average_power: Option<f64>,
    #[serde(rename = "elevationGain", deserialize_with = "lenient_f64")]
    pub elevation_gain: Option<f64>,
    #[serde(rename = "avgGradeAdjustedSpeed", deserialize_with = "lenient_f64")]
    pub avg_grade_adjusted_speed: Option<f64>,
    #[serde(rename = "minElevation", deserialize_with = "lenient_f64")]
    pub min_elevation: Option<f64>,
    #[serde(rename = "maxElevation", deserialize_with = "lenient_f64")]
    pub max_elevation: Option<f64>,
    /// Rate of perceived exertion on a 0-100 scale (tenths of 0-10).
    #[serde(rename = "directWorkoutRpe", deserialize_with = "lenient_f64")]
    pub direct_workout_rpe: Option<f64>,
    /// Subjective feeling on a 0-100 scale.
    #[serde(rename = "directWorkoutFeel", deserialize_with = "lenient_f64")]
    pub direct_workout_feel: Option<f64>,
}

/// One ConnectIQ custom sensor field entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConnectIqMeasurement {
    #[serde(rename = "appID")]
    pub app_id: Option<String>,
    #[serde(rename = "developerFieldNumber", deserialize_with = "lenient_f64")]
    pub developer_field_number: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub value: Option<f64>,
}

/// One heart-rate-zone entry, unordered as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawZoneEntry {
    #[serde(rename = "zoneNumber")]
    pub zone_number: i64,
    #[serde(rename = "zoneLowBoundary", deserialize_with = "lenient_f64")]
    pub zone_low_boundary: Option<f64>,
    #[serde(rename = "secsInZone", deserialize_with = "lenient_f64")]
    pub secs_in_zone: Option<f64>,
}

impl RawZoneEntry {
    /// Coerce a zone list document, dropping entries that are not objects.
    pub fn list_from_value(value: &Value) -> Vec<Self> {
        match value.as_array() {
            Some(entries) => entries
                .iter()
                .filter(|v| v.is_object())
                .filter_map(|v| serde_json::from_value(v.clone()).ok())
                .collect(),
            None => Vec::new(),
        }
    }
}

/// One lap or split record.
///
/// Whichever of the three sources supplies it, the per-lap field subset
/// is the same.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSplit {
    #[serde(deserialize_with = "lenient_f64")]
    pub distance: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,
    #[serde(rename = "averageSpeed", deserialize_with = "lenient_f64")]
    pub average_speed: Option<f64>,
    #[serde(rename = "maxSpeed", deserialize_with = "lenient_f64")]
    pub max_speed: Option<f64>,
    #[serde(rename = "averageHR", deserialize_with = "lenient_f64")]
    pub average_hr: Option<f64>,
    #[serde(rename = "maxHR", deserialize_with = "lenient_f64")]
    pub max_hr: Option<f64>,
    #[serde(rename = "averageRunCadence", deserialize_with = "lenient_f64")]
    pub average_run_cadence: Option<f64>,
    #[serde(rename = "groundContactTime", deserialize_with = "lenient_f64")]
    pub ground_contact_time: Option<f64>,
    #[serde(rename = "verticalRatio", deserialize_with = "lenient_f64")]
    pub vertical_ratio: Option<f64>,
    #[serde(rename = "elevationGain", deserialize_with = "lenient_f64")]
    pub elevation_gain: Option<f64>,
    #[serde(rename = "avgGradeAdjustedSpeed", deserialize_with = "lenient_f64")]
    pub avg_grade_adjusted_speed: Option<f64>,
    #[serde(rename = "connectIQMeasurements")]
    pub connect_iq_measurements: Vec<ConnectIqMeasurement>,
    #[serde(rename = "connectIQMeasurement")]
    pub connect_iq_measurement: Vec<ConnectIqMeasurement>,
}

impl RawSplit {
    /// The ConnectIQ measurement list under whichever key it arrived.
    pub fn connect_iq(&self) -> &[ConnectIqMeasurement] {
        if !self.connect_iq_measurements.is_empty() {
            &self.connect_iq_measurements
        } else {
            &self.connect_iq_measurement
        }
    }
}

/// Lap breakdown document from the splits endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSplits {
    #[serde(rename = "lapDTOs")]
    pub lap_dtos: Vec<RawSplit>,
}

impl RawSplits {
    /// Coerce a splits document; anything unusable becomes an empty one.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}
