// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Locale tables for report labels and fixed vocabulary.
//!
//! The renderer never hardcodes language-specific strings; it looks them up
//! here by key. Adding a language means adding a table, not touching the
//! renderer. Spanish is the default (the language of the original bot);
//! English is the second built-in.

use std::collections::{BTreeMap, HashMap};

/// A string table for one language, threaded explicitly through the
/// normalizer and renderer instead of living in process-global state.
#[derive(Debug, Clone)]
pub struct LocaleTable {
    code: String,
    strings: HashMap<&'static str, String>,
    /// Qualitative feeling labels keyed by the 0-100 breakpoint.
    feeling_labels: BTreeMap<u8, String>,
}

impl LocaleTable {
    /// Look up a built-in table by its two-letter code.
    pub fn builtin(code: &str) -> Option<Self> {
        match code {
            "es" => Some(Self::spanish()),
            "en" => Some(Self::english()),
            _ => None,
        }
    }

    /// The two-letter language code this table was built for.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Display string for a field or section key.
    ///
    /// Unknown keys echo back the key itself so a missing entry is visible
    /// in output instead of panicking.
    pub fn text(&self, key: &'static str) -> &str {
        self.strings.get(key).map_or(key, String::as_str)
    }

    /// Feeling label for one of the fixed breakpoints {0, 25, 50, 75, 100}.
    pub fn feeling_label(&self, breakpoint: u8) -> &str {
        self.feeling_labels
            .get(&breakpoint)
            .map_or("?", String::as_str)
    }

    /// The neutral feeling label (the 50 breakpoint).
    pub fn neutral_feeling(&self) -> &str {
        self.feeling_label(50)
    }

    /// Build a custom table; used by tests and for adding languages at
    /// runtime without touching the renderer.
    pub fn custom(
        code: impl Into<String>,
        strings: HashMap<&'static str, String>,
        feeling_labels: BTreeMap<u8, String>,
    ) -> Self {
        Self {
            code: code.into(),
            strings,
            feeling_labels,
        }
    }

    fn spanish() -> Self {
        let strings = table(&[
            ("report.title", "Reporte"),
            ("section.main", "PRINCIPALES"),
            ("section.cardio", "CARDIO & CARGA"),
            ("section.zones", "Zonas"),
            ("section.efficiency", "EFICIENCIA"),
            ("section.dynamics", "DINÁMICAS"),
            ("section.splits", "SPLITS"),
            ("label.distance", "Dist"),
            ("label.time", "Tiempo"),
            ("label.pace", "Ritmo"),
            ("label.gap", "GAP"),
            ("label.speed", "Vel"),
            ("label.ascent", "Asc"),
            ("label.hr", "FC Avg/Max"),
            ("label.training_effect", "TE"),
            ("label.load", "Carga"),
            ("label.ef", "EF"),
            ("label.power", "Potencia"),
            ("label.calories", "Cal"),
            ("label.cadence", "Cad"),
            ("label.stride", "Zancada"),
            ("label.gct", "GCT"),
            ("label.vertical_osc", "Osc.V"),
            ("label.rpe", "RPE"),
            ("label.feeling", "Sensación"),
            ("unit.bpm", "ppm"),
            ("table.lap", "#"),
            ("table.km", "km"),
            ("table.pace", "Ritmo"),
            ("table.gap", "GAP"),
            ("table.hr", "FC"),
            ("table.cadence", "Cad"),
            ("table.gct", "GCT"),
            ("table.ef", "EF"),
            ("zones.empty", "Sin datos de zonas."),
            ("location.unknown", "Ubicación desconocida"),
            ("chat.processing", "⏳ Procesando datos de Garmin... dame unos segundos."),
            ("chat.not_found", "❌ No encontré actividades en ese índice."),
            ("chat.error", "❌ Error interno"),
        ]);
        let feelings = feelings(&[
            (0, "Muy Débil"),
            (25, "Débil"),
            (50, "Normal"),
            (75, "Fuerte"),
            (100, "Muy Fuerte"),
        ]);
        Self {
            code: "es".to_string(),
            strings,
            feeling_labels: feelings,
        }
    }

    fn english() -> Self {
        let strings = table(&[
            ("report.title", "Report"),
            ("section.main", "MAIN"),
            ("section.cardio", "CARDIO & LOAD"),
            ("section.zones", "Zones"),
            ("section.efficiency", "EFFICIENCY"),
            ("section.dynamics", "DYNAMICS"),
            ("section.splits", "SPLITS"),
            ("label.distance", "Dist"),
            ("label.time", "Time"),
            ("label.pace", "Pace"),
            ("label.gap", "GAP"),
            ("label.speed", "Speed"),
            ("label.ascent", "Asc"),
            ("label.hr", "HR Avg/Max"),
            ("label.training_effect", "TE"),
            ("label.load", "Load"),
            ("label.ef", "EF"),
            ("label.power", "Power"),
            ("label.calories", "Cal"),
            ("label.cadence", "Cad"),
            ("label.stride", "Stride"),
            ("label.gct", "GCT"),
            ("label.vertical_osc", "V.Osc"),
            ("label.rpe", "RPE"),
            ("label.feeling", "Feeling"),
            ("unit.bpm", "bpm"),
            ("table.lap", "#"),
            ("table.km", "km"),
            ("table.pace", "Pace"),
            ("table.gap", "GAP"),
            ("table.hr", "HR"),
            ("table.cadence", "Cad"),
            ("table.gct", "GCT"),
            ("table.ef", "EF"),
            ("zones.empty", "No zone data."),
            ("location.unknown", "Unknown location"),
            ("chat.processing", "⏳ Fetching Garmin data... give me a few seconds."),
            ("chat.not_found", "❌ No activity found at that index."),
            ("chat.error", "❌ Internal error"),
        ]);
        let feelings = feelings(&[
            (0, "Very Weak"),
            (25, "Weak"),
            (50, "Normal"),
            (75, "Strong"),
            (100, "Very Strong"),
        ]);
        Self {
            code: "en".to_string(),
            strings,
            feeling_labels: feelings,
        }
    }
}

impl Default for LocaleTable {
    fn default() -> Self {
        Self::spanish()
    }
}

fn table(entries: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
    entries
        .iter()
        .map(|(k, v)| (*k, (*v).to_string()))
        .collect()
}

fn feelings(entries: &[(u8, &str)]) -> BTreeMap<u8, String> {
    entries
        .iter()
        .map(|(k, v)| (*k, (*v).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(LocaleTable::builtin("es").unwrap().code(), "es");
        assert_eq!(LocaleTable::builtin("en").unwrap().code(), "en");
        assert!(LocaleTable::builtin("de").is_none());
    }

    #[test]
    fn test_default_is_spanish() {
        let locale = LocaleTable::default();
        assert_eq!(locale.code(), "es");
        assert_eq!(locale.text("unit.bpm"), "ppm");
        assert_eq!(locale.neutral_feeling(), "Normal");
    }

    #[test]
    fn test_unknown_key_echoes_key() {
        let locale = LocaleTable::default();
        assert_eq!(locale.text("label.does_not_exist"), "label.does_not_exist");
    }

    #[test]
    fn test_custom_table() {
        let locale = LocaleTable::custom(
            "xx",
            table(&[("label.pace", "Tempo")]),
            feelings(&[(50, "Meh")]),
        );
        assert_eq!(locale.text("label.pace"), "Tempo");
        assert_eq!(locale.neutral_feeling(), "Meh");
        assert_eq!(locale.feeling_label(75), "?");
    }
}
