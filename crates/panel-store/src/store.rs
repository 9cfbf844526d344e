use crate::error::StoreError;
use core_types::{Observation, Panel};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::info;

/// The exact column layout the panel CSV must carry, in order.
const PANEL_COLUMNS: [&str; 7] = [
    "model", "scenario", "region", "variable", "year", "value", "unit",
];

/// Substrings marking variant sub-scenarios that are hidden from top-level
/// scenario enumeration (efficiency / carbon-price / delayed-action variants).
const HIDDEN_SCENARIO_MARKERS: [&str; 3] = ["-EE", "-PC", "2030-500"];

/// The in-memory scenario panel, loaded once and read-only thereafter.
///
/// All enumeration methods return deterministically ordered lists: sorted by
/// name length ascending, then lexicographically. Shorter names denote the
/// simpler or "base" case, and this ordering convention is relied upon by the
/// metrics engine when it picks baselines and base sectors.
#[derive(Debug, Clone)]
pub struct PanelStore {
    panel: Panel,
}

impl PanelStore {
    /// Loads the scenario panel from a CSV file.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            StoreError::DataUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        let store = Self::from_csv_bytes(&bytes)?;
        info!(
            path = %path.display(),
            rows = store.panel.len(),
            "scenario panel loaded"
        );
        Ok(store)
    }

    /// Builds the store from raw CSV bytes.
    ///
    /// The reference data file is Windows-1252 encoded; decoding first tries
    /// UTF-8 and falls back to a Windows-1252 table decode.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let text = decode_panel_text(bytes);
        let mut reader = csv::Reader::from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| StoreError::DataUnavailable(format!("cannot read header row: {e}")))?;
        let found: Vec<&str> = headers.iter().map(str::trim).collect();
        if found != PANEL_COLUMNS {
            return Err(StoreError::DataUnavailable(format!(
                "expected columns {PANEL_COLUMNS:?}, found {found:?}"
            )));
        }

        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                StoreError::DataUnavailable(format!("malformed record at line {}: {e}", idx + 2))
            })?;
            rows.push(parse_observation(&record, idx + 2)?);
        }

        let panel = Panel::new(rows)
            .map_err(|e| StoreError::DataUnavailable(e.to_string()))?;
        Ok(Self { panel })
    }

    /// Builds a store around an already-constructed panel.
    pub fn from_panel(panel: Panel) -> Self {
        Self { panel }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    /// Distinct model names.
    pub fn models(&self) -> Vec<String> {
        self.enumerate(None, |row| Some(row.model.as_str()))
    }

    /// Distinct scenario names, excluding hidden variant sub-scenarios.
    ///
    /// When `model` is given, only that model's rows are considered.
    pub fn scenarios(&self, model: Option<&str>) -> Vec<String> {
        let mut scenarios = self.enumerate(model, |row| Some(row.scenario.as_str()));
        scenarios.retain(|s| !HIDDEN_SCENARIO_MARKERS.iter().any(|m| s.contains(m)));
        scenarios
    }

    /// Distinct region names, optionally restricted to one model's rows.
    pub fn regions(&self, model: Option<&str>) -> Vec<String> {
        self.enumerate(model, |row| Some(row.region.as_str()))
    }

    /// Distinct variable paths matching a predicate, optionally restricted to
    /// one model's rows.
    pub fn variables(
        &self,
        model: Option<&str>,
        predicate: impl Fn(&str) -> bool,
    ) -> Vec<String> {
        self.enumerate(model, |row| {
            predicate(&row.variable).then_some(row.variable.as_str())
        })
    }

    /// Distinct variable paths containing the token `Energy`, optionally
    /// restricted to one model's rows.
    pub fn energy_variables(&self, model: Option<&str>) -> Vec<String> {
        self.variables(model, |variable| variable.contains("Energy"))
    }

    fn enumerate<'a>(
        &'a self,
        model: Option<&str>,
        accessor: impl Fn(&'a Observation) -> Option<&'a str>,
    ) -> Vec<String> {
        let values: BTreeSet<&str> = self
            .panel
            .rows()
            .iter()
            .filter(|row| model.is_none_or(|m| row.model == m))
            .filter_map(&accessor)
            .collect();
        let mut out: Vec<String> = values.into_iter().map(str::to_string).collect();
        // Length-ascending, then lexicographic: the deterministic ordering
        // convention shared by every enumeration.
        out.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        out
    }
}

fn parse_observation(record: &csv::StringRecord, line: usize) -> Result<Observation, StoreError> {
    let field = |idx: usize| record.get(idx).unwrap_or("").trim();
    let year: i32 = field(4).parse().map_err(|_| {
        StoreError::DataUnavailable(format!("invalid year {:?} at line {line}", field(4)))
    })?;
    let value: f64 = field(5).parse().map_err(|_| {
        StoreError::DataUnavailable(format!("invalid value {:?} at line {line}", field(5)))
    })?;
    Ok(Observation {
        model: field(0).to_string(),
        scenario: field(1).to_string(),
        region: field(2).to_string(),
        variable: field(3).to_string(),
        year,
        value,
        unit: field(6).to_string(),
    })
}

/// Decodes panel bytes as UTF-8, falling back to Windows-1252 for the legacy
/// reference data file.
fn decode_panel_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(decode_windows_1252(bytes)),
    }
}

fn decode_windows_1252(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            // 0x80..=0x9F is where Windows-1252 diverges from Latin-1.
            0x80..=0x9F => WINDOWS_1252_HIGH[(b - 0x80) as usize],
            _ => b as char,
        })
        .collect()
}

const WINDOWS_1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{81}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{8D}', '\u{017D}', '\u{8F}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{9D}', '\u{017E}', '\u{0178}',
];
