use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub data: DataSettings,
    #[serde(default)]
    pub scenarios: ScenarioSettings,
    #[serde(default)]
    pub regions: RegionSettings,
    #[serde(default)]
    pub summary: SummarySettings,
}

/// Locations of the input data files.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    /// Path to the scenario panel CSV (columns: model, scenario, region,
    /// variable, year, value, unit).
    pub panel_file: PathBuf,
}

/// Scenario-related conventions of the loaded scenario database.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioSettings {
    /// The scenario every policy scenario is compared against.
    #[serde(default = "default_baseline")]
    pub baseline: String,
    /// The curated subset returned for a "sample" scenario selector.
    #[serde(default = "default_sample_scenarios")]
    pub samples: Vec<String>,
    /// Baseline/policy scenario pairs offered for market-shock comparisons.
    #[serde(default = "default_comparisons")]
    pub comparisons: Vec<ScenarioComparison>,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            baseline: default_baseline(),
            samples: default_sample_scenarios(),
            comparisons: default_comparisons(),
        }
    }
}

/// A baseline/policy scenario pair for market-shock comparisons.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ScenarioComparison {
    pub baseline: String,
    pub policy: String,
}

/// Region-related conventions.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionSettings {
    /// The curated subset returned for a "sample" region selector: ten
    /// representative world regions.
    #[serde(default = "default_sample_regions")]
    pub samples: Vec<String>,
}

impl Default for RegionSettings {
    fn default() -> Self {
        Self {
            samples: default_sample_regions(),
        }
    }
}

/// The model × scenario grid iterated by the portfolio risk summary, plus the
/// default tail-quantile confidence level.
#[derive(Debug, Clone, Deserialize)]
pub struct SummarySettings {
    #[serde(default = "default_summary_models")]
    pub models: Vec<String>,
    #[serde(default = "default_summary_scenarios")]
    pub scenarios: Vec<String>,
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            models: default_summary_models(),
            scenarios: default_summary_scenarios(),
            confidence_level: default_confidence_level(),
        }
    }
}

fn default_baseline() -> String {
    "LIMITS-Base".to_string()
}

fn default_sample_scenarios() -> Vec<String> {
    vec![
        "LIMITS-Base".to_string(),
        "LIMITS-RefPol-500".to_string(),
        "LIMITS-StrPol-450".to_string(),
    ]
}

fn default_comparisons() -> Vec<ScenarioComparison> {
    ["LIMITS-RefPol-500", "LIMITS-RefPol-450", "LIMITS-StrPol-500", "LIMITS-StrPol-450"]
        .into_iter()
        .map(|policy| ScenarioComparison {
            baseline: default_baseline(),
            policy: policy.to_string(),
        })
        .collect()
}

fn default_sample_regions() -> Vec<String> {
    [
        "AFRICA",
        "CHINA+",
        "EUROPE",
        "INDIA+",
        "LATIN_AM",
        "MIDDLE_EAST",
        "NORTH_AM",
        "PAC_OECD",
        "REF_ECON",
        "REST_ASIA",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_summary_models() -> Vec<String> {
    vec!["GCAM".to_string(), "WITCH".to_string()]
}

fn default_summary_scenarios() -> Vec<String> {
    vec![
        "LIMITS-RefPol-450".to_string(),
        "LIMITS-RefPol-500".to_string(),
        "LIMITS-StrPol-450".to_string(),
        "LIMITS-StrPol-500".to_string(),
    ]
}

fn default_confidence_level() -> f64 {
    0.95
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_the_reference_setup() {
        let scenarios = ScenarioSettings::default();
        assert_eq!(scenarios.baseline, "LIMITS-Base");
        assert_eq!(scenarios.samples.len(), 3);
        assert_eq!(scenarios.comparisons.len(), 4);
        assert!(scenarios
            .comparisons
            .iter()
            .all(|c| c.baseline == "LIMITS-Base"));

        let regions = RegionSettings::default();
        assert_eq!(regions.samples.len(), 10);
        assert!(regions.samples.contains(&"AFRICA".to_string()));

        let summary = SummarySettings::default();
        assert_eq!(summary.models, vec!["GCAM", "WITCH"]);
        assert_eq!(summary.scenarios.len(), 4);
        assert_eq!(summary.confidence_level, 0.95);
    }
}
