use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single observation from an integrated-assessment-model scenario database.
///
/// The tuple (model, scenario, region, variable, year) uniquely identifies an
/// observation within a [`Panel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub model: String,
    pub scenario: String,
    pub region: String,
    pub variable: String,
    pub year: i32,
    pub value: f64,
    pub unit: String,
}

impl Observation {
    /// The identifying key tuple of this observation.
    pub fn key(&self) -> (&str, &str, &str, &str, i32) {
        (
            &self.model,
            &self.scenario,
            &self.region,
            &self.variable,
            self.year,
        )
    }
}

/// An ordered, immutable collection of scenario observations.
///
/// Panels are built once (at load time or by filtering an existing panel) and
/// never mutated in place; every derivation produces a new `Panel`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    rows: Vec<Observation>,
}

impl Panel {
    /// Builds a panel from observations, enforcing the key-uniqueness invariant.
    pub fn new(rows: Vec<Observation>) -> Result<Self, CoreError> {
        let mut seen = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !seen.insert(row.key()) {
                return Err(CoreError::DuplicateObservation {
                    model: row.model.clone(),
                    scenario: row.scenario.clone(),
                    region: row.region.clone(),
                    variable: row.variable.clone(),
                    year: row.year,
                });
            }
        }
        Ok(Self { rows })
    }

    /// Builds a panel from rows already known to satisfy the uniqueness
    /// invariant (e.g. a filtered subset of an existing panel).
    pub(crate) fn from_unique_rows(rows: Vec<Observation>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Applies a conjunctive multi-dimensional filter, returning the matching
    /// sub-panel. Filtering a panel that satisfies the uniqueness invariant
    /// cannot violate it.
    pub fn filter(&self, filter: &PanelFilter) -> Panel {
        Panel::from_unique_rows(
            self.rows
                .iter()
                .filter(|row| filter.matches(row))
                .cloned()
                .collect(),
        )
    }

    /// Distinct scenario names, in order of first appearance.
    pub fn distinct_scenarios(&self) -> Vec<String> {
        self.distinct(|row| &row.scenario)
    }

    /// Distinct variable paths, in order of first appearance.
    pub fn distinct_variables(&self) -> Vec<String> {
        self.distinct(|row| &row.variable)
    }

    /// Distinct region names, in order of first appearance.
    pub fn distinct_regions(&self) -> Vec<String> {
        self.distinct(|row| &row.region)
    }

    fn distinct(&self, accessor: impl Fn(&Observation) -> &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for row in &self.rows {
            let value = accessor(row);
            if seen.insert(value.to_string()) {
                out.push(value.to_string());
            }
        }
        out
    }
}

/// A conjunctive filter over panel dimensions.
///
/// A dimension left unset matches every row; a dimension set to a list matches
/// rows whose value equals at least one entry in the list.
#[derive(Debug, Clone, Default)]
pub struct PanelFilter {
    models: Option<Vec<String>>,
    scenarios: Option<Vec<String>>,
    regions: Option<Vec<String>>,
    variables: Option<Vec<String>>,
    years: Option<Vec<i32>>,
}

impl PanelFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = Some(models.into_iter().map(Into::into).collect());
        self
    }

    pub fn scenarios<I, S>(mut self, scenarios: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scenarios = Some(scenarios.into_iter().map(Into::into).collect());
        self
    }

    pub fn regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = Some(regions.into_iter().map(Into::into).collect());
        self
    }

    pub fn variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = Some(variables.into_iter().map(Into::into).collect());
        self
    }

    pub fn years<I>(mut self, years: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        self.years = Some(years.into_iter().collect());
        self
    }

    /// Returns true when the observation matches every set dimension.
    pub fn matches(&self, row: &Observation) -> bool {
        let matches_dim = |allowed: &Option<Vec<String>>, value: &str| {
            allowed
                .as_ref()
                .is_none_or(|list| list.iter().any(|v| v == value))
        };

        matches_dim(&self.models, &row.model)
            && matches_dim(&self.scenarios, &row.scenario)
            && matches_dim(&self.regions, &row.region)
            && matches_dim(&self.variables, &row.variable)
            && self
                .years
                .as_ref()
                .is_none_or(|years| years.contains(&row.year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(scenario: &str, region: &str, variable: &str, year: i32, value: f64) -> Observation {
        Observation {
            model: "GCAM".to_string(),
            scenario: scenario.to_string(),
            region: region.to_string(),
            variable: variable.to_string(),
            year,
            value,
            unit: "EJ/yr".to_string(),
        }
    }

    #[test]
    fn new_rejects_duplicate_keys() {
        let rows = vec![
            obs("LIMITS-Base", "AFRICA", "Secondary Energy", 2030, 10.0),
            obs("LIMITS-Base", "AFRICA", "Secondary Energy", 2030, 12.0),
        ];
        let err = Panel::new(rows).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateObservation { year: 2030, .. }));
    }

    #[test]
    fn filter_is_conjunctive_across_dimensions() {
        let panel = Panel::new(vec![
            obs("LIMITS-Base", "AFRICA", "Secondary Energy", 2030, 10.0),
            obs("LIMITS-Base", "EUROPE", "Secondary Energy", 2030, 20.0),
            obs("LIMITS-RefPol-500", "AFRICA", "Secondary Energy", 2030, 9.0),
        ])
        .unwrap();

        let sub = panel.filter(
            &PanelFilter::new()
                .scenarios(["LIMITS-Base"])
                .regions(["AFRICA"]),
        );
        assert_eq!(sub.len(), 1);
        assert_eq!(sub.rows()[0].value, 10.0);
    }

    #[test]
    fn filter_matches_any_value_within_a_dimension() {
        let panel = Panel::new(vec![
            obs("LIMITS-Base", "AFRICA", "Secondary Energy", 2030, 10.0),
            obs("LIMITS-RefPol-500", "AFRICA", "Secondary Energy", 2030, 9.0),
            obs("LIMITS-StrPol-450", "AFRICA", "Secondary Energy", 2030, 8.0),
        ])
        .unwrap();

        let sub = panel.filter(
            &PanelFilter::new().scenarios(["LIMITS-Base", "LIMITS-RefPol-500"]),
        );
        assert_eq!(sub.len(), 2);
    }

    #[test]
    fn distinct_preserves_first_appearance_order() {
        let panel = Panel::new(vec![
            obs("B", "AFRICA", "Secondary Energy", 2030, 1.0),
            obs("A", "AFRICA", "Secondary Energy", 2030, 2.0),
            obs("B", "EUROPE", "Secondary Energy", 2030, 3.0),
        ])
        .unwrap();
        assert_eq!(panel.distinct_scenarios(), vec!["B", "A"]);
    }
}
