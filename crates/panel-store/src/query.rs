use crate::error::QueryError;
use crate::store::PanelStore;
use core_types::{Panel, PanelFilter};
use tracing::debug;

/// The wildcard token that expands to a full dimension enumeration.
const WILDCARD: &str = "all";

/// A dimension selector: a single value or an explicit list of values.
///
/// Single values may be comma-separated (`"LIMITS-Base,LIMITS-RefPol-500"`),
/// which is split during resolution. The wildcard `"all"` and any token
/// containing `"sample"` (both case-insensitive) are recognized for scenario
/// and region selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Selector::One(value.to_string())
    }
}

impl From<String> for Selector {
    fn from(value: String) -> Self {
        Selector::One(value)
    }
}

impl From<Vec<String>> for Selector {
    fn from(values: Vec<String>) -> Self {
        Selector::Many(values)
    }
}

impl Selector {
    /// Flattens the selector into concrete values: list entries are taken
    /// as-is, single values are split on commas and trimmed.
    fn values(&self, dimension: &'static str) -> Result<Vec<String>, QueryError> {
        let values: Vec<String> = match self {
            Selector::One(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
            Selector::Many(list) => list
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
        };
        if values.is_empty() {
            return Err(QueryError::InvalidSelector {
                dimension,
                reason: "selector resolves to no values".to_string(),
            });
        }
        Ok(values)
    }
}

/// Expands symbolic selectors against the panel store and executes
/// multi-dimensional filter queries.
///
/// The resolver borrows the store (read-only) and carries the curated sample
/// lists handed down from configuration.
#[derive(Debug)]
pub struct QueryResolver<'a> {
    store: &'a PanelStore,
    sample_scenarios: Vec<String>,
    sample_regions: Vec<String>,
}

impl<'a> QueryResolver<'a> {
    pub fn new(
        store: &'a PanelStore,
        sample_scenarios: Vec<String>,
        sample_regions: Vec<String>,
    ) -> Self {
        Self {
            store,
            sample_scenarios,
            sample_regions,
        }
    }

    /// Resolves a scenario selector for the given models: `"all"` expands to
    /// the store's scenario enumeration, a `"sample"` token to the curated
    /// sample scenarios, anything else passes through literally.
    pub fn resolve_scenarios(
        &self,
        selector: &Selector,
        models: &[String],
    ) -> Result<Vec<String>, QueryError> {
        let values = selector.values("scenario")?;
        if is_wildcard(&values) {
            return Ok(self.enumerate_for_models(models, |m| self.store.scenarios(m)));
        }
        if is_sample(&values) {
            return Ok(self.sample_scenarios.clone());
        }
        Ok(values)
    }

    /// Resolves a region selector for the given models; same rules as
    /// [`resolve_scenarios`](Self::resolve_scenarios) with the curated region
    /// sample list.
    pub fn resolve_regions(
        &self,
        selector: &Selector,
        models: &[String],
    ) -> Result<Vec<String>, QueryError> {
        let values = selector.values("region")?;
        if is_wildcard(&values) {
            return Ok(self.enumerate_for_models(models, |m| self.store.regions(m)));
        }
        if is_sample(&values) {
            return Ok(self.sample_regions.clone());
        }
        Ok(values)
    }

    /// Executes a conjunctive multi-dimensional query against the store.
    ///
    /// Scenario and region selectors are resolved (wildcards and samples);
    /// model and variable selectors are taken literally. `Ok(None)` marks a
    /// well-formed query that matches nothing, which is a result, not an
    /// error.
    pub fn query(
        &self,
        model: &Selector,
        scenario: &Selector,
        region: &Selector,
        variable: &Selector,
    ) -> Result<Option<Panel>, QueryError> {
        let models = model.values("model")?;
        let scenarios = self.resolve_scenarios(scenario, &models)?;
        let regions = self.resolve_regions(region, &models)?;
        let variables = variable.values("variable")?;

        debug!(
            models = models.len(),
            scenarios = scenarios.len(),
            regions = regions.len(),
            variables = variables.len(),
            "resolved panel query"
        );

        let sub = self.store.panel().filter(
            &PanelFilter::new()
                .models(models)
                .scenarios(scenarios)
                .regions(regions)
                .variables(variables),
        );
        if sub.is_empty() {
            return Ok(None);
        }
        Ok(Some(sub))
    }

    /// Union of a per-model enumeration over all requested models, re-sorted
    /// by the shared length-ascending convention.
    fn enumerate_for_models(
        &self,
        models: &[String],
        enumerate: impl Fn(Option<&str>) -> Vec<String>,
    ) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for model in models {
            for value in enumerate(Some(model.as_str())) {
                if !out.contains(&value) {
                    out.push(value);
                }
            }
        }
        out.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        out
    }
}

/// The wildcard applies when the first resolved value is `"all"`.
fn is_wildcard(values: &[String]) -> bool {
    values[0].eq_ignore_ascii_case(WILDCARD)
}

/// A sample selector applies when the first resolved value contains
/// `"sample"`, case-insensitively.
fn is_sample(values: &[String]) -> bool {
    values[0].to_ascii_lowercase().contains("sample")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
model,scenario,region,variable,year,value,unit
GCAM,LIMITS-Base,AFRICA,Secondary Energy,2030,10,EJ/yr
GCAM,LIMITS-Base,EUROPE,Secondary Energy,2030,20,EJ/yr
GCAM,LIMITS-RefPol-500,AFRICA,Secondary Energy,2030,8,EJ/yr
GCAM,LIMITS-Base-EE,AFRICA,Secondary Energy,2030,9,EJ/yr
WITCH,LIMITS-Base,CHINA+,Secondary Energy,2030,30,EJ/yr
";

    fn sample_scenarios() -> Vec<String> {
        vec![
            "LIMITS-Base".to_string(),
            "LIMITS-RefPol-500".to_string(),
            "LIMITS-StrPol-450".to_string(),
        ]
    }

    fn sample_regions() -> Vec<String> {
        vec!["AFRICA".to_string(), "EUROPE".to_string()]
    }

    fn store() -> PanelStore {
        PanelStore::from_csv_bytes(SAMPLE_CSV.as_bytes()).unwrap()
    }

    #[test]
    fn all_expands_to_the_model_restricted_enumeration() {
        let store = store();
        let resolver = QueryResolver::new(&store, sample_scenarios(), sample_regions());
        let resolved = resolver
            .resolve_scenarios(&Selector::from("All"), &["GCAM".to_string()])
            .unwrap();
        // Variant sub-scenarios stay hidden even under the wildcard.
        assert_eq!(resolved, vec!["LIMITS-Base", "LIMITS-RefPol-500"]);
    }

    #[test]
    fn sample_token_expands_to_the_curated_list() {
        let store = store();
        let resolver = QueryResolver::new(&store, sample_scenarios(), sample_regions());
        let resolved = resolver
            .resolve_regions(&Selector::from("Sample regions"), &["GCAM".to_string()])
            .unwrap();
        assert_eq!(resolved, sample_regions());
    }

    #[test]
    fn literals_pass_through_unchanged() {
        let store = store();
        let resolver = QueryResolver::new(&store, sample_scenarios(), sample_regions());
        let resolved = resolver
            .resolve_scenarios(
                &Selector::from("LIMITS-Base,LIMITS-RefPol-500"),
                &["GCAM".to_string()],
            )
            .unwrap();
        assert_eq!(resolved, vec!["LIMITS-Base", "LIMITS-RefPol-500"]);
    }

    #[test]
    fn query_filters_conjunctively() {
        let store = store();
        let resolver = QueryResolver::new(&store, sample_scenarios(), sample_regions());
        let sub = resolver
            .query(
                &Selector::from("GCAM"),
                &Selector::from("LIMITS-Base"),
                &Selector::from("AFRICA"),
                &Selector::from("Secondary Energy"),
            )
            .unwrap()
            .expect("should match one row");
        assert_eq!(sub.len(), 1);
        assert_eq!(sub.rows()[0].value, 10.0);
    }

    #[test]
    fn empty_result_is_none_not_an_error() {
        let store = store();
        let resolver = QueryResolver::new(&store, sample_scenarios(), sample_regions());
        let sub = resolver
            .query(
                &Selector::from("GCAM"),
                &Selector::from("LIMITS-Base"),
                &Selector::from("MARS"),
                &Selector::from("Secondary Energy"),
            )
            .unwrap();
        assert!(sub.is_none());
    }

    #[test]
    fn empty_selector_is_invalid() {
        let store = store();
        let resolver = QueryResolver::new(&store, sample_scenarios(), sample_regions());
        let err = resolver
            .query(
                &Selector::Many(vec![]),
                &Selector::from("LIMITS-Base"),
                &Selector::from("AFRICA"),
                &Selector::from("Secondary Energy"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidSelector { dimension: "model", .. }
        ));
    }

    #[test]
    fn wildcard_region_spans_all_requested_models() {
        let store = store();
        let resolver = QueryResolver::new(&store, sample_scenarios(), sample_regions());
        let resolved = resolver
            .resolve_regions(
                &Selector::from("all"),
                &["GCAM".to_string(), "WITCH".to_string()],
            )
            .unwrap();
        assert_eq!(resolved, vec!["AFRICA", "CHINA+", "EUROPE"]);
    }
}
