use crate::error::MetricsError;
use core_types::{base_sector, DerivedPoint, DerivedSeries, Panel, PanelFilter};
use std::collections::HashMap;
use tracing::debug;

/// Series label for market-share results.
const MARKET_SHARE_SERIES: &str = "Market Share";
/// Series label for market-share-shock results.
const SHOCK_SERIES: &str = "shock";

/// Derives market shares (child-sector value ÷ base-sector value) from a
/// sub-panel.
///
/// The sub-panel must contain exactly two distinct variable paths where one is
/// the base sector of the other; the longer path is the numerator. Shares are
/// aligned by (model, scenario, region, year); a child observation with no
/// matching base observation is skipped. A zero base value yields an undefined
/// (`None`) share.
pub fn market_shares(panel: &Panel, as_percent: bool) -> Result<DerivedSeries, MetricsError> {
    let mut variables = panel.distinct_variables();
    variables.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    if variables.len() != 2 {
        return Err(MetricsError::InvalidInput {
            dimension: "variable",
            expected: 2,
            found: variables.len(),
        });
    }
    let (base, child) = (&variables[0], &variables[1]);
    if base_sector(child) != base.as_str() {
        return Err(MetricsError::NotABaseSectorPair {
            child: child.clone(),
            base: base.clone(),
        });
    }

    // Index the denominator rows by their alignment key.
    let base_values: HashMap<(&str, &str, &str, i32), f64> = panel
        .rows()
        .iter()
        .filter(|row| &row.variable == base)
        .map(|row| {
            (
                (row.model.as_str(), row.scenario.as_str(), row.region.as_str(), row.year),
                row.value,
            )
        })
        .collect();

    let scale = if as_percent { 100.0 } else { 1.0 };
    let mut series = DerivedSeries::new(
        MARKET_SHARE_SERIES,
        if as_percent { "%" } else { "ratio" },
    );
    for row in panel.rows().iter().filter(|row| &row.variable == child) {
        let key = (row.model.as_str(), row.scenario.as_str(), row.region.as_str(), row.year);
        let Some(&denominator) = base_values.get(&key) else {
            continue;
        };
        let value = (denominator != 0.0).then(|| row.value / denominator * scale);
        series.points.push(DerivedPoint {
            model: row.model.clone(),
            scenario: row.scenario.clone(),
            region: row.region.clone(),
            year: row.year,
            value,
        });
    }
    debug!(points = series.len(), child = %child, base = %base, "derived market shares");
    Ok(series)
}

/// Derives market-share shocks: the relative change in market share between a
/// baseline scenario and a policy scenario, per (region, year).
///
/// The sub-panel must contain exactly two distinct scenarios; the shorter name
/// is treated as the baseline (lexicographic on ties). A zero or undefined
/// baseline share yields an undefined (`None`) shock for that point. When
/// `cutoff_year` is given, points beyond it are dropped.
pub fn market_share_shocks(
    panel: &Panel,
    as_percent: bool,
    cutoff_year: Option<i32>,
) -> Result<DerivedSeries, MetricsError> {
    let mut scenarios = panel.distinct_scenarios();
    scenarios.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    if scenarios.len() != 2 {
        return Err(MetricsError::InvalidInput {
            dimension: "scenario",
            expected: 2,
            found: scenarios.len(),
        });
    }
    let (baseline, compared) = (&scenarios[0], &scenarios[1]);

    // Shares are computed in ratio form per scenario; percent scaling applies
    // to the relative change, not the shares themselves.
    let baseline_shares = market_shares(
        &panel.filter(&PanelFilter::new().scenarios([baseline.as_str()])),
        false,
    )?;
    let compared_shares = market_shares(
        &panel.filter(&PanelFilter::new().scenarios([compared.as_str()])),
        false,
    )?;

    let baseline_values: HashMap<(&str, &str, i32), Option<f64>> = baseline_shares
        .points
        .iter()
        .map(|p| ((p.model.as_str(), p.region.as_str(), p.year), p.value))
        .collect();

    let scale = if as_percent { 100.0 } else { 1.0 };
    let mut series = DerivedSeries::new(SHOCK_SERIES, if as_percent { "%" } else { "ratio" });
    for point in &compared_shares.points {
        if cutoff_year.is_some_and(|cutoff| point.year > cutoff) {
            continue;
        }
        let key = (point.model.as_str(), point.region.as_str(), point.year);
        let Some(&baseline_value) = baseline_values.get(&key) else {
            continue;
        };
        let value = match (baseline_value, point.value) {
            (Some(base), Some(compared)) if base != 0.0 => {
                Some((compared - base) / base * scale)
            }
            // Zero or undefined baseline share: the relative change is
            // undefined and must stay visible as such downstream.
            _ => None,
        };
        series.points.push(DerivedPoint {
            model: point.model.clone(),
            scenario: point.scenario.clone(),
            region: point.region.clone(),
            year: point.year,
            value,
        });
    }
    debug!(
        points = series.len(),
        baseline = %baseline,
        compared = %compared,
        "derived market-share shocks"
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core_types::Observation;

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

    /// The reference fixture: Secondary Energy vs its Electricity sub-sector
    /// for AFRICA under a base and a policy scenario.
    fn two_scenario_panel() -> Panel {
        Panel::new(vec![
            obs("LIMITS-Base", "AFRICA", "Secondary Energy", 2030, 10.0),
            obs("LIMITS-Base", "AFRICA", "Secondary Energy", 2050, 20.0),
            obs("LIMITS-Base", "AFRICA", "Secondary Energy|Electricity", 2030, 4.0),
            obs("LIMITS-Base", "AFRICA", "Secondary Energy|Electricity", 2050, 10.0),
            obs("LIMITS-RefPol-500", "AFRICA", "Secondary Energy", 2030, 10.0),
            obs("LIMITS-RefPol-500", "AFRICA", "Secondary Energy", 2050, 20.0),
            obs("LIMITS-RefPol-500", "AFRICA", "Secondary Energy|Electricity", 2030, 3.0),
            obs("LIMITS-RefPol-500", "AFRICA", "Secondary Energy|Electricity", 2050, 12.0),
        ])
        .unwrap()
    }

    #[test]
    fn market_shares_divide_child_by_base() {
        let panel = two_scenario_panel().filter(
            &core_types::PanelFilter::new().scenarios(["LIMITS-Base"]),
        );
        let shares = market_shares(&panel, true).unwrap();
        assert_eq!(shares.name, "Market Share");
        assert_eq!(shares.unit, "%");
        assert_eq!(shares.len(), 2);
        assert_relative_eq!(shares.point_at("AFRICA", 2030).unwrap().value.unwrap(), 40.0);
        assert_relative_eq!(shares.point_at("AFRICA", 2050).unwrap().value.unwrap(), 50.0);
    }

    #[test]
    fn market_shares_are_idempotent() {
        let panel = two_scenario_panel().filter(
            &core_types::PanelFilter::new().scenarios(["LIMITS-Base"]),
        );
        assert_eq!(
            market_shares(&panel, false).unwrap(),
            market_shares(&panel, false).unwrap()
        );
    }

    #[test]
    fn market_shares_require_a_base_sector_pair() {
        let panel = Panel::new(vec![
            obs("LIMITS-Base", "AFRICA", "Secondary Energy", 2030, 10.0),
            obs("LIMITS-Base", "AFRICA", "Primary Energy|Coal", 2030, 4.0),
        ])
        .unwrap();
        let err = market_shares(&panel, false).unwrap_err();
        assert!(matches!(err, MetricsError::NotABaseSectorPair { .. }));
    }

    #[test]
    fn market_shares_reject_wrong_variable_count() {
        let panel = Panel::new(vec![
            obs("LIMITS-Base", "AFRICA", "Secondary Energy", 2030, 10.0),
        ])
        .unwrap();
        let err = market_shares(&panel, false).unwrap_err();
        assert!(matches!(
            err,
            MetricsError::InvalidInput { dimension: "variable", expected: 2, found: 1 }
        ));
    }

    #[test]
    fn zero_base_value_yields_undefined_share() {
        let panel = Panel::new(vec![
            obs("LIMITS-Base", "AFRICA", "Secondary Energy", 2030, 0.0),
            obs("LIMITS-Base", "AFRICA", "Secondary Energy|Electricity", 2030, 4.0),
        ])
        .unwrap();
        let shares = market_shares(&panel, false).unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares.points[0].value, None);
    }

    #[test]
    fn shocks_compare_scenarios_with_shorter_name_as_baseline() {
        let shocks = market_share_shocks(&two_scenario_panel(), false, None).unwrap();
        assert_eq!(shocks.name, "shock");
        // Baseline share 2030 = 0.40, policy share = 0.30: shock = -0.25.
        assert_relative_eq!(
            shocks.point_at("AFRICA", 2030).unwrap().value.unwrap(),
            -0.25
        );
        // Baseline share 2050 = 0.50, policy share = 0.60: shock = +0.20.
        assert_relative_eq!(
            shocks.point_at("AFRICA", 2050).unwrap().value.unwrap(),
            0.2
        );
        // Points are labeled with the compared (policy) scenario.
        assert!(shocks.points.iter().all(|p| p.scenario == "LIMITS-RefPol-500"));
    }

    #[test]
    fn percent_mode_scales_ratios_by_one_hundred() {
        let ratio = market_share_shocks(&two_scenario_panel(), false, None).unwrap();
        let percent = market_share_shocks(&two_scenario_panel(), true, None).unwrap();
        assert_eq!(ratio.len(), percent.len());
        for (r, p) in ratio.points.iter().zip(&percent.points) {
            assert_relative_eq!(r.value.unwrap() * 100.0, p.value.unwrap());
        }
    }

    #[test]
    fn shocks_reject_wrong_scenario_count() {
        let panel = two_scenario_panel().filter(
            &core_types::PanelFilter::new().scenarios(["LIMITS-Base"]),
        );
        let err = market_share_shocks(&panel, false, None).unwrap_err();
        assert!(matches!(
            err,
            MetricsError::InvalidInput { dimension: "scenario", expected: 2, found: 1 }
        ));
    }

    #[test]
    fn cutoff_year_drops_later_points() {
        let shocks = market_share_shocks(&two_scenario_panel(), false, Some(2030)).unwrap();
        assert_eq!(shocks.len(), 1);
        assert_eq!(shocks.points[0].year, 2030);
    }

    #[test]
    fn zero_baseline_share_propagates_as_undefined() {
        let panel = Panel::new(vec![
            obs("LIMITS-Base", "AFRICA", "Secondary Energy", 2030, 10.0),
            obs("LIMITS-Base", "AFRICA", "Secondary Energy|Electricity", 2030, 0.0),
            obs("LIMITS-RefPol-500", "AFRICA", "Secondary Energy", 2030, 10.0),
            obs("LIMITS-RefPol-500", "AFRICA", "Secondary Energy|Electricity", 2030, 3.0),
        ])
        .unwrap();
        let shocks = market_share_shocks(&panel, false, None).unwrap();
        assert_eq!(shocks.points[0].value, None);
    }
}
