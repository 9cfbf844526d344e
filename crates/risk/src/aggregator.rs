use crate::error::RiskError;
use attribution::evaluate_portfolio;
use configuration::SummarySettings;
use core_types::{AnnotatedLoan, Loan};
use panel_store::QueryResolver;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::info;

/// One portfolio-level summary row per (model, reference scenario) cell.
///
/// `min_shock` / `max_shock` / `project_var` are `None` when no defined shock
/// exists (or, for `project_var`, when the tail-quantile index falls outside
/// the portfolio); `total_neg_rel` is `None` for a zero-amount portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub model: String,
    pub scenario: String,
    pub min_shock: Option<f64>,
    pub max_shock: Option<f64>,
    pub total_neg: f64,
    pub total_pos: f64,
    pub total_neg_rel: Option<f64>,
    pub project_var: Option<f64>,
}

/// Builds the portfolio risk summary across the configured model × scenario
/// grid.
///
/// For each grid cell the portfolio is evaluated, sorted descending by shock
/// (undefined shocks last), and reduced to a [`SummaryRow`]. The tail-quantile
/// index is `ceil(n × confidence_level)`, used as a zero-based index into the
/// descending-sorted table; an index beyond the last loan yields an undefined
/// `project_var` instead of an out-of-bounds read. Rows are ordered by
/// scenario name ascending (stable, so the configured model order is kept
/// within each scenario).
pub fn top_shocks(
    resolver: &QueryResolver<'_>,
    grid: &SummarySettings,
    baseline_scenario: &str,
    year: i32,
    loans: &[Loan],
    recovery_rate: f64,
    elasticity: f64,
    confidence_level: f64,
) -> Result<Vec<SummaryRow>, RiskError> {
    if !(0.0..=1.0).contains(&confidence_level) {
        return Err(RiskError::InvalidParameter(format!(
            "confidence_level must be within [0, 1], got {confidence_level}"
        )));
    }

    // The portfolio total and the tail index depend only on the portfolio, so
    // they are computed once for the whole grid.
    let total: f64 = loans.iter().map(|l| l.amount).sum();
    let var_index = (loans.len() as f64 * confidence_level).ceil() as usize;

    let mut rows = Vec::with_capacity(grid.models.len() * grid.scenarios.len());
    for model in &grid.models {
        for scenario in &grid.scenarios {
            let mut annotated = evaluate_portfolio(
                resolver,
                baseline_scenario,
                model,
                scenario,
                year,
                loans,
                recovery_rate,
                elasticity,
            )?;
            sort_descending_by_shock(&mut annotated);
            rows.push(summarize(model, scenario, &annotated, total, var_index));
        }
    }

    rows.sort_by(|a, b| a.scenario.cmp(&b.scenario));
    info!(rows = rows.len(), year, "portfolio risk summary built");
    Ok(rows)
}

/// Descending by shock value; undefined shocks sort last.
fn sort_descending_by_shock(loans: &mut [AnnotatedLoan]) {
    loans.sort_by(|a, b| match (a.shock, b.shock) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn summarize(
    model: &str,
    scenario: &str,
    sorted: &[AnnotatedLoan],
    total: f64,
    var_index: usize,
) -> SummaryRow {
    let defined = || sorted.iter().filter_map(|l| l.shock);

    let min_shock = defined().fold(None, |acc: Option<f64>, v| {
        Some(acc.map_or(v, |m| m.min(v)))
    });
    let max_shock = defined().fold(None, |acc: Option<f64>, v| {
        Some(acc.map_or(v, |m| m.max(v)))
    });
    let total_neg: f64 = defined().filter(|v| *v < 0.0).sum();
    let total_pos: f64 = defined().filter(|v| *v > 0.0).sum();
    let total_neg_rel = (total != 0.0).then(|| total_neg / total);
    let project_var = sorted.get(var_index).and_then(|l| l.shock);

    SummaryRow {
        model: model.to_string(),
        scenario: scenario.to_string(),
        min_shock,
        max_shock,
        total_neg,
        total_pos,
        total_neg_rel,
        project_var,
    }
}
