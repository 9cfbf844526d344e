use crate::error::AttributionError;
use core_types::{base_sector, AnnotatedLoan, Loan, Panel, PanelFilter};
use metrics::market_share_shocks;
use panel_store::{QueryResolver, Selector};
use tracing::{debug, info};

/// Computes the market-share shock for a single (region, sector, year)
/// combination from a two-scenario source panel.
///
/// The panel is filtered to the sector, its base sector and the requested
/// region; shocks are derived in ratio form and any value ≥ 1 is clamped to
/// exactly 1.0 (a shock cannot exceed full loss). Returns `Ok(None)` when the
/// point exists but its share was undefined, and [`AttributionError::NoData`]
/// when the combination matches no row at all.
pub fn single_shock(
    source: &Panel,
    region: &str,
    sector: &str,
    year: i32,
) -> Result<Option<f64>, AttributionError> {
    let no_data = || AttributionError::NoData {
        region: region.to_string(),
        sector: sector.to_string(),
        year,
    };

    let sub = source.filter(
        &PanelFilter::new()
            .variables([sector, base_sector(sector)])
            .regions([region]),
    );
    if sub.is_empty() {
        return Err(no_data());
    }

    let shocks = market_share_shocks(&sub, false, None)?;
    let point = shocks.point_at(region, year).ok_or_else(no_data)?;
    Ok(point.value.map(|v| v.min(1.0)))
}

/// Annotates every loan of a portfolio with its amount-scaled shock under one
/// (model, reference scenario) combination at the target year.
///
/// Issues a single combined query for all sectors and base sectors appearing
/// in the portfolio, so the store is scanned once rather than per loan. The
/// input portfolio is never mutated; a new annotated portfolio is returned.
pub fn evaluate_portfolio(
    resolver: &QueryResolver<'_>,
    baseline_scenario: &str,
    model: &str,
    reference_scenario: &str,
    year: i32,
    loans: &[Loan],
    recovery_rate: f64,
    elasticity: f64,
) -> Result<Vec<AnnotatedLoan>, AttributionError> {
    if recovery_rate < 0.0 {
        return Err(AttributionError::InvalidParameter(format!(
            "recovery_rate must be non-negative, got {recovery_rate}"
        )));
    }
    if elasticity < 0.0 {
        return Err(AttributionError::InvalidParameter(format!(
            "elasticity must be non-negative, got {elasticity}"
        )));
    }

    // One combined query: every sector appearing in the portfolio plus its
    // base sector, across both scenarios and all regions.
    let mut sectors: Vec<String> = Vec::new();
    for loan in loans {
        for candidate in [loan.sector.as_str(), base_sector(&loan.sector)] {
            if !sectors.iter().any(|s| s == candidate) {
                sectors.push(candidate.to_string());
            }
        }
    }

    let source = resolver
        .query(
            &Selector::from(model),
            &Selector::Many(vec![
                baseline_scenario.to_string(),
                reference_scenario.to_string(),
            ]),
            &Selector::from("all"),
            &Selector::Many(sectors),
        )?
        .ok_or_else(|| AttributionError::NoPanelData {
            model: model.to_string(),
            baseline: baseline_scenario.to_string(),
            reference: reference_scenario.to_string(),
        })?;
    debug!(
        model,
        reference_scenario,
        rows = source.len(),
        "combined panel query for portfolio evaluation"
    );

    let mut annotated = Vec::with_capacity(loans.len());
    for loan in loans {
        let shock = single_shock(&source, &loan.region, &loan.sector, year)?
            .map(|s| loan.amount * (1.0 - recovery_rate) * elasticity * s);
        annotated.push(AnnotatedLoan::from_loan(loan, shock));
    }
    info!(
        model,
        reference_scenario,
        year,
        loans = annotated.len(),
        "portfolio evaluated"
    );
    Ok(annotated)
}
