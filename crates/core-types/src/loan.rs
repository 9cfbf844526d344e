use serde::{Deserialize, Serialize};

/// A single credit exposure: an amount lent to a sector in a region.
///
/// `sector` is a hierarchical variable path as found in the scenario panel,
/// e.g. `"Secondary Energy|Electricity|Coal"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub region: String,
    pub sector: String,
    pub amount: f64,
}

/// A loan after shock attribution.
///
/// `shock` is the amount-scaled market-share shock for this exposure; `None`
/// when the underlying market share was undefined for the requested year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedLoan {
    pub region: String,
    pub sector: String,
    pub amount: f64,
    pub shock: Option<f64>,
}

impl AnnotatedLoan {
    pub fn from_loan(loan: &Loan, shock: Option<f64>) -> Self {
        Self {
            region: loan.region.clone(),
            sector: loan.sector.clone(),
            amount: loan.amount,
            shock,
        }
    }
}
