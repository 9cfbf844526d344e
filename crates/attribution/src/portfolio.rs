use crate::error::AttributionError;
use core_types::Loan;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// The exact column layout the loan portfolio CSV must carry, in order.
const PORTFOLIO_COLUMNS: [&str; 3] = ["region", "sector", "amount"];

/// Loads a loan portfolio from a CSV file.
///
/// The file must carry exactly the columns `region, sector, amount`, in that
/// order; any other layout is a [`AttributionError::Format`] raised before any
/// shock computation begins.
pub fn load_portfolio(path: impl AsRef<Path>) -> Result<Vec<Loan>, AttributionError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| AttributionError::Format(format!("cannot read {}: {e}", path.display())))?;
    let loans = parse_portfolio(file)?;
    info!(path = %path.display(), loans = loans.len(), "loan portfolio loaded");
    Ok(loans)
}

/// Parses a loan portfolio from any CSV reader.
pub fn parse_portfolio(reader: impl Read) -> Result<Vec<Loan>, AttributionError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AttributionError::Format(format!("cannot read header row: {e}")))?;
    let found: Vec<&str> = headers.iter().map(str::trim).collect();
    if found != PORTFOLIO_COLUMNS {
        return Err(AttributionError::Format(format!(
            "expected columns {PORTFOLIO_COLUMNS:?}, found {found:?}"
        )));
    }

    let mut loans = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|e| {
            AttributionError::Format(format!("malformed record at line {}: {e}", idx + 2))
        })?;
        let amount_field = record.get(2).unwrap_or("").trim();
        let amount: f64 = amount_field.parse().map_err(|_| {
            AttributionError::Format(format!(
                "invalid amount {amount_field:?} at line {}",
                idx + 2
            ))
        })?;
        loans.push(Loan {
            region: record.get(0).unwrap_or("").trim().to_string(),
            sector: record.get(1).unwrap_or("").trim().to_string(),
            amount,
        });
    }
    Ok(loans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_portfolio() {
        let csv = "\
region,sector,amount
AFRICA,Secondary Energy|Electricity,1000
EUROPE,Primary Energy|Coal,2500.5
";
        let loans = parse_portfolio(csv.as_bytes()).unwrap();
        assert_eq!(loans.len(), 2);
        assert_eq!(loans[0].region, "AFRICA");
        assert_eq!(loans[1].amount, 2500.5);
    }

    #[test]
    fn rejects_wrong_column_names_before_any_computation() {
        let csv = "region,sector,value\nAFRICA,Secondary Energy|Electricity,1000\n";
        let err = parse_portfolio(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AttributionError::Format(_)));
    }

    #[test]
    fn rejects_wrong_column_order() {
        let csv = "sector,region,amount\nSecondary Energy|Electricity,AFRICA,1000\n";
        let err = parse_portfolio(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AttributionError::Format(_)));
    }

    #[test]
    fn rejects_a_non_numeric_amount() {
        let csv = "region,sector,amount\nAFRICA,Secondary Energy|Electricity,lots\n";
        let err = parse_portfolio(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AttributionError::Format(_)));
    }

    #[test]
    fn loads_from_a_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "region,sector,amount").unwrap();
        writeln!(file, "AFRICA,Secondary Energy|Electricity,1000").unwrap();
        let loans = load_portfolio(file.path()).unwrap();
        assert_eq!(loans.len(), 1);
    }
}
