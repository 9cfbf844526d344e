use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttributionError {
    #[error("Loan portfolio format error: {0}")]
    Format(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No shock data for region={region}, sector={sector}, year={year}")]
    NoData {
        region: String,
        sector: String,
        year: i32,
    },

    #[error("Scenario panel has no data for model={model}, scenarios=[{baseline}, {reference}]")]
    NoPanelData {
        model: String,
        baseline: String,
        reference: String,
    },

    #[error(transparent)]
    Metrics(#[from] metrics::MetricsError),

    #[error(transparent)]
    Query(#[from] panel_store::QueryError),
}
