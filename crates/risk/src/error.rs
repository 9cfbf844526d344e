use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Attribution(#[from] attribution::AttributionError),
}
