use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Panel data source unavailable: {0}")]
    DataUnavailable(String),
}

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid {dimension} selector: {reason}")]
    InvalidSelector {
        dimension: &'static str,
        reason: String,
    },
}
