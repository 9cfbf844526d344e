use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Expected exactly {expected} distinct {dimension} values in sub-panel, found {found}")]
    InvalidInput {
        dimension: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Variables are not a sector/base-sector pair: {child:?} is not a child of {base:?}")]
    NotABaseSectorPair { child: String, base: String },
}
