use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(
        "Duplicate observation for (model={model}, scenario={scenario}, region={region}, variable={variable}, year={year})"
    )]
    DuplicateObservation {
        model: String,
        scenario: String,
        region: String,
        variable: String,
        year: i32,
    },
}
