use thiserror::Error;

/// Structural failures only. Malformed individual rows, unknown task
/// columns and unknown employees degrade to permissive fallbacks instead
/// of surfacing here.
#[derive(Error, Debug)]
pub enum TimesheetError {
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("invalid row: {0}")]
    Validation(String),
    #[error("dataset contains no rows")]
    Empty,
    #[error("malformed csv: {0}")]
    Csv(String),
}

impl From<csv::Error> for TimesheetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}
