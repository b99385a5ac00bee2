use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Not enough data to compute the report: no {0} in the input")]
    EmptyInput(&'static str),

    #[error("Snapshot is missing a referenced record: {0}")]
    MissingReference(String),
}
