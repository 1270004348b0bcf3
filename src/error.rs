use polars::prelude::PolarsError;
use std::fmt;

#[derive(Debug)]
pub enum AnalysisError {
    /// A required column is absent from the record set. Fatal for the run.
    MissingField { column: String },
    /// A required date is null or unresolvable on the named record.
    InvalidDate { record_id: String, field: String },
    /// Percent-complete outside the 0..=100 range.
    InvalidPercent { record_id: String, value: i64 },
    /// Planned duration below zero.
    InvalidDays { record_id: String, value: i64 },
    /// Identifier appears more than once in the record set.
    DuplicateId { id: String },
    /// The dependency column could not be read as text.
    GraphBuild { column: String, source: PolarsError },
    /// A source group resolved to zero records.
    EmptyGroup { source: String },
    /// A tunable surface (span thresholds) is malformed.
    InvalidConfig { message: String },
    /// Any other DataFrame-level failure.
    Frame(PolarsError),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::MissingField { column } => {
                write!(f, "record set is missing required column '{column}'")
            }
            AnalysisError::InvalidDate { record_id, field } => {
                write!(f, "record '{record_id}' has no resolvable date in '{field}'")
            }
            AnalysisError::InvalidPercent { record_id, value } => {
                write!(
                    f,
                    "record '{record_id}' has pct_progress {value} outside 0..=100"
                )
            }
            AnalysisError::InvalidDays { record_id, value } => {
                write!(f, "record '{record_id}' has negative planned days {value}")
            }
            AnalysisError::DuplicateId { id } => {
                write!(f, "record id '{id}' appears more than once")
            }
            AnalysisError::GraphBuild { column, source } => {
                write!(f, "dependency column '{column}' is not readable as text: {source}")
            }
            AnalysisError::EmptyGroup { source } => {
                write!(f, "source group '{source}' resolved to zero records")
            }
            AnalysisError::InvalidConfig { message } => {
                write!(f, "invalid configuration: {message}")
            }
            AnalysisError::Frame(err) => write!(f, "dataframe error: {err}"),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<PolarsError> for AnalysisError {
    fn from(value: PolarsError) -> Self {
        Self::Frame(value)
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
