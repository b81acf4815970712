use thiserror::Error;

/// Failures surfaced by the analysis entry points.
///
/// Every variant is produced before any computation starts; no partial result
/// accompanies an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("input series is empty")]
    EmptyInput,
    #[error("timestamps ({timestamps}) and values ({values}) differ in length")]
    SizeMismatch { timestamps: usize, values: usize },
    #[error("window width must be a positive number of hours, got {0}")]
    InvalidHours(i64),
    #[error("requested {requested} h window exceeds the {available} h covered by the data")]
    HoursExceedsRange { requested: i64, available: i64 },
    #[error("series spans {available_minutes} min, at least {required_hours} h required")]
    InsufficientSpan {
        required_hours: i64,
        available_minutes: i64,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
