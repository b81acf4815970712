use chrono::{DateTime, Utc};

use crate::error::{AnalysisError, Result};
use crate::signal::round4;

const MIN_SPAN_HOURS: i64 = 2;

/// Intradaily variability: mean squared successive difference over variance.
///
/// `IV = n * sum((x[i] - x[i-1])^2) / ((n - 1) * sum((x[i] - mean)^2))`.
/// The series is used as given; resample to 3600s first for the hourly IV.
pub fn intradaily_variability(timestamps: &[DateTime<Utc>], values: &[f64]) -> Result<f64> {
    if timestamps.is_empty() || values.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    if timestamps.len() != values.len() {
        return Err(AnalysisError::SizeMismatch {
            timestamps: timestamps.len(),
            values: values.len(),
        });
    }
    let span = timestamps[timestamps.len() - 1] - timestamps[0];
    if span.num_hours() < MIN_SPAN_HOURS {
        return Err(AnalysisError::InsufficientSpan {
            required_hours: MIN_SPAN_HOURS,
            available_minutes: span.num_minutes(),
        });
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let deviation: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
    if deviation == 0.0 {
        return Err(AnalysisError::InvalidInput(
            "intradaily variability undefined for a constant series".into(),
        ));
    }
    let successive: f64 = values.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    Ok(round4((n * successive) / ((n - 1.0) * deviation)))
}
