use crate::error::{AnalysisError, Result};
use crate::signal::round4;

/// Relative amplitude `(M - L) / (M + L)`, rounded to 4 decimals.
///
/// Negative means are accepted as-is even though activity counts never are.
pub fn relative_amplitude(highest_mean: f64, lowest_mean: f64) -> Result<f64> {
    let denominator = highest_mean + lowest_mean;
    if denominator == 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "relative amplitude undefined for means {} and {}",
            highest_mean, lowest_mean
        )));
    }
    Ok(round4((highest_mean - lowest_mean) / denominator))
}
