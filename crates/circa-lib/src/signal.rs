use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Activity counts paired with their UTC timestamps, ordered ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySeries {
    pub timestamps: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
}

impl ActivitySeries {
    /// Build a series, rejecting empty or mismatched columns.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.is_empty() || values.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        if timestamps.len() != values.len() {
            return Err(AnalysisError::SizeMismatch {
                timestamps: timestamps.len(),
                values: values.len(),
            });
        }
        Ok(Self { timestamps, values })
    }

    /// Evenly spaced series starting at `start`.
    pub fn uniform(start: DateTime<Utc>, epoch_s: i64, values: Vec<f64>) -> Self {
        let timestamps = (0..values.len())
            .map(|i| start + Duration::seconds(epoch_s * i as i64))
            .collect();
        Self { timestamps, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Wall-clock distance between the first and last sample.
    pub fn span(&self) -> Duration {
        match (self.timestamps.first(), self.timestamps.last()) {
            (Some(first), Some(last)) => *last - *first,
            _ => Duration::zero(),
        }
    }
}

/// Which extreme a window search is after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Highest,
    Lowest,
}

impl Direction {
    /// True when `candidate` should replace `best`. Ties keep the earlier window.
    pub fn improves(&self, candidate: f64, best: f64) -> bool {
        match self {
            Direction::Highest => candidate > best,
            Direction::Lowest => candidate < best,
        }
    }
}

/// Mean activity of the winning window and the timestamp of its first sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowExtremum {
    pub mean: f64,
    pub onset: DateTime<Utc>,
}

/// Round half away from zero to 4 decimal places.
pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
