use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::epoch::detect_epoch;
use crate::error::{AnalysisError, Result};
use crate::metrics::{
    amplitude::relative_amplitude,
    variability::intradaily_variability,
    window::{l_statistic, m_statistic},
};
use crate::resample::resample;
use crate::signal::{ActivitySeries, WindowExtremum};

/// Non-parametric rhythm descriptors of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RhythmSummary {
    /// Epoch the windows were computed at.
    pub epoch_s: u64,
    pub samples: usize,
    pub m_hours: i64,
    pub l_hours: i64,
    pub most_active: WindowExtremum,
    pub least_active: WindowExtremum,
    pub relative_amplitude: f64,
    /// `None` when the series is too short or flat for IV.
    pub intradaily_variability: Option<f64>,
}

/// Resample if configured, then compute M/L windows, RA and IV.
pub fn summarize(series: &ActivitySeries, config: &AnalysisConfig) -> Result<RhythmSummary> {
    let native_epoch = detect_epoch(&series.timestamps);
    let resampled;
    let (timestamps, values, epoch_s) = match config.resample_epoch_s {
        Some(target) if target != native_epoch => {
            info!("resampling from {}s to {}s", native_epoch, target);
            resampled = resample(&series.timestamps, &series.values, target)?;
            (&resampled.0[..], &resampled.1[..], target)
        }
        _ => (&series.timestamps[..], &series.values[..], native_epoch),
    };

    let most_active = m_statistic(config.m_hours, timestamps, values)?;
    let least_active = l_statistic(config.l_hours, timestamps, values)?;
    let amplitude = relative_amplitude(most_active.mean, least_active.mean)?;
    let variability = match intradaily_variability(timestamps, values) {
        Ok(iv) => Some(iv),
        Err(err @ (AnalysisError::InsufficientSpan { .. } | AnalysisError::InvalidInput(_))) => {
            warn!("skipping intradaily variability: {}", err);
            None
        }
        Err(err) => return Err(err),
    };

    Ok(RhythmSummary {
        epoch_s,
        samples: values.len(),
        m_hours: config.m_hours,
        l_hours: config.l_hours,
        most_active,
        least_active,
        relative_amplitude: amplitude,
        intradaily_variability: variability,
    })
}
