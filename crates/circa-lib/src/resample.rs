use chrono::{DateTime, Duration, Utc};
use log::debug;
use std::cmp::Ordering;

use crate::error::{AnalysisError, Result};
use crate::signal::round4;

/// Re-express a series at `target_epoch_s` second spacing.
///
/// The source is read as a step function: sample `i` holds over
/// `[t0 + i*src, t0 + (i+1)*src)`, where `src` is the first gap of the input.
/// Upsampled bins inside a single step copy its value; bins straddling steps
/// take the overlap-weighted average. Downsampled bins each consume
/// `ceil(target/src)` steps weighted `src/target`, and trailing steps that do
/// not fill a bin are dropped. Combined values are rounded to 4 decimals.
pub fn resample(
    timestamps: &[DateTime<Utc>],
    values: &[f64],
    target_epoch_s: u64,
) -> Result<(Vec<DateTime<Utc>>, Vec<f64>)> {
    if timestamps.is_empty() || values.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    if timestamps.len() != values.len() {
        return Err(AnalysisError::SizeMismatch {
            timestamps: timestamps.len(),
            values: values.len(),
        });
    }
    if target_epoch_s == 0 {
        return Err(AnalysisError::InvalidInput(
            "target epoch must be a positive number of seconds".into(),
        ));
    }
    let step = i64::try_from(target_epoch_s)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| {
            AnalysisError::InvalidInput(format!(
                "target epoch of {}s is out of range",
                target_epoch_s
            ))
        })?;
    if timestamps.len() < 2 {
        return Err(AnalysisError::InvalidInput(
            "at least two samples are needed to infer the source epoch".into(),
        ));
    }
    let first_gap = (timestamps[1] - timestamps[0]).num_seconds();
    if first_gap <= 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "first gap of {}s is not a usable source epoch",
            first_gap
        )));
    }
    let source_s = first_gap as u64;

    let resampled = match target_epoch_s.cmp(&source_s) {
        Ordering::Equal => return Ok((timestamps.to_vec(), values.to_vec())),
        Ordering::Less => split_steps(values, source_s, target_epoch_s),
        Ordering::Greater => merge_steps(values, source_s, target_epoch_s),
    };
    debug!(
        "resampled {} samples @ {}s into {} samples @ {}s",
        values.len(),
        source_s,
        resampled.len(),
        target_epoch_s
    );

    let start = timestamps[0];
    let grid = (0..resampled.len())
        .map(|k| {
            i32::try_from(k)
                .ok()
                .and_then(|k| step.checked_mul(k))
                .and_then(|offset| start.checked_add_signed(offset))
                .ok_or_else(|| {
                    AnalysisError::InvalidInput(format!(
                        "bin {} at {}s spacing falls outside the representable time range",
                        k, target_epoch_s
                    ))
                })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((grid, resampled))
}

fn split_steps(values: &[f64], source_s: u64, target_s: u64) -> Vec<f64> {
    let covered = values.len() as u64 * source_s;
    let bins = covered / target_s;
    let mut out = Vec::with_capacity(bins as usize);
    for k in 0..bins {
        let start = k * target_s;
        let end = start + target_s;
        let first = (start / source_s) as usize;
        let last = ((end - 1) / source_s) as usize;
        if first == last {
            out.push(values[first]);
            continue;
        }
        let mut acc = 0.0;
        for (j, value) in values.iter().enumerate().take(last + 1).skip(first) {
            let lo = start.max(j as u64 * source_s);
            let hi = end.min((j as u64 + 1) * source_s);
            acc += (hi - lo) as f64 / target_s as f64 * value;
        }
        out.push(round4(acc));
    }
    out
}

fn merge_steps(values: &[f64], source_s: u64, target_s: u64) -> Vec<f64> {
    let group = target_s.div_ceil(source_s) as usize;
    let weight = source_s as f64 / target_s as f64;
    values
        .chunks_exact(group)
        .map(|chunk| round4(chunk.iter().map(|v| v * weight).sum()))
        .collect()
}
