use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One bucket of the consecutive-gap tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapCount {
    /// Gap between neighbouring samples, truncated to whole seconds.
    pub gap_s: i64,
    pub count: usize,
}

/// Count every consecutive gap, keeping buckets in order of first appearance.
pub fn gap_histogram(timestamps: &[DateTime<Utc>]) -> Vec<GapCount> {
    let mut buckets: Vec<GapCount> = Vec::new();
    let mut position: HashMap<i64, usize> = HashMap::new();
    for pair in timestamps.windows(2) {
        let gap_s = (pair[1] - pair[0]).num_seconds();
        match position.get(&gap_s) {
            Some(&idx) => buckets[idx].count += 1,
            None => {
                position.insert(gap_s, buckets.len());
                buckets.push(GapCount { gap_s, count: 1 });
            }
        }
    }
    buckets
}

/// Infer the dominant sampling interval in seconds by majority vote over gaps.
///
/// Returns `0` when fewer than two timestamps are given or when the winning
/// gap is not a positive duration. On a tie the gap seen first wins.
pub fn detect_epoch(timestamps: &[DateTime<Utc>]) -> u64 {
    if timestamps.len() < 2 {
        return 0;
    }
    let mut leader: Option<GapCount> = None;
    for bucket in gap_histogram(timestamps) {
        match leader {
            Some(best) if bucket.count <= best.count => {}
            _ => leader = Some(bucket),
        }
    }
    match leader {
        Some(best) if best.gap_s > 0 => {
            debug!(
                "epoch {}s won {} of {} gaps",
                best.gap_s,
                best.count,
                timestamps.len() - 1
            );
            best.gap_s as u64
        }
        Some(best) => {
            warn!(
                "dominant gap is {}s across {} pairs; epoch undetermined",
                best.gap_s, best.count
            );
            0
        }
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn extend(out: &mut Vec<DateTime<Utc>>, cursor: &mut DateTime<Utc>, n: usize, step_s: i64) {
        for _ in 0..n {
            *cursor = *cursor + Duration::seconds(step_s);
            out.push(*cursor);
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn uniform_spacing_is_detected() {
        for step in [5, 30, 60, 180] {
            let mut cursor = start();
            let mut ts = Vec::new();
            extend(&mut ts, &mut cursor, 120, step);
            assert_eq!(detect_epoch(&ts), step as u64);
        }
    }

    #[test]
    fn too_short_yields_zero() {
        assert_eq!(detect_epoch(&[]), 0);
        assert_eq!(detect_epoch(&[start()]), 0);
    }

    #[test]
    fn majority_survives_interruptions() {
        let mut cursor = start();
        let mut ts = Vec::new();
        extend(&mut ts, &mut cursor, 100, 120);
        extend(&mut ts, &mut cursor, 30, 60);
        extend(&mut ts, &mut cursor, 15, 30);
        extend(&mut ts, &mut cursor, 100, 120);
        assert_eq!(detect_epoch(&ts), 120);
    }

    #[test]
    fn three_way_tie_keeps_first_gap() {
        let mut cursor = start();
        let mut ts = Vec::new();
        extend(&mut ts, &mut cursor, 50, 360);
        extend(&mut ts, &mut cursor, 49, 240);
        extend(&mut ts, &mut cursor, 49, 120);
        let hist = gap_histogram(&ts);
        assert_eq!(
            hist,
            vec![
                GapCount { gap_s: 360, count: 49 },
                GapCount { gap_s: 240, count: 49 },
                GapCount { gap_s: 120, count: 49 },
            ]
        );
        assert_eq!(detect_epoch(&ts), 360);
    }

    #[test]
    fn identical_timestamps_are_not_an_epoch() {
        let ts = vec![start(); 250];
        assert_eq!(gap_histogram(&ts), vec![GapCount { gap_s: 0, count: 249 }]);
        assert_eq!(detect_epoch(&ts), 0);
    }

    #[test]
    fn sub_second_jitter_truncates() {
        let t0 = start();
        let ts = vec![
            t0,
            t0 + Duration::milliseconds(60_400),
            t0 + Duration::milliseconds(120_100),
            t0 + Duration::milliseconds(180_900),
        ];
        // gaps: 60.4s, 59.7s, 60.8s
        assert_eq!(detect_epoch(&ts), 60);
    }
}
