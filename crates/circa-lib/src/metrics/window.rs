use chrono::{DateTime, Utc};
use log::debug;

use crate::epoch::detect_epoch;
use crate::error::{AnalysisError, Result};
use crate::signal::{round4, Direction, WindowExtremum};

const SECONDS_PER_HOUR: u64 = 3600;

/// Find the `hours`-long run of consecutive samples with the highest or lowest mean.
///
/// The width in samples follows from the detected epoch, so minute data uses
/// 60 samples per hour and hourly data one. A window is eligible only when its
/// wall-clock end does not pass the last timestamp. Earlier windows win ties.
pub fn find_window_extremum(
    hours: i64,
    direction: Direction,
    timestamps: &[DateTime<Utc>],
    values: &[f64],
) -> Result<WindowExtremum> {
    if timestamps.is_empty() || values.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    if timestamps.len() != values.len() {
        return Err(AnalysisError::SizeMismatch {
            timestamps: timestamps.len(),
            values: values.len(),
        });
    }
    if hours <= 0 {
        return Err(AnalysisError::InvalidHours(hours));
    }
    let available = (timestamps[timestamps.len() - 1] - timestamps[0]).num_hours();
    if hours > available {
        return Err(AnalysisError::HoursExceedsRange {
            requested: hours,
            available,
        });
    }

    let epoch_s = detect_epoch(timestamps);
    if epoch_s == 0 {
        return Err(AnalysisError::InvalidInput(
            "sampling epoch could not be determined".into(),
        ));
    }
    let width = ((hours as u64 * SECONDS_PER_HOUR) / epoch_s).max(1) as usize;
    let n = values.len();
    if width >= n {
        return Err(AnalysisError::HoursExceedsRange {
            requested: hours,
            available,
        });
    }
    let last_start = n - 1 - width;
    debug!(
        "{:?} {}h window: {} samples @ {}s, {} candidates",
        direction,
        hours,
        width,
        epoch_s,
        last_start + 1
    );

    let mut sum: f64 = values[..width].iter().sum();
    let mut best_mean = round4(sum / width as f64);
    let mut best_start = 0;
    for start in 1..=last_start {
        sum += values[start + width - 1] - values[start - 1];
        let mean = round4(sum / width as f64);
        if direction.improves(mean, best_mean) {
            best_mean = mean;
            best_start = start;
        }
    }

    Ok(WindowExtremum {
        mean: best_mean,
        onset: timestamps[best_start],
    })
}

/// Most active window, e.g. M10 with `hours = 10`.
pub fn m_statistic(
    hours: i64,
    timestamps: &[DateTime<Utc>],
    values: &[f64],
) -> Result<WindowExtremum> {
    find_window_extremum(hours, Direction::Highest, timestamps, values)
}

/// Least active window, e.g. L5 with `hours = 5`.
pub fn l_statistic(
    hours: i64,
    timestamps: &[DateTime<Utc>],
    values: &[f64],
) -> Result<WindowExtremum> {
    find_window_extremum(hours, Direction::Lowest, timestamps, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::ActivitySeries;
    use chrono::{Duration, TimeZone};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const HOURLY: [f64; 12] = [
        450.0, 50.0, 25.0, 20.0, 100.0, 500.0, 250.0, 990.0, 130.0, 540.0, 40.0, 50.0,
    ];

    fn at(year: i32, hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 1, 1, hour, min, 0).unwrap()
    }

    fn hourly() -> ActivitySeries {
        ActivitySeries::uniform(at(2015, 1, 0), 3600, HOURLY.to_vec())
    }

    fn descending_minutes() -> ActivitySeries {
        let values = (0..720).map(|i| (720 - i) as f64).collect();
        ActivitySeries::uniform(at(2016, 0, 1), 60, values)
    }

    #[test]
    fn rejects_invalid_parameters() {
        let series = ActivitySeries::uniform(at(2015, 1, 0), 3600, HOURLY[..8].to_vec());
        let ts = &series.timestamps;
        for direction in [Direction::Highest, Direction::Lowest] {
            assert_eq!(
                find_window_extremum(5, direction, &[], &[]),
                Err(AnalysisError::EmptyInput)
            );
            assert_eq!(
                find_window_extremum(5, direction, ts, &[]),
                Err(AnalysisError::EmptyInput)
            );
            assert_eq!(
                find_window_extremum(5, direction, ts, &HOURLY[..7]),
                Err(AnalysisError::SizeMismatch {
                    timestamps: 8,
                    values: 7
                })
            );
            assert_eq!(
                find_window_extremum(0, direction, ts, &series.values),
                Err(AnalysisError::InvalidHours(0))
            );
            assert_eq!(
                find_window_extremum(-3, direction, ts, &series.values),
                Err(AnalysisError::InvalidHours(-3))
            );
            assert_eq!(
                find_window_extremum(20, direction, ts, &series.values),
                Err(AnalysisError::HoursExceedsRange {
                    requested: 20,
                    available: 7
                })
            );
        }
    }

    #[test]
    fn most_active_hourly_windows() {
        let series = hourly();
        let cases = [
            (1, 990.0, 8),
            (2, 620.0, 7),
            (5, 482.0, 6),
            (6, 418.3333, 5),
            (7, 364.2857, 5),
            (10, 305.5, 1),
        ];
        for (hours, mean, onset_hour) in cases {
            let found = m_statistic(hours, &series.timestamps, &series.values).unwrap();
            assert_eq!(found.mean, mean, "{}h", hours);
            assert_eq!(found.onset, at(2015, onset_hour, 0), "{}h", hours);
        }
    }

    #[test]
    fn least_active_minute_windows() {
        let series = descending_minutes();
        let cases = [
            (1, 31.5, 11),
            (2, 61.5, 10),
            (4, 121.5, 8),
            (6, 181.5, 6),
            (7, 211.5, 5),
            (10, 301.5, 2),
        ];
        for (hours, mean, onset_hour) in cases {
            let found = l_statistic(hours, &series.timestamps, &series.values).unwrap();
            assert_eq!(found.mean, mean, "{}h", hours);
            assert_eq!(found.onset, at(2016, onset_hour, 0), "{}h", hours);
        }
    }

    #[test]
    fn first_window_wins_ties() {
        let series = ActivitySeries::uniform(at(2015, 0, 0), 3600, vec![5.0; 10]);
        for direction in [Direction::Highest, Direction::Lowest] {
            let found =
                find_window_extremum(3, direction, &series.timestamps, &series.values).unwrap();
            assert_eq!(found.mean, 5.0);
            assert_eq!(found.onset, series.timestamps[0]);
        }
    }

    #[test]
    fn window_spanning_whole_range() {
        let series = hourly();
        let found = m_statistic(11, &series.timestamps, &series.values).unwrap();
        let expected: f64 = HOURLY[..11].iter().sum::<f64>() / 11.0;
        assert_eq!(found.mean, round4(expected));
        assert_eq!(found.onset, series.timestamps[0]);
    }

    #[test]
    fn sparse_series_leaves_no_eligible_window() {
        // Three hours of wall clock but minute epoch: a 2h window needs 120 samples.
        let ts = vec![at(2015, 0, 0), at(2015, 0, 1), at(2015, 3, 0)];
        let values = [1.0, 2.0, 3.0];
        for direction in [Direction::Highest, Direction::Lowest] {
            assert_eq!(
                find_window_extremum(2, direction, &ts, &values),
                Err(AnalysisError::HoursExceedsRange {
                    requested: 2,
                    available: 3
                })
            );
        }
    }

    #[test]
    fn undetermined_epoch_is_invalid_input() {
        let t0 = at(2015, 0, 0);
        let mut ts = vec![t0; 6];
        ts.push(t0 + Duration::hours(3));
        let values = vec![1.0; 7];
        assert!(matches!(
            m_statistic(1, &ts, &values),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn highest_never_below_lowest() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let values = (0..48 * 4).map(|_| rng.gen_range(0.0..2000.0)).collect();
            let series = ActivitySeries::uniform(at(2015, 0, 0), 900, values);
            for hours in [1, 5, 10] {
                let m = m_statistic(hours, &series.timestamps, &series.values).unwrap();
                let l = l_statistic(hours, &series.timestamps, &series.values).unwrap();
                assert!(m.mean >= l.mean);
            }
        }
    }
}
