use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::signal::ActivitySeries;

/// Naive layouts tried after RFC 3339; all are read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Shortest integer part accepted as unix seconds (1973-03-03 onwards).
const MIN_UNIX_DIGITS: usize = 9;

/// Parse RFC 3339, a common naive date-time layout, a bare date, or unix seconds.
///
/// Unix seconds need at least nine integer digits, so a stray year or count
/// such as `2015` is rejected instead of landing in 1970.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    let whole_digits = raw.split('.').next().unwrap_or_default();
    if whole_digits.len() < MIN_UNIX_DIGITS
        || !whole_digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let secs: f64 = raw.parse().ok()?;
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

fn locate_column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .with_context(|| format!("missing column '{}'", name))
}

/// Read a headered `timestamp,value` table into a series.
pub fn parse_activity_csv<R: Read>(
    reader: R,
    timestamp_col: &str,
    value_col: &str,
) -> Result<ActivitySeries> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = reader.headers().context("reading header")?.clone();
    let ts_idx = locate_column(&headers, timestamp_col)?;
    let value_idx = locate_column(&headers, value_col)?;

    let mut timestamps = Vec::new();
    let mut values = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("reading row {}", idx + 1))?;
        let raw_ts = record.get(ts_idx).unwrap_or_default();
        let ts = parse_timestamp(raw_ts)
            .with_context(|| format!("row {}: unrecognised timestamp '{}'", idx + 1, raw_ts))?;
        let raw_value = record.get(value_idx).unwrap_or_default();
        let value: f64 = raw_value
            .parse()
            .with_context(|| format!("row {}: value is not f64: '{}'", idx + 1, raw_value))?;
        timestamps.push(ts);
        values.push(value);
    }
    if values.is_empty() {
        anyhow::bail!("no samples found");
    }
    Ok(ActivitySeries { timestamps, values })
}

pub fn read_activity_csv(
    path: &Path,
    timestamp_col: &str,
    value_col: &str,
) -> Result<ActivitySeries> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_activity_csv(file, timestamp_col, value_col)
        .with_context(|| format!("parsing {}", path.display()))
}

/// Write `timestamp,value` rows with RFC 3339 timestamps.
pub fn write_activity_csv<W: Write>(
    writer: W,
    timestamps: &[DateTime<Utc>],
    values: &[f64],
) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(["timestamp", "value"])?;
    for (ts, value) in timestamps.iter().zip(values) {
        writer.write_record([
            ts.to_rfc3339_opts(SecondsFormat::Secs, true),
            value.to_string(),
        ])?;
    }
    writer.flush().context("flushing csv output")?;
    Ok(())
}
