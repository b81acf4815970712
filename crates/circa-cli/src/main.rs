use anyhow::{Context, Result};
use circa_lib::{
    config::{read_config, AnalysisConfig},
    epoch::{detect_epoch, gap_histogram, GapCount},
    io::csv::{parse_activity_csv, read_activity_csv, write_activity_csv},
    metrics::{
        amplitude::relative_amplitude, summary::summarize, variability::intradaily_variability,
        window::find_window_extremum,
    },
    resample::resample,
    signal::{ActivitySeries, Direction},
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;
use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "circa",
    version,
    about = "circa: non-parametric circadian rhythm metrics for actigraphy"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum WindowKind {
    #[value(name = "highest")]
    Highest,
    #[value(name = "lowest")]
    Lowest,
}

impl From<WindowKind> for Direction {
    fn from(kind: WindowKind) -> Self {
        match kind {
            WindowKind::Highest => Direction::Highest,
            WindowKind::Lowest => Direction::Lowest,
        }
    }
}

/// Where to read the `timestamp,value` table from.
#[derive(Args)]
struct SeriesSource {
    /// CSV file; stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,
    /// Timestamp column [default: timestamp]
    #[arg(long)]
    timestamp_col: Option<String>,
    /// Activity column [default: value]
    #[arg(long)]
    value_col: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer the dominant sampling interval by majority vote over gaps
    DetectEpoch {
        #[command(flatten)]
        source: SeriesSource,
    },
    /// Re-express the series at a new epoch and print it as CSV
    Resample {
        #[command(flatten)]
        source: SeriesSource,
        /// Target epoch in seconds
        #[arg(long)]
        epoch: u64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Most or least active window of a fixed number of hours
    Extremum {
        #[command(flatten)]
        source: SeriesSource,
        #[arg(long, allow_negative_numbers = true)]
        hours: i64,
        #[arg(long, default_value = "highest")]
        direction: WindowKind,
    },
    /// Relative amplitude from M and L window means
    RelativeAmplitude {
        #[arg(long, allow_negative_numbers = true)]
        highest: f64,
        #[arg(long, allow_negative_numbers = true)]
        lowest: f64,
    },
    /// Intradaily variability of the series as given
    Variability {
        #[command(flatten)]
        source: SeriesSource,
    },
    /// M/L windows, relative amplitude and IV in one pass
    Summary {
        #[command(flatten)]
        source: SeriesSource,
        /// TOML analysis config; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        m_hours: Option<i64>,
        #[arg(long)]
        l_hours: Option<i64>,
        /// Resample to this epoch (seconds) before analysis
        #[arg(long)]
        epoch: Option<u64>,
    },
}

#[derive(Serialize)]
struct EpochReport {
    epoch_s: u64,
    samples: usize,
    gaps: Vec<GapCount>,
}

#[derive(Serialize)]
struct AmplitudeReport {
    relative_amplitude: f64,
}

#[derive(Serialize)]
struct VariabilityReport {
    intradaily_variability: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::DetectEpoch { source } => cmd_detect_epoch(&source)?,
        Commands::Resample { source, epoch, out } => {
            cmd_resample(&source, epoch, out.as_deref())?
        }
        Commands::Extremum {
            source,
            hours,
            direction,
        } => cmd_extremum(&source, hours, direction.into())?,
        Commands::RelativeAmplitude { highest, lowest } => {
            cmd_relative_amplitude(highest, lowest)?
        }
        Commands::Variability { source } => cmd_variability(&source)?,
        Commands::Summary {
            source,
            config,
            m_hours,
            l_hours,
            epoch,
        } => cmd_summary(&source, config.as_deref(), m_hours, l_hours, epoch)?,
    }
    Ok(())
}

fn load_series(source: &SeriesSource) -> Result<ActivitySeries> {
    let defaults = AnalysisConfig::default();
    load_series_with(
        source.input.as_deref(),
        source
            .timestamp_col
            .as_deref()
            .unwrap_or(defaults.timestamp_column.as_str()),
        source.value_col.as_deref().unwrap_or(defaults.value_column.as_str()),
    )
}

fn load_series_with(
    input: Option<&Path>,
    timestamp_col: &str,
    value_col: &str,
) -> Result<ActivitySeries> {
    let series = match input {
        Some(path) => read_activity_csv(path, timestamp_col, value_col)?,
        None => parse_activity_csv(io::stdin().lock(), timestamp_col, value_col)
            .context("reading series from stdin")?,
    };
    info!("loaded {} samples", series.len());
    Ok(series)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn cmd_detect_epoch(source: &SeriesSource) -> Result<()> {
    let series = load_series(source)?;
    print_json(&EpochReport {
        epoch_s: detect_epoch(&series.timestamps),
        samples: series.len(),
        gaps: gap_histogram(&series.timestamps),
    })
}

fn cmd_resample(source: &SeriesSource, epoch: u64, out: Option<&Path>) -> Result<()> {
    let series = load_series(source)?;
    let (timestamps, values) = resample(&series.timestamps, &series.values, epoch)?;
    match out {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_activity_csv(BufWriter::new(file), &timestamps, &values)
        }
        None => write_activity_csv(io::stdout().lock(), &timestamps, &values),
    }
}

fn cmd_extremum(source: &SeriesSource, hours: i64, direction: Direction) -> Result<()> {
    let series = load_series(source)?;
    let found = find_window_extremum(hours, direction, &series.timestamps, &series.values)?;
    print_json(&found)
}

fn cmd_relative_amplitude(highest: f64, lowest: f64) -> Result<()> {
    print_json(&AmplitudeReport {
        relative_amplitude: relative_amplitude(highest, lowest)?,
    })
}

fn cmd_variability(source: &SeriesSource) -> Result<()> {
    let series = load_series(source)?;
    print_json(&VariabilityReport {
        intradaily_variability: intradaily_variability(&series.timestamps, &series.values)?,
    })
}

fn cmd_summary(
    source: &SeriesSource,
    config_path: Option<&Path>,
    m_hours: Option<i64>,
    l_hours: Option<i64>,
    epoch: Option<u64>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => read_config(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(hours) = m_hours {
        config.m_hours = hours;
    }
    if let Some(hours) = l_hours {
        config.l_hours = hours;
    }
    if epoch.is_some() {
        config.resample_epoch_s = epoch;
    }
    if let Some(column) = &source.timestamp_col {
        config.timestamp_column = column.clone();
    }
    if let Some(column) = &source.value_col {
        config.value_column = column.clone();
    }
    let series = load_series_with(
        source.input.as_deref(),
        &config.timestamp_column,
        &config.value_column,
    )?;
    print_json(&summarize(&series, &config)?)
}
