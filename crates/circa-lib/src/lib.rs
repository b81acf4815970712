pub mod config;
pub mod epoch;
pub mod error;
pub mod io;
pub mod metrics;
pub mod resample;
pub mod signal;

pub use config::AnalysisConfig;
pub use epoch::{detect_epoch, gap_histogram, GapCount};
pub use error::{AnalysisError, Result};
pub use metrics::*;
pub use resample::resample;
pub use signal::*;
