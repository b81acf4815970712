use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Parameters for a full rhythm summary, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Width of the most-active window (M10 by convention).
    pub m_hours: i64,
    /// Width of the least-active window (L5 by convention).
    pub l_hours: i64,
    /// Resample to this epoch before analysis when set.
    pub resample_epoch_s: Option<u64>,
    pub timestamp_column: String,
    pub value_column: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            m_hours: 10,
            l_hours: 5,
            resample_epoch_s: None,
            timestamp_column: "timestamp".into(),
            value_column: "value".into(),
        }
    }
}

pub fn parse_config(text: &str) -> Result<AnalysisConfig> {
    toml::from_str(text).context("parsing analysis config")
}

pub fn read_config(path: &Path) -> Result<AnalysisConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("in {}", path.display()))
}
