//! Validated run configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::indicator::DEFAULT_MA_WINDOWS;
use crate::domain::interval::FeedRequest;
use crate::domain::timestamp::LocalZone;

pub const DEFAULT_OUTPUT: &str = "chart.json";

/// File format the feed adapter reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedSource {
    #[default]
    Json,
    Csv,
}

impl FeedSource {
    pub fn extension(self) -> &'static str {
        match self {
            FeedSource::Json => "json",
            FeedSource::Csv => "csv",
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FeedSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(FeedSource::Json),
            "csv" => Ok(FeedSource::Csv),
            other => Err(format!("unknown feed source {other:?} (expected json or csv)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub source: FeedSource,
    pub data_dir: PathBuf,
    pub request: FeedRequest,
    pub ma_windows: Vec<usize>,
    pub zone: LocalZone,
    pub output: PathBuf,
}

impl ChartConfig {
    pub fn default_windows() -> Vec<usize> {
        DEFAULT_MA_WINDOWS.to_vec()
    }
}
