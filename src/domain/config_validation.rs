//! Configuration validation.
//!
//! Checks every `[feed]` and `[chart]` field before a run, and provides the
//! field parsers the CLI builds [`ChartConfig`] with.
//!
//! [`ChartConfig`]: crate::domain::chart_config::ChartConfig

use chrono::NaiveDate;

use crate::domain::chart_config::{ChartConfig, FeedSource};
use crate::domain::error::KlineError;
use crate::domain::interval::Interval;
use crate::domain::timestamp::{LocalZone, parse_compact_date};
use crate::ports::config_port::ConfigPort;

pub fn validate_feed_config(config: &dyn ConfigPort) -> Result<(), KlineError> {
    parse_source(config)?;
    require(config, "feed", "data_dir")?;
    require(config, "feed", "code")?;
    parse_interval(config)?;
    let from = parse_feed_date(config, "from")?;
    let to = parse_feed_date(config, "to")?;

    if from > to {
        return Err(invalid("feed", "from", "from must not be after to"));
    }
    Ok(())
}

pub fn validate_chart_config(config: &dyn ConfigPort) -> Result<(), KlineError> {
    parse_ma_windows(config)?;
    parse_zone(config)?;
    Ok(())
}

/// `[feed] source`, default `json`.
pub fn parse_source(config: &dyn ConfigPort) -> Result<FeedSource, KlineError> {
    match config.get_string("feed", "source") {
        None => Ok(FeedSource::default()),
        Some(s) => s
            .parse::<FeedSource>()
            .map_err(|reason| invalid("feed", "source", &reason)),
    }
}

/// `[feed] interval`, default `1d`. Unlike the lenient wire parsing, a
/// typo here is an error.
pub fn parse_interval(config: &dyn ConfigPort) -> Result<Interval, KlineError> {
    match config.get_string("feed", "interval") {
        None => Ok(Interval::default()),
        Some(s) if s.trim().is_empty() => Ok(Interval::default()),
        Some(s) => s
            .parse::<Interval>()
            .map_err(|e| invalid("feed", "interval", &e.to_string())),
    }
}

/// `[feed] from` / `[feed] to`, `YYYYMMDD`.
pub fn parse_feed_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, KlineError> {
    let value = require(config, "feed", key)?;
    parse_compact_date(value.trim()).ok_or_else(|| {
        invalid(
            "feed",
            key,
            &format!("invalid {key} date {value:?}, expected YYYYMMDD"),
        )
    })
}

/// `[chart] ma_windows`, default `5,10`. Every entry must be a positive
/// integer; an empty list disables overlays.
pub fn parse_ma_windows(config: &dyn ConfigPort) -> Result<Vec<usize>, KlineError> {
    let Some(entries) = config.get_list("chart", "ma_windows") else {
        return Ok(ChartConfig::default_windows());
    };

    entries
        .iter()
        .map(|entry| match entry.parse::<usize>() {
            Ok(window) if window > 0 => Ok(window),
            _ => Err(invalid(
                "chart",
                "ma_windows",
                &format!("window {entry:?} must be a positive integer"),
            )),
        })
        .collect()
}

/// `[chart] utc_offset`, default the host's local zone.
pub fn parse_zone(config: &dyn ConfigPort) -> Result<LocalZone, KlineError> {
    match config.get_string("chart", "utc_offset") {
        None => Ok(LocalZone::System),
        Some(s) => LocalZone::parse(&s).ok_or_else(|| {
            invalid(
                "chart",
                "utc_offset",
                &format!("{s:?} is not local, utc, or a ±HH:MM offset"),
            )
        }),
    }
}

fn require(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, KlineError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(KlineError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> KlineError {
    KlineError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
