//! Kline intervals and the request handed to a feed fetcher.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::domain::timestamp::parse_compact_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interval {
    Minute1,
    Minute5,
    Minute15,
    Minute30,
    Hour1,
    Hour4,
    #[default]
    Day1,
}

impl Interval {
    pub const ALL: [Interval; 7] = [
        Interval::Minute1,
        Interval::Minute5,
        Interval::Minute15,
        Interval::Minute30,
        Interval::Hour1,
        Interval::Hour4,
        Interval::Day1,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Hour1 => "1h",
            Interval::Hour4 => "4h",
            Interval::Day1 => "1d",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interval: {0:?}")]
pub struct UnknownInterval(pub String);

impl FromStr for Interval {
    type Err = UnknownInterval;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Interval::ALL
            .into_iter()
            .find(|i| i.tag() == tag)
            .ok_or_else(|| UnknownInterval(tag.to_string()))
    }
}

/// What the feed fetcher is asked for: `code` between `from` and `to`
/// inclusive, at `interval`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub code: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub interval: Interval,
}

impl FeedRequest {
    /// True when `date` (a `YYYYMMDD` string) falls inside the range, or
    /// cannot be read as a date at all.
    pub fn admits_date(&self, date: Option<&str>) -> bool {
        match date.and_then(parse_compact_date) {
            Some(day) => day >= self.from && day <= self.to,
            None => true,
        }
    }
}
