//! Timestamp resolution across the feed's inconsistent encodings.
//!
//! Different endpoints and intervals of the upstream feed emit compact
//! calendar strings (`20250303 09:30:00`, `20250303`), ISO literals, or bare
//! epoch numbers at second or millisecond granularity. [`TimestampParser`]
//! tries an ordered list of recognizers and takes the first match. It never
//! fails: text nothing recognizes resolves to the current wall-clock time.

use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use std::fmt;
use tracing::{debug, warn};

use crate::ports::clock_port::Clock;

/// Epoch seconds of 2000-01-01T00:00:00Z.
pub const EPOCH_2000: i64 = 946_684_800;
/// Epoch seconds of 2050-01-01T00:00:00Z.
pub const EPOCH_2050: i64 = 2_524_608_000;

const MILLIS_PER_SECOND: i64 = 1_000;

/// Offset-carrying literals, tried after RFC 3339.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

/// Literals without an offset; interpreted in the parser's local zone.
const LOCAL_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
];

/// Non-ISO date-only literals; local midnight.
const LOCAL_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y.%m.%d"];

/// Which recognizer produced a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampForm {
    CompactDateTime,
    CompactDate,
    IsoLiteral,
    EpochMillis,
    EpochSeconds,
    GenericLiteral,
    WallClock,
}

impl fmt::Display for TimestampForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimestampForm::CompactDateTime => "compact-datetime",
            TimestampForm::CompactDate => "compact-date",
            TimestampForm::IsoLiteral => "iso-literal",
            TimestampForm::EpochMillis => "epoch-millis",
            TimestampForm::EpochSeconds => "epoch-seconds",
            TimestampForm::GenericLiteral => "generic-literal",
            TimestampForm::WallClock => "wall-clock",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTimestamp {
    pub seconds: i64,
    pub form: TimestampForm,
}

/// The zone calendar times without an explicit offset are read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalZone {
    /// The host's local time zone.
    #[default]
    System,
    Fixed(FixedOffset),
}

impl LocalZone {
    pub fn utc() -> Self {
        LocalZone::Fixed(Utc.fix())
    }

    /// Parses `local`, `utc`, `Z`, or a `±HH:MM` / `±HHMM` offset.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text.to_ascii_lowercase().as_str() {
            "local" | "system" => return Some(LocalZone::System),
            "utc" | "z" => return Some(LocalZone::utc()),
            _ => {}
        }

        let (sign, rest) = match text.as_bytes().first()? {
            b'+' => (1, &text[1..]),
            b'-' => (-1, &text[1..]),
            _ => return None,
        };
        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let hours: i32 = digits[..2].parse().ok()?;
        let minutes: i32 = digits[2..].parse().ok()?;
        if minutes >= 60 {
            return None;
        }
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).map(LocalZone::Fixed)
    }

    /// Epoch seconds of a wall-clock time in this zone. Ambiguous times take
    /// the earliest instant; times skipped by a DST gap have none.
    pub fn to_epoch(&self, naive: NaiveDateTime) -> Option<i64> {
        match self {
            LocalZone::System => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.timestamp()),
            LocalZone::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.timestamp()),
        }
    }
}

impl fmt::Display for LocalZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalZone::System => f.write_str("local"),
            LocalZone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// True when `seconds` lies in the plausible feed window [2000, 2050].
pub fn in_plausible_window(seconds: i64) -> bool {
    (EPOCH_2000..=EPOCH_2050).contains(&seconds)
}

type Recognizer<C> = fn(&TimestampParser<C>, &str) -> Option<ParsedTimestamp>;

pub struct TimestampParser<C> {
    zone: LocalZone,
    clock: C,
}

impl<C: Clock> TimestampParser<C> {
    pub fn new(zone: LocalZone, clock: C) -> Self {
        Self { zone, clock }
    }

    /// Epoch seconds for `input`; see [`TimestampParser::resolve`].
    pub fn parse(&self, input: &str) -> i64 {
        self.resolve(input).seconds
    }

    /// Resolves `input`, reporting which form matched.
    pub fn resolve(&self, input: &str) -> ParsedTimestamp {
        let input = input.trim();
        if input.is_empty() {
            debug!("empty timestamp, using wall-clock time");
            return self.wall_clock();
        }

        let recognizers: [Recognizer<C>; 4] = [
            Self::compact_date_time,
            Self::compact_date,
            Self::iso_literal,
            Self::epoch_digits,
        ];
        if let Some(parsed) = recognizers.iter().find_map(|recognize| recognize(self, input)) {
            return parsed;
        }

        if let Some(seconds) = self.generic_literal(input) {
            return ParsedTimestamp {
                seconds,
                form: TimestampForm::GenericLiteral,
            };
        }

        warn!(input, "unrecognized timestamp, using wall-clock time");
        self.wall_clock()
    }

    fn wall_clock(&self) -> ParsedTimestamp {
        ParsedTimestamp {
            seconds: self.clock.now_epoch_seconds(),
            form: TimestampForm::WallClock,
        }
    }

    /// `YYYYMMDD HH:MM:SS`
    fn compact_date_time(&self, input: &str) -> Option<ParsedTimestamp> {
        let (date, time) = input.split_once(' ')?;
        let date = parse_compact_date(date)?;
        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M:%S").ok()?;
        let seconds = self.zone.to_epoch(date.and_time(time))?;
        Some(ParsedTimestamp {
            seconds,
            form: TimestampForm::CompactDateTime,
        })
    }

    /// `YYYYMMDD`
    fn compact_date(&self, input: &str) -> Option<ParsedTimestamp> {
        let date = parse_compact_date(input)?;
        let seconds = self.zone.to_epoch(date.and_time(NaiveTime::MIN))?;
        Some(ParsedTimestamp {
            seconds,
            form: TimestampForm::CompactDate,
        })
    }

    fn iso_literal(&self, input: &str) -> Option<ParsedTimestamp> {
        if !input.contains(['T', '-']) {
            return None;
        }
        let seconds = self.generic_literal(input)?;
        Some(ParsedTimestamp {
            seconds,
            form: TimestampForm::IsoLiteral,
        })
    }

    fn epoch_digits(&self, input: &str) -> Option<ParsedTimestamp> {
        if !input.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: i64 = input.parse().ok()?;

        let millis = |value: i64| ParsedTimestamp {
            seconds: value.div_euclid(MILLIS_PER_SECOND),
            form: TimestampForm::EpochMillis,
        };
        let seconds = |value: i64| ParsedTimestamp {
            seconds: value,
            form: TimestampForm::EpochSeconds,
        };

        match input.len() {
            13 => Some(millis(value)),
            10 => Some(seconds(value)),
            _ if in_plausible_window(value) => Some(seconds(value)),
            _ if in_plausible_window(value.div_euclid(MILLIS_PER_SECOND)) => Some(millis(value)),
            _ => None,
        }
    }

    /// General-purpose literal parsing, floored to whole seconds.
    fn generic_literal(&self, input: &str) -> Option<i64> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Some(dt.timestamp());
        }
        for format in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(input, format) {
                return Some(dt.timestamp());
            }
        }
        for format in LOCAL_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
                return self.zone.to_epoch(naive);
            }
        }
        // ISO date-only literals are UTC midnight, unlike every other
        // offset-less form.
        if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            return Some(date.and_time(NaiveTime::MIN).and_utc().timestamp());
        }
        for format in LOCAL_DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(input, format) {
                return self.zone.to_epoch(date.and_time(NaiveTime::MIN));
            }
        }
        DateTime::parse_from_rfc2822(input)
            .ok()
            .map(|dt| dt.timestamp())
    }
}

/// Strict `YYYYMMDD`: exactly eight digits forming a real calendar day.
pub fn parse_compact_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = text[..4].parse().ok()?;
    let month: u32 = text[4..6].parse().ok()?;
    let day: u32 = text[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
