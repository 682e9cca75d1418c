//! Per-record coercion and validation.
//!
//! Decoding is shared by both output series; the price and volume checks run
//! independently on the decoded record, so one record can land in one series
//! and not the other.

use crate::domain::error::RejectReason;
use crate::domain::ohlcv::{BarColor, PricePoint, VolumePoint};
use crate::domain::raw_record::{FieldValue, RawRecord};
use crate::domain::timestamp::{EPOCH_2050, TimestampForm, TimestampParser};
use crate::ports::clock_port::Clock;

/// Resolved values above this are millisecond timestamps that slipped
/// through and get scaled down.
pub const MILLIS_CLAMP_THRESHOLD: i64 = EPOCH_2050 * 1_000;

/// A record whose fields are all numbers and whose time is resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedRecord {
    pub time: i64,
    pub time_form: TimestampForm,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub amount: Option<f64>,
}

/// Coerces one field. Numbers pass as-is, text must be a float literal, and
/// NaN from either is rejected.
pub fn coerce_number(field: &'static str, value: &FieldValue) -> Result<f64, RejectReason> {
    match value {
        FieldValue::Number(n) if n.is_nan() => Err(RejectReason::NonNumericField {
            field,
            text: "NaN".into(),
        }),
        FieldValue::Number(n) => Ok(*n),
        FieldValue::Text(text) => match text.trim().parse::<f64>() {
            Ok(n) if !n.is_nan() => Ok(n),
            _ => Err(RejectReason::NonNumericField {
                field,
                text: text.clone(),
            }),
        },
        FieldValue::Missing => Err(RejectReason::MissingField { field }),
        FieldValue::Other(_) => Err(RejectReason::UnsupportedFieldType { field }),
    }
}

/// Scales a millisecond value down when it lies far past the 2050 bound.
pub fn clamp_millis(seconds: i64) -> i64 {
    if seconds > MILLIS_CLAMP_THRESHOLD {
        seconds / 1_000
    } else {
        seconds
    }
}

pub struct RecordValidator<'a, C> {
    parser: &'a TimestampParser<C>,
}

impl<'a, C: Clock> RecordValidator<'a, C> {
    pub fn new(parser: &'a TimestampParser<C>) -> Self {
        Self { parser }
    }

    pub fn decode(&self, record: &RawRecord) -> Result<DecodedRecord, RejectReason> {
        let source = record.time_source().ok_or(RejectReason::MissingTimestamp)?;

        let open = coerce_number("open", &record.open)?;
        let high = coerce_number("high", &record.high)?;
        let low = coerce_number("low", &record.low)?;
        let close = coerce_number("close", &record.close)?;
        let volume = coerce_number("volume", &record.volume)?;
        let amount = coerce_number("amount", &record.amount).ok();

        let resolved = self.parser.resolve(&source);
        Ok(DecodedRecord {
            time: clamp_millis(resolved.seconds),
            time_form: resolved.form,
            open,
            high,
            low,
            close,
            volume,
            amount,
        })
    }
}

/// Price-series check: finite OHLC, `high >= low`, non-negative high and low.
pub fn price_point(record: &DecodedRecord) -> Result<PricePoint, RejectReason> {
    for (field, value) in [
        ("open", record.open),
        ("high", record.high),
        ("low", record.low),
        ("close", record.close),
    ] {
        if !value.is_finite() {
            return Err(RejectReason::NonFiniteField { field });
        }
    }
    if record.high < record.low {
        return Err(RejectReason::HighBelowLow {
            high: record.high,
            low: record.low,
        });
    }
    for (field, value) in [("high", record.high), ("low", record.low)] {
        if value < 0.0 {
            return Err(RejectReason::NegativePrice { field, value });
        }
    }

    Ok(PricePoint {
        time: record.time,
        open: record.open,
        high: record.high,
        low: record.low,
        close: record.close,
    })
}

/// Volume-series check: finite non-negative volume, finite open and close
/// for the bar color.
pub fn volume_point(record: &DecodedRecord) -> Result<VolumePoint, RejectReason> {
    if !record.volume.is_finite() {
        return Err(RejectReason::NonFiniteField { field: "volume" });
    }
    if record.volume < 0.0 {
        return Err(RejectReason::NegativeVolume {
            value: record.volume,
        });
    }
    for (field, value) in [("open", record.open), ("close", record.close)] {
        if !value.is_finite() {
            return Err(RejectReason::NonFiniteField { field });
        }
    }

    Ok(VolumePoint {
        time: record.time,
        value: record.volume,
        color: BarColor::from_open_close(record.open, record.close),
    })
}
