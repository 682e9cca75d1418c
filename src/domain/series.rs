//! Assembly of raw feed records into the price and volume series.
//!
//! Each call decodes every record once; the price and volume checks then partition
//! the decoded records independently. Survivors are stably sorted by time, so
//! records sharing a timestamp keep their input order and repeated calls on
//! the same input give the same output. Duplicate timestamps are kept.

use tracing::{debug, info, warn};

use crate::domain::error::{KlineError, RejectReason};
use crate::domain::indicator::{MovingAverageOverlay, overlays};
use crate::domain::ohlcv::{PricePoint, VolumePoint};
use crate::domain::raw_record::RawRecord;
use crate::domain::timestamp::{TimestampForm, TimestampParser};
use crate::domain::validator::{DecodedRecord, RecordValidator, price_point, volume_point};
use crate::ports::clock_port::Clock;

/// A record left out of a series, by its position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub index: usize,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Partition<T> {
    pub accepted: Vec<T>,
    pub rejected: Vec<Rejection>,
}

impl<T> Partition<T> {
    pub fn total(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }
}

/// Everything the rendering consumer draws.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub price: Vec<PricePoint>,
    pub volume: Vec<VolumePoint>,
    pub overlays: Vec<MovingAverageOverlay>,
}

type Decoded = Result<DecodedRecord, RejectReason>;

pub struct SeriesTransformer<C> {
    parser: TimestampParser<C>,
}

impl<C: Clock> SeriesTransformer<C> {
    pub fn new(parser: TimestampParser<C>) -> Self {
        Self { parser }
    }

    pub fn parser(&self) -> &TimestampParser<C> {
        &self.parser
    }

    /// Decodes `records` on its own. A record timed by the wall clock can
    /// get a different time here than in [`Self::transform_volume`]; use
    /// [`Self::build_chart`] when both series must share one decode.
    pub fn transform_price(&self, records: &[RawRecord]) -> Vec<PricePoint> {
        self.partition_price(records).accepted
    }

    /// Decodes `records` on its own; see [`Self::transform_price`].
    pub fn transform_volume(&self, records: &[RawRecord]) -> Vec<VolumePoint> {
        self.partition_volume(records).accepted
    }

    pub fn partition_price(&self, records: &[RawRecord]) -> Partition<PricePoint> {
        assemble(&self.decode_all(records), "price", price_point)
    }

    pub fn partition_volume(&self, records: &[RawRecord]) -> Partition<VolumePoint> {
        assemble(&self.decode_all(records), "volume", volume_point)
    }

    /// Both series plus one moving-average overlay per window.
    ///
    /// Records are decoded once, so both series agree on every time.
    /// Fails only on a zero window.
    pub fn build_chart(
        &self,
        records: &[RawRecord],
        windows: &[usize],
    ) -> Result<ChartSeries, KlineError> {
        let decoded = self.decode_all(records);
        let price = assemble(&decoded, "price", price_point).accepted;
        let volume = assemble(&decoded, "volume", volume_point).accepted;
        let overlays = overlays(&price, windows)?;

        Ok(ChartSeries {
            price,
            volume,
            overlays,
        })
    }

    fn decode_all(&self, records: &[RawRecord]) -> Vec<Decoded> {
        let validator = RecordValidator::new(&self.parser);
        let decoded: Vec<Decoded> = records.iter().map(|r| validator.decode(r)).collect();

        let wall_clock = decoded
            .iter()
            .filter(|d| matches!(d, Ok(r) if r.time_form == TimestampForm::WallClock))
            .count();
        if wall_clock > 0 {
            warn!(count = wall_clock, "records timed by wall clock");
        }
        decoded
    }
}

fn assemble<T>(
    decoded: &[Decoded],
    series: &'static str,
    check: fn(&DecodedRecord) -> Result<T, RejectReason>,
) -> Partition<T> {
    if decoded.is_empty() {
        warn!(series, "no records to transform");
        return Partition {
            accepted: Vec::new(),
            rejected: Vec::new(),
        };
    }

    let mut timed: Vec<(i64, T)> = Vec::with_capacity(decoded.len());
    let mut rejected = Vec::new();

    for (index, record) in decoded.iter().enumerate() {
        let outcome = match record {
            Ok(decoded) => check(decoded).map(|point| (decoded.time, point)),
            Err(reason) => Err(reason.clone()),
        };
        match outcome {
            Ok(entry) => timed.push(entry),
            Err(reason) => {
                debug!(series, index, %reason, "record rejected");
                rejected.push(Rejection { index, reason });
            }
        }
    }

    // Stable: equal times keep input order.
    timed.sort_by_key(|(time, _)| *time);

    let partition = Partition {
        accepted: timed.into_iter().map(|(_, point)| point).collect(),
        rejected,
    };
    if partition.accepted.is_empty() {
        warn!(
            series,
            rejected = partition.rejected.len(),
            "every record was rejected"
        );
    } else {
        info!(
            series,
            total = partition.total(),
            accepted = partition.accepted.len(),
            rejected = partition.rejected.len(),
            "series assembled"
        );
    }
    partition
}
