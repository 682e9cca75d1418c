//! Synthetic daily bars for rendering without a feed.
//!
//! A seeded random walk: each open drifts up to ±5 from the previous close,
//! high and low bracket the bar, and the close is the mean of open, high and
//! low. The same seed always gives the same series.

use chrono::{NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::ohlcv::{BarColor, PricePoint, VolumePoint};

const START_PRICE: f64 = 100.0;
const MIN_PRICE: f64 = 0.01;
const MAX_VOLUME: u64 = 1_000_000;
const SECONDS_PER_DAY: i64 = 86_400;

/// Upper bound on `count`; callers reject anything larger.
pub const MAX_DEMO_BARS: usize = 100_000;

pub fn generate_demo(
    count: usize,
    start: NaiveDate,
    seed: u64,
) -> (Vec<PricePoint>, Vec<VolumePoint>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut time = start.and_time(NaiveTime::MIN).and_utc().timestamp();
    let mut price = START_PRICE;

    let mut candles = Vec::with_capacity(count);
    let mut volume = Vec::with_capacity(count);

    for _ in 0..count {
        let open = (price + rng.gen_range(-5.0..5.0)).max(MIN_PRICE);
        let high = open + rng.gen_range(0.0..5.0);
        let low = (open - rng.gen_range(0.0..5.0)).max(0.0);
        let close = (open + high + low) / 3.0;

        candles.push(PricePoint {
            time,
            open,
            high: high.max(open).max(close),
            low: low.min(open).min(close),
            close,
        });
        volume.push(VolumePoint {
            time,
            value: rng.gen_range(0..MAX_VOLUME) as f64,
            color: BarColor::from_open_close(open, close),
        });

        time += SECONDS_PER_DAY;
        price = close;
    }

    (candles, volume)
}
