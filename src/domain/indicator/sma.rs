//! Simple Moving Average over closes.
//!
//! SMA(n)[i] = mean(close[i - n + 1 ..= i]), emitted only once a full window
//! is available: n bars in, n - window + 1 points out.
//!
//! O(n) running sum. The sum is re-seeded from scratch every `window` steps,
//! which keeps add/subtract rounding from accumulating over long series.

use crate::domain::error::KlineError;
use crate::domain::indicator::MovingAveragePoint;
use crate::domain::ohlcv::PricePoint;

/// Requires `window > 0` and a series in non-decreasing time order.
pub fn moving_average(
    series: &[PricePoint],
    window: usize,
) -> Result<Vec<MovingAveragePoint>, KlineError> {
    if window == 0 {
        return Err(KlineError::InvalidWindow { window });
    }
    if let Some(index) = first_unordered(series) {
        return Err(KlineError::UnorderedSeries { index });
    }
    if series.len() < window {
        return Ok(Vec::new());
    }

    let divisor = window as f64;
    let mut values = Vec::with_capacity(series.len() - window + 1);
    let mut sum = window_sum(&series[..window]);

    values.push(MovingAveragePoint {
        time: series[window - 1].time,
        value: sum / divisor,
    });

    for end in window..series.len() {
        let start = end + 1 - window;
        if start % window == 0 {
            sum = window_sum(&series[start..=end]);
        } else {
            sum += series[end].close - series[start - 1].close;
        }
        values.push(MovingAveragePoint {
            time: series[end].time,
            value: sum / divisor,
        });
    }

    Ok(values)
}

fn window_sum(points: &[PricePoint]) -> f64 {
    points.iter().map(|p| p.close).sum()
}

/// Index of the first point earlier than its predecessor.
fn first_unordered(series: &[PricePoint]) -> Option<usize> {
    series
        .windows(2)
        .position(|pair| pair[1].time < pair[0].time)
        .map(|i| i + 1)
}
