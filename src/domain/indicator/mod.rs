//! Chart overlay indicators.
//!
//! - `MovingAveragePoint`: one point of an overlay, aligned to the candle at
//!   the end of its window
//! - `MovingAverageOverlay`: a labelled overlay series for one window
//! - [`sma::moving_average`]: the simple moving average itself

pub mod sma;

use serde::Serialize;
use std::fmt;

use crate::domain::error::KlineError;
use crate::domain::ohlcv::PricePoint;

pub use sma::moving_average;

/// MA5 and MA10, the overlays drawn when nothing else is configured.
pub const DEFAULT_MA_WINDOWS: [usize; 2] = [5, 10];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MovingAveragePoint {
    pub time: i64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageOverlay {
    pub window: usize,
    pub points: Vec<MovingAveragePoint>,
}

impl MovingAverageOverlay {
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MovingAverageOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MA{}", self.window)
    }
}

/// One overlay per window, in the order given.
pub fn overlays(
    series: &[PricePoint],
    windows: &[usize],
) -> Result<Vec<MovingAverageOverlay>, KlineError> {
    windows
        .iter()
        .map(|&window| {
            Ok(MovingAverageOverlay {
                window,
                points: moving_average(series, window)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(closes: &[f64]) -> Vec<PricePoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                time: 1_740_965_400 + 60 * i as i64,
                open: close,
                high: close,
                low: close,
                close,
            })
            .collect()
    }

    #[test]
    fn overlay_label() {
        let overlay = MovingAverageOverlay {
            window: 10,
            points: Vec::new(),
        };
        assert_eq!(overlay.label(), "MA10");
    }

    #[test]
    fn overlays_follow_window_order() {
        let series = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let result = overlays(&series, &[3, 1]).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].window, 3);
        assert_eq!(result[0].points.len(), 4);
        assert_eq!(result[1].window, 1);
        assert_eq!(result[1].points.len(), 6);
    }

    #[test]
    fn default_windows_on_short_series() {
        let series = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let result = overlays(&series, &DEFAULT_MA_WINDOWS).unwrap();

        assert_eq!(result[0].points.len(), 2);
        assert!(result[1].points.is_empty());
    }

    #[test]
    fn overlays_propagate_bad_window() {
        let series = series(&[1.0, 2.0]);
        assert!(matches!(
            overlays(&series, &[5, 0]),
            Err(KlineError::InvalidWindow { window: 0 })
        ));
    }

    #[test]
    fn point_serializes_time_and_value() {
        let point = MovingAveragePoint {
            time: 1_740_965_400,
            value: 10.5,
        };
        assert_eq!(
            serde_json::to_string(&point).unwrap(),
            r#"{"time":1740965400,"value":10.5}"#
        );
    }
}
