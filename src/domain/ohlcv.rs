//! Validated, render-ready points.

use serde::Serialize;

/// One candle, time in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[cfg(test)]
impl PricePoint {
    /// high >= low, both non-negative, every field finite.
    pub fn is_sane(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|v| v.is_finite())
            && self.high >= self.low
            && self.high >= 0.0
            && self.low >= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BarColor {
    Up,
    Down,
}

impl BarColor {
    /// Up when the bar did not close below its open.
    pub fn from_open_close(open: f64, close: f64) -> Self {
        if open <= close {
            BarColor::Up
        } else {
            BarColor::Down
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            BarColor::Up => "#26a69a",
            BarColor::Down => "#ef5350",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumePoint {
    pub time: i64,
    pub value: f64,
    pub color: BarColor,
}
