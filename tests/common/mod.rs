#![allow(dead_code)]

use chrono::{FixedOffset, NaiveDate};
use klineprep::adapters::system_clock::FixedClock;
use klineprep::domain::chart_config::{ChartConfig, FeedSource};
use klineprep::domain::error::KlineError;
use klineprep::domain::interval::{FeedRequest, Interval};
use klineprep::domain::raw_record::{FieldValue, RawRecord};
use klineprep::domain::series::{ChartSeries, SeriesTransformer};
use klineprep::domain::timestamp::{LocalZone, TimestampParser};
use klineprep::ports::feed_port::FeedPort;
use klineprep::ports::render_port::RenderPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// 2023-11-14T22:13:20Z, the wall clock every test parser sees.
pub const NOW: i64 = 1_700_000_000;

/// 2025-03-03 09:30:00 at UTC+8.
pub const MARCH_3_0930_BEIJING: i64 = 1_740_965_400;

pub struct MockFeedPort {
    pub data: HashMap<String, Vec<RawRecord>>,
    pub errors: HashMap<String, String>,
}

impl MockFeedPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_records(mut self, code: &str, records: Vec<RawRecord>) -> Self {
        self.data.insert(code.to_string(), records);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl FeedPort for MockFeedPort {
    fn fetch_klines(&self, request: &FeedRequest) -> Result<Vec<RawRecord>, KlineError> {
        if let Some(reason) = self.errors.get(&request.code) {
            return Err(KlineError::Feed {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(&request.code).cloned().unwrap_or_default())
    }
}

/// Keeps every chart it is handed.
#[derive(Default)]
pub struct RecordingRenderPort {
    pub charts: RefCell<Vec<ChartSeries>>,
}

impl RenderPort for RecordingRenderPort {
    fn render(&self, chart: &ChartSeries) -> Result<(), KlineError> {
        self.charts.borrow_mut().push(chart.clone());
        Ok(())
    }
}

pub fn beijing() -> LocalZone {
    LocalZone::Fixed(FixedOffset::east_opt(8 * 3600).unwrap())
}

pub fn transformer() -> SeriesTransformer<FixedClock> {
    SeriesTransformer::new(TimestampParser::new(beijing(), FixedClock(NOW)))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A well-formed record at `timestamp` with numeric fields.
pub fn make_record(timestamp: &str, open: f64, high: f64, low: f64, close: f64) -> RawRecord {
    RawRecord {
        date: FieldValue::Text(timestamp.chars().take(8).collect()),
        timestamp: FieldValue::Text(timestamp.to_string()),
        open: FieldValue::Number(open),
        high: FieldValue::Number(high),
        low: FieldValue::Number(low),
        close: FieldValue::Number(close),
        volume: FieldValue::Number(1000.0),
        amount: FieldValue::Number(close * 1000.0),
    }
}

/// `count` one-minute bars from 2025-03-03 09:30 with closes `start, start+1, ...`.
pub fn generate_records(count: usize, start_price: f64) -> Vec<RawRecord> {
    (0..count)
        .map(|i| {
            let minutes = 30 + i;
            let timestamp = format!("20250303 {:02}:{:02}:00", 9 + minutes / 60, minutes % 60);
            let close = start_price + i as f64;
            make_record(&timestamp, close - 0.5, close + 1.0, close - 1.0, close)
        })
        .collect()
}

pub fn chart_config(code: &str, windows: &[usize]) -> ChartConfig {
    ChartConfig {
        source: FeedSource::Json,
        data_dir: PathBuf::from("./data"),
        request: FeedRequest {
            code: code.to_string(),
            from: date(2025, 3, 1),
            to: date(2025, 3, 31),
            interval: Interval::Minute1,
        },
        ma_windows: windows.to_vec(),
        zone: beijing(),
        output: PathBuf::from("chart.json"),
    }
}
