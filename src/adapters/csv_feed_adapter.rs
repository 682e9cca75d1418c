//! CSV file feed adapter.
//!
//! Reads `<data_dir>/<code>_<interval>.csv` with the header
//! `date,timestamp,open,high,low,close,volume,amount`. Columns are matched by
//! header name; a missing column or an empty cell becomes `Missing`, every
//! other cell arrives as text for the domain to coerce.

use crate::domain::error::KlineError;
use crate::domain::interval::FeedRequest;
use crate::domain::raw_record::{FieldValue, RawRecord};
use crate::ports::feed_port::FeedPort;
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const COLUMNS: [&str; 8] = [
    "date",
    "timestamp",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "amount",
];

pub struct CsvFeedAdapter {
    base_path: PathBuf,
}

impl CsvFeedAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, request: &FeedRequest) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", request.code, request.interval))
    }
}

/// Column index of each of [`COLUMNS`] in the file, if present.
fn column_positions(headers: &StringRecord) -> [Option<usize>; 8] {
    COLUMNS.map(|name| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    })
}

fn to_raw_record(row: &StringRecord, positions: &[Option<usize>; 8]) -> RawRecord {
    let cell = |slot: usize| {
        positions[slot]
            .and_then(|i| row.get(i))
            .map(FieldValue::from_cell)
            .unwrap_or_default()
    };

    RawRecord {
        date: cell(0),
        timestamp: cell(1),
        open: cell(2),
        high: cell(3),
        low: cell(4),
        close: cell(5),
        volume: cell(6),
        amount: cell(7),
    }
}

impl FeedPort for CsvFeedAdapter {
    fn fetch_klines(&self, request: &FeedRequest) -> Result<Vec<RawRecord>, KlineError> {
        let path = self.csv_path(request);
        let content = fs::read_to_string(&path).map_err(|e| KlineError::Feed {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| KlineError::Feed {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let positions = column_positions(headers);

        let mut records = Vec::new();
        let mut fetched = 0usize;

        for result in rdr.records() {
            let row = result.map_err(|e| KlineError::Feed {
                reason: format!("CSV parse error: {}", e),
            })?;
            fetched += 1;

            let record = to_raw_record(&row, &positions);
            if request.admits_date(record.date.time_text().as_deref()) {
                records.push(record);
            }
        }

        debug!(
            path = %path.display(),
            fetched,
            kept = records.len(),
            "loaded klines"
        );
        Ok(records)
    }
}
