//! JSON file feed adapter.
//!
//! Reads `<data_dir>/<code>_<interval>.json`: a JSON array of kline objects
//! in the gateway's wire format, or `null` for no data.

use crate::domain::error::KlineError;
use crate::domain::interval::FeedRequest;
use crate::domain::raw_record::RawRecord;
use crate::ports::feed_port::FeedPort;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct JsonFeedAdapter {
    base_path: PathBuf,
}

impl JsonFeedAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn json_path(&self, request: &FeedRequest) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.json", request.code, request.interval))
    }
}

impl FeedPort for JsonFeedAdapter {
    fn fetch_klines(&self, request: &FeedRequest) -> Result<Vec<RawRecord>, KlineError> {
        let path = self.json_path(request);
        let content = fs::read_to_string(&path).map_err(|e| KlineError::Feed {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let records: Option<Vec<RawRecord>> =
            serde_json::from_str(&content).map_err(|e| KlineError::Feed {
                reason: format!("invalid kline JSON in {}: {}", path.display(), e),
            })?;
        let records = records.unwrap_or_default();
        let fetched = records.len();

        let records: Vec<RawRecord> = records
            .into_iter()
            .filter(|r| request.admits_date(r.date.time_text().as_deref()))
            .collect();

        debug!(
            path = %path.display(),
            fetched,
            kept = records.len(),
            "loaded klines"
        );
        Ok(records)
    }
}
