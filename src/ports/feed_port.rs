//! Feed fetcher port.
//!
//! Implementations return whatever the upstream produced, in any order and
//! possibly empty. The domain never retries or interprets transport errors.

use crate::domain::error::KlineError;
use crate::domain::interval::FeedRequest;
use crate::domain::raw_record::RawRecord;

pub trait FeedPort {
    fn fetch_klines(&self, request: &FeedRequest) -> Result<Vec<RawRecord>, KlineError>;
}
