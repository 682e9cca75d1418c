//! Raw feed record, exactly as the upstream transport delivers it.
//!
//! The feed is loosely typed: prices may be JSON numbers or numeric strings,
//! the timestamp may be a compact calendar string or a bare epoch number.
//! Every field is therefore a [`FieldValue`] and nothing is coerced here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
    /// Any other JSON type (bool, array, object).
    Other(serde_json::Value),
}

impl FieldValue {
    /// Builds a value from a CSV cell: empty cells are `Missing`.
    pub fn from_cell(cell: &str) -> Self {
        if cell.trim().is_empty() {
            FieldValue::Missing
        } else {
            FieldValue::Text(cell.to_string())
        }
    }

    /// Text form used for timestamp resolution.
    ///
    /// Whole numbers are rendered without a fractional part so that
    /// `1740985800000` keeps its 13 digits.
    pub fn time_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            FieldValue::Number(n) if n.is_finite() => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// One kline as received from the feed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    /// Calendar day, `YYYYMMDD`.
    pub date: FieldValue,
    pub timestamp: FieldValue,
    pub open: FieldValue,
    pub high: FieldValue,
    pub low: FieldValue,
    pub close: FieldValue,
    pub volume: FieldValue,
    pub amount: FieldValue,
}

impl RawRecord {
    /// The text that decides the record's time: `timestamp` if present and
    /// non-empty, otherwise `date`.
    pub fn time_source(&self) -> Option<String> {
        self.timestamp.time_text().or_else(|| self.date.time_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_gateway_record() {
        let json = r#"{
            "date": "20250303",
            "timestamp": "20250303 09:30:00",
            "open": 11.52,
            "high": "11.60",
            "low": 11.5,
            "close": 11.52,
            "volume": 3726,
            "amount": 4292352
        }"#;
        let record: RawRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.date, FieldValue::Text("20250303".into()));
        assert_eq!(record.open, FieldValue::Number(11.52));
        assert_eq!(record.high, FieldValue::Text("11.60".into()));
        assert_eq!(record.volume, FieldValue::Number(3726.0));
    }

    #[test]
    fn missing_and_null_fields_are_missing() {
        let record: RawRecord =
            serde_json::from_str(r#"{"timestamp": null, "open": 1}"#).unwrap();
        assert_eq!(record.timestamp, FieldValue::Missing);
        assert_eq!(record.close, FieldValue::Missing);
        assert_eq!(record.open, FieldValue::Number(1.0));
    }

    #[test]
    fn odd_types_are_captured_not_fatal() {
        let record: RawRecord =
            serde_json::from_str(r#"{"open": true, "close": [1, 2]}"#).unwrap();
        assert!(matches!(record.open, FieldValue::Other(_)));
        assert!(matches!(record.close, FieldValue::Other(_)));
    }

    #[test]
    fn time_text_renders_whole_numbers_without_fraction() {
        assert_eq!(
            FieldValue::Number(1_740_985_800_000.0).time_text(),
            Some("1740985800000".to_string())
        );
        assert_eq!(
            FieldValue::Text("  20250303 ".into()).time_text(),
            Some("20250303".to_string())
        );
        assert_eq!(FieldValue::Text("   ".into()).time_text(), None);
        assert_eq!(FieldValue::Missing.time_text(), None);
        assert_eq!(FieldValue::Number(f64::NAN).time_text(), None);
    }

    #[test]
    fn time_source_prefers_timestamp_then_date() {
        let mut record = RawRecord {
            date: "20250303".into(),
            timestamp: "20250303 09:30:00".into(),
            ..Default::default()
        };
        assert_eq!(record.time_source().as_deref(), Some("20250303 09:30:00"));

        record.timestamp = FieldValue::Text(String::new());
        assert_eq!(record.time_source().as_deref(), Some("20250303"));

        record.date = FieldValue::Missing;
        assert_eq!(record.time_source(), None);
    }

    #[test]
    fn from_cell_maps_blank_to_missing() {
        assert_eq!(FieldValue::from_cell(""), FieldValue::Missing);
        assert_eq!(FieldValue::from_cell("1.5"), FieldValue::Text("1.5".into()));
    }
}
