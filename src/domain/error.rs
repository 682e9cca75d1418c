//! Domain error types.
//!
//! Per-record problems are not errors: they are [`RejectReason`]s collected by
//! the series transformer. Only misuse of the public contract and adapter
//! failures surface as [`KlineError`].

/// Why a single raw record was left out of a series.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RejectReason {
    #[error("missing field {field}")]
    MissingField { field: &'static str },

    #[error("field {field} has an unsupported type")]
    UnsupportedFieldType { field: &'static str },

    #[error("field {field} is not numeric: {text:?}")]
    NonNumericField { field: &'static str, text: String },

    #[error("no timestamp or date field")]
    MissingTimestamp,

    #[error("field {field} is not finite")]
    NonFiniteField { field: &'static str },

    #[error("high {high} is below low {low}")]
    HighBelowLow { high: f64, low: f64 },

    #[error("{field} is negative: {value}")]
    NegativePrice { field: &'static str, value: f64 },

    #[error("volume is negative: {value}")]
    NegativeVolume { value: f64 },
}

/// Top-level error type for klineprep.
#[derive(Debug, thiserror::Error)]
pub enum KlineError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("feed error: {reason}")]
    Feed { reason: String },

    #[error("render error: {reason}")]
    Render { reason: String },

    #[error("moving average window must be positive, got {window}")]
    InvalidWindow { window: usize },

    #[error("series is not ordered by time at index {index}")]
    UnorderedSeries { index: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl KlineError {
    /// Process exit status: 1 I/O, 2 config, 3 feed or render, 4 indicator misuse.
    pub fn exit_status(&self) -> u8 {
        match self {
            KlineError::Io(_) => 1,
            KlineError::ConfigParse { .. }
            | KlineError::ConfigMissing { .. }
            | KlineError::ConfigInvalid { .. } => 2,
            KlineError::Feed { .. } | KlineError::Render { .. } | KlineError::Json(_) => 3,
            KlineError::InvalidWindow { .. } | KlineError::UnorderedSeries { .. } => 4,
        }
    }
}

impl From<&KlineError> for std::process::ExitCode {
    fn from(err: &KlineError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
