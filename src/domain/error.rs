//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for dcasim.
#[derive(Debug, thiserror::Error)]
pub enum DcasimError {
    #[error("data error: {reason}")]
    Data { reason: String },

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

    #[error("missing column: {column}")]
    MissingColumn { column: String },

    #[error("invalid value in row {row} ({field}): {reason}")]
    InvalidField {
        row: usize,
        field: String,
        reason: String,
    },

    #[error("duplicate date in series: {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("invalid {field} on {date}: {reason}")]
    InvalidBar {
        date: NaiveDate,
        field: String,
        reason: String,
    },

    #[error("non-positive {field} on {date}: {value}")]
    DegeneratePrice {
        date: NaiveDate,
        field: String,
        value: f64,
    },

    #[error("empty price series for {symbol}")]
    EmptySeries { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&DcasimError> for std::process::ExitCode {
    fn from(err: &DcasimError) -> Self {
        let code: u8 = match err {
            DcasimError::Io(_) => 1,
            DcasimError::ConfigParse { .. }
            | DcasimError::ConfigMissing { .. }
            | DcasimError::ConfigInvalid { .. } => 2,
            DcasimError::Data { .. } | DcasimError::MissingColumn { .. } => 3,
            DcasimError::InvalidField { .. }
            | DcasimError::DuplicateDate { .. }
            | DcasimError::InvalidBar { .. }
            | DcasimError::DegeneratePrice { .. } => 4,
            DcasimError::EmptySeries { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
