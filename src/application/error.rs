use thiserror::Error;

use crate::domain::ParseCurrencyError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid currency: {0}")]
    InvalidCurrency(#[from] ParseCurrencyError),

    #[error("Invalid date '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("No entry at position {position} (ledger has {len} entries)")]
    PositionNotFound { position: usize, len: usize },

    #[error("Unsupported export format '{0}'. Use json or csv")]
    UnsupportedFormat(String),

    #[error("Export failed: {0}")]
    Export(#[from] anyhow::Error),
}
