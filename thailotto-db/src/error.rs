use thiserror::Error;

/// A history record that cannot enter the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("invalid draw date '{0}' (expected DD-MM-YYYY or YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("invalid draw number '{0}' (expected two digits 00-99)")]
    InvalidNumber(String),
}
