use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid target date: {0}")]
    InvalidDate(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
