use thiserror::Error;

/// Rejected input arriving through a loosely-typed channel. The store itself never fails.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown flow step: {0:?}")]
    UnknownStep(String),
    #[error("unknown processing status: {0:?}")]
    UnknownProcessingStatus(String),
    #[error("invalid store action: {0}")]
    InvalidAction(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidAction(value.to_string())
    }
}
