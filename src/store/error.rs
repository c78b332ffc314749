//! Store error types

use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Input rejected under strict validation
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Every id up to `u64::MAX` is taken in this collection
    #[error("No {0} ids left")]
    IdsExhausted(&'static str),

    /// A persisted value could not be decoded during hydration
    #[error("Corrupt value under key {key}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize collection: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Reply provider error: {0:#}")]
    Reply(anyhow::Error),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
