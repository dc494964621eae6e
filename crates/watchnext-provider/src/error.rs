use thiserror::Error;

/// Failures reported by a provider implementation
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{table} row {id} does not exist")]
    NotFound { table: &'static str, id: u64 },

    #[error("provider rejected the operation: {0}")]
    Rejected(String),

    #[error("provider storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("provider serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
