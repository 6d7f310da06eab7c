use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
/// Errors returned by component store operations.
pub enum StoreError {
    /// Could not connect to the backing store.
    #[error("failed to connect to store at '{url}': {message}")]
    ConnectionFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// Vector search failed.
    #[error("failed to search in '{collection}': {message}")]
    SearchFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Listing an owner's items failed.
    #[error("failed to list items for owner '{owner_id}': {message}")]
    ListFailed {
        /// Owner whose items were requested.
        owner_id: String,
        /// Error message.
        message: String,
    },

    /// Writing items failed.
    #[error("failed to upsert items to '{collection}': {message}")]
    UpsertFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// A stored record could not be decoded into a profile item.
    #[error("invalid payload for point {point}: {reason}")]
    InvalidPayload {
        /// Point identifier as text.
        point: String,
        /// What was wrong.
        reason: String,
    },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
