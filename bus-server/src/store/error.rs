//! Store error types.

/// Errors from the bus data store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database driver failed (connection, timeout, command error).
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// A document could not be decoded into its Rust type.
    #[error("invalid document in {collection}: {message}")]
    Decode {
        collection: &'static str,
        message: String,
    },

    /// A document could not be encoded for writing.
    #[error("could not encode document: {0}")]
    Encode(String),
}
