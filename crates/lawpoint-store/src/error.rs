use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored or submitted document is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A query expected exactly one document but found none.
    #[error("Document not found")]
    NotFound,

    #[error("Document in {collection} has no string id")]
    MissingId { collection: &'static str },

    #[error("Expected a JSON object for {collection}")]
    NotAnObject { collection: &'static str },

    #[error("Field {field} is not an array")]
    NotAnArray { field: String },

    #[error("Document {id} already exists in {collection}")]
    Duplicate { collection: &'static str, id: String },

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
