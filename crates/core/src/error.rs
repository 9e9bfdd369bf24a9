//! Error types for the LeaveDesk domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all LeaveDesk operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Retrieval errors ---
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    // --- Employee store errors ---
    #[error("Employee store error: {0}")]
    Store(#[from] StoreError),

    // --- Document ingestion errors ---
    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures of a retrieval collaborator (`QueryEngine`).
#[derive(Debug, Clone, Error)]
pub enum RetrievalError {
    #[error("{engine}: {source}")]
    Provider {
        engine: String,
        #[source]
        source: ProviderError,
    },

    #[error("{engine}: embedding failed: {reason}")]
    Embedding { engine: String, reason: String },

    #[error("{engine}: index is empty")]
    EmptyIndex { engine: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read employee data at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse employee data at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Duplicate employee name: {0}")]
    DuplicateName(String),

    #[error("Employee record with empty name at position {0}")]
    EmptyName(usize),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read document at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Document has no extractable text: {0}")]
    Empty(PathBuf),
}
