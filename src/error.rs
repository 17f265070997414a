//! Error taxonomy for the search pipeline.
//!
//! Each variant corresponds to one stage of the per-request pipeline, so the
//! HTTP layer can map [`PipelineError::InvalidRequest`] to `400` and every
//! other variant to `500` with the underlying failure description.

use thiserror::Error;

/// A failure in one stage of the search pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request itself was malformed (missing/empty url or query).
    /// Raised before any network call is made.
    #[error("{0}")]
    InvalidRequest(String),

    /// The page could not be retrieved: network error, timeout, or a
    /// non-success HTTP status.
    #[error("failed to fetch page: {0}")]
    Fetch(String),

    /// The fetched content could not be processed into a DOM.
    #[error("failed to parse page: {0}")]
    Parse(String),

    /// The embedding provider failed or returned a malformed response.
    #[error("embedding request failed: {0}")]
    Embedding(String),

    /// A create/add/query/delete operation on the transient vector
    /// collection failed.
    #[error("vector index failure: {0}")]
    Index(String),
}

impl PipelineError {
    /// Whether this error was caused by the caller's input rather than a
    /// downstream collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::InvalidRequest(_))
    }
}
