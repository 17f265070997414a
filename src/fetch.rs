//! Page retrieval behind the [`PageFetcher`] trait.
//!
//! The orchestrator depends on the trait so tests can substitute canned
//! pages; [`HttpFetcher`] is the production implementation over a shared
//! `reqwest` client with a per-request timeout.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::PipelineError;

/// Retrieves a page body within a bounded timeout.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return the response body as text.
    ///
    /// Network failures, timeouts, and non-success HTTP statuses are all
    /// [`PipelineError::Fetch`].
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, PipelineError>;
}

/// [`PageFetcher`] over HTTP(S) via `reqwest`.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, PipelineError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| PipelineError::Fetch(err.to_string()))?
            .error_for_status()
            .map_err(|err| PipelineError::Fetch(err.to_string()))?;
        response
            .text()
            .await
            .map_err(|err| PipelineError::Fetch(err.to_string()))
    }
}
