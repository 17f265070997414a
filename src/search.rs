//! Per-request search orchestration.
//!
//! [`run_search`] owns the whole pipeline for one request:
//! validate → fetch → parse/prune → extract → chunk → index → query →
//! teardown → format. Nothing is shared between invocations except the
//! injected collaborators in [`SearchContext`]; fragments, chunks, and the
//! transient collection all die with the request.
//!
//! The transient collection is a scoped resource: once created it is
//! destroyed on every exit path, including failures during population or
//! querying. A teardown failure is logged and never masks the original
//! error.

use std::sync::Arc;
use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::chunk::assemble;
use crate::config::Config;
use crate::embedding::Embedder;
use crate::error::PipelineError;
use crate::extract::{extract, prune_noise, ScrapedElement};
use crate::fetch::PageFetcher;
use crate::index::{IndexEngine, IndexEntry, Neighbor};
use crate::models::{Chunk, ChunkMetadata, SearchResult, CHUNK_TAG};

/// Explicitly constructed collaborators for the pipeline; no ambient state.
pub struct SearchContext {
    pub config: Config,
    pub fetcher: Arc<dyn PageFetcher>,
    pub embedder: Arc<dyn Embedder>,
    pub index: Arc<IndexEngine>,
}

impl SearchContext {
    pub fn new(
        config: Config,
        fetcher: Arc<dyn PageFetcher>,
        embedder: Arc<dyn Embedder>,
        index: Arc<IndexEngine>,
    ) -> Self {
        Self {
            config,
            fetcher,
            embedder,
            index,
        }
    }
}

/// Run one end-to-end search: fetch `url`, rank its sections against
/// `query`, and return at most `min(max_results, chunk count)` hits
/// ascending by distance.
pub async fn run_search(
    ctx: &SearchContext,
    url: &str,
    query: &str,
) -> Result<Vec<SearchResult>, PipelineError> {
    if url.trim().is_empty() || query.trim().is_empty() {
        return Err(PipelineError::InvalidRequest(
            "URL and Query are required".to_string(),
        ));
    }

    let timeout = Duration::from_secs(ctx.config.fetch.timeout_secs);
    let page = ctx.fetcher.fetch(url, timeout).await?;

    let chunks = chunks_from_page(&page, ctx.config.chunking.max_tokens)?;
    debug!(url, chunk_count = chunks.len(), "page chunked");

    // No extractable content: respond empty without ever creating an index.
    if chunks.is_empty() {
        return Ok(Vec::new());
    }

    let collection = format!("search-{}", Uuid::new_v4().simple());
    ctx.index.create_collection(&collection)?;

    let outcome = index_and_query(ctx, &collection, url, query, &chunks).await;

    // Unconditional teardown, on success and on failure alike.
    if let Err(err) = ctx.index.delete_collection(&collection) {
        warn!(collection, error = %err, "failed to drop transient collection");
    }

    let neighbors = outcome?;
    Ok(neighbors
        .into_iter()
        .map(|neighbor| SearchResult {
            text: neighbor.text,
            html: neighbor.metadata.html,
            tag: neighbor.metadata.tag,
            score: neighbor.distance,
        })
        .collect())
}

/// Parse a page, prune coarse noise subtrees, extract fragments, and
/// assemble token-bounded chunks.
///
/// Synchronous on purpose: the parsed DOM is not `Send` and must not be
/// held across an await point.
pub fn chunks_from_page(page: &str, max_tokens: usize) -> Result<Vec<Chunk>, PipelineError> {
    let mut doc = Html::parse_document(page);
    prune_noise(&mut doc);

    let body_selector =
        Selector::parse("body").map_err(|err| PipelineError::Parse(err.to_string()))?;
    let fragments = match doc.select(&body_selector).next() {
        Some(body) => extract(&ScrapedElement(body)),
        None => extract(&ScrapedElement(doc.root_element())),
    };

    Ok(assemble(&fragments, max_tokens))
}

/// Embed and add every chunk, then embed the query and fetch the nearest
/// neighbors. Runs between collection creation and teardown.
async fn index_and_query(
    ctx: &SearchContext,
    collection: &str,
    url: &str,
    query: &str,
    chunks: &[Chunk],
) -> Result<Vec<Neighbor>, PipelineError> {
    let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
    let vectors = ctx.embedder.embed(&texts).await?;
    if vectors.len() != chunks.len() {
        return Err(PipelineError::Embedding(format!(
            "expected {} vectors, got {}",
            chunks.len(),
            vectors.len()
        )));
    }

    let entries = chunks
        .iter()
        .zip(vectors)
        .enumerate()
        .map(|(position, (chunk, vector))| IndexEntry {
            id: position.to_string(),
            vector,
            text: chunk.text.clone(),
            metadata: ChunkMetadata {
                source: url.to_string(),
                index: position,
                tag: CHUNK_TAG.to_string(),
                html: chunk.markup.clone(),
            },
        })
        .collect();
    ctx.index.add(collection, entries)?;

    let query_vec = ctx
        .embedder
        .embed(&[query.to_string()])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::Embedding("empty embedding response".to_string()))?;

    let k = chunks.len().min(ctx.config.search.max_results);
    ctx.index.query(collection, &query_vec, k)
}
