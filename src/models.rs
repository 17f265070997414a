//! Core data types that flow through the extraction and search pipeline.
//!
//! Fragments and chunks live for the duration of one request: they are built
//! fresh from the fetched page and discarded with the transient collection
//! once the response is serialized.

use serde::Serialize;

/// Tag label assigned to every chunk. Chunks aggregate fragments from many
/// elements, so no single source tag applies.
pub const CHUNK_TAG: &str = "div";

/// One DOM element's extracted content.
///
/// `text` is whitespace-collapsed plain text and always holds at least five
/// whitespace-separated words; the extractor never constructs fragments
/// below that floor.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Normalized plain text, used for embedding.
    pub text: String,
    /// The element's serialized outer HTML, used only for display.
    pub markup: String,
    /// The element name, informational only.
    pub tag: String,
}

/// A token-bounded aggregate of one or more consecutive fragments.
///
/// `token_count` may exceed the configured maximum only when a single
/// fragment alone exceeds it; oversized fragments are never split because
/// that would desynchronize `text` from `markup`.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Space-joined fragment texts, in encounter order.
    pub text: String,
    /// Fragment markups concatenated with no separator, in encounter order.
    pub markup: String,
    /// Whitespace word count of `text`.
    pub token_count: usize,
}

/// Per-chunk metadata carried through the transient index.
///
/// The index by itself returns only text and distance, so the markup rides
/// along here as the round-trip link back to the original HTML.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMetadata {
    /// URL of the page the chunk came from.
    pub source: String,
    /// 0-based position of the chunk in the chunk sequence.
    pub index: usize,
    /// Chunk tag label (always [`CHUNK_TAG`]).
    pub tag: String,
    /// The chunk's full markup string.
    pub html: String,
}

/// One ranked hit returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// The chunk's plain text.
    pub text: String,
    /// The chunk's original markup, for in-context rendering.
    pub html: String,
    /// The chunk tag label.
    pub tag: String,
    /// Distance between the query and chunk embeddings; lower is closer.
    pub score: f32,
}
