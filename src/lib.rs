//! # PageLens
//!
//! Semantic in-page search: given a web page URL and a natural-language
//! query, return the sections of that page most relevant to the query,
//! paired with their original HTML so a caller can render them in context.
//!
//! ## Pipeline
//!
//! ```text
//! ┌───────┐   ┌──────────┐   ┌─────────┐   ┌────────┐   ┌─────────┐
//! │ Fetch │──▶│ Extract  │──▶│  Chunk  │──▶│ Embed  │──▶│ Transient│
//! │ page  │   │ fragments│   │ ≤500 tok│   │ chunks │   │  index  │
//! └───────┘   └──────────┘   └─────────┘   └────────┘   └────┬────┘
//!                                                            │ query,
//!                                                            ▼ destroy
//!                                                       ranked results
//! ```
//!
//! Everything is rebuilt per request; the transient vector collection is
//! created, populated, queried, and destroyed within a single call.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration |
//! | [`error`] | Pipeline error taxonomy |
//! | [`models`] | Fragments, chunks, search results |
//! | [`extract`] | DOM traversal and fragment extraction |
//! | [`chunk`] | Token-bounded chunk assembly |
//! | [`fetch`] | Page retrieval |
//! | [`embedding`] | Embedding providers (Ollama, OpenAI) |
//! | [`index`] | Transient vector collections |
//! | [`search`] | Per-request orchestration |
//! | [`server`] | HTTP API |

pub mod chunk;
pub mod config;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod index;
pub mod models;
pub mod search;
pub mod server;
