//! TOML configuration for the PageLens service.
//!
//! Every field has a default so the binary can run without a config file;
//! [`load_config`] is used when one is provided.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Bind address for the HTTP server.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    /// Upper bound on a single page fetch, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
        }
    }
}

fn default_fetch_timeout() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Upper bound on a chunk's whitespace-token count. A single fragment
    /// larger than this still becomes one (oversized) chunk.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_max_tokens() -> usize {
    500
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Maximum number of results per request; the effective limit is
    /// `min(max_results, chunk count)`.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

fn default_max_results() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    /// `"ollama"` or `"openai"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model name; each provider has its own default.
    #[serde(default)]
    pub model: Option<String>,
    /// Vector dimensionality reported by the provider.
    #[serde(default)]
    pub dims: Option<usize>,
    /// Base URL for self-hosted providers (Ollama).
    #[serde(default)]
    pub url: Option<String>,
    /// Upper bound on a single embedding call, in seconds.
    #[serde(default = "default_embed_timeout")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            dims: None,
            url: None,
            timeout_secs: default_embed_timeout(),
        }
    }
}

fn default_provider() -> String {
    "ollama".to_string()
}

fn default_embed_timeout() -> u64 {
    30
}

/// Load and parse a TOML configuration file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        let config = Config::default();
        assert_eq!(config.chunking.max_tokens, 500);
        assert_eq!(config.search.max_results, 10);
        assert_eq!(config.fetch.timeout_secs, 10);
        assert_eq!(config.embedding.provider, "ollama");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [chunking]
            max_tokens = 128

            [embedding]
            provider = "openai"
            model = "text-embedding-3-small"
            dims = 1536
            "#,
        )
        .unwrap();
        assert_eq!(config.chunking.max_tokens, 128);
        assert_eq!(config.embedding.provider, "openai");
        assert_eq!(config.embedding.dims, Some(1536));
        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert_eq!(config.search.max_results, 10);
    }

    #[test]
    fn empty_toml_is_fully_defaulted() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(
            config.chunking.max_tokens,
            Config::default().chunking.max_tokens
        );
    }
}
