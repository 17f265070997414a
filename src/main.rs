//! # PageLens CLI
//!
//! ## Usage
//!
//! ```bash
//! pagelens serve                                  # start the HTTP server
//! pagelens search <url> "<query>"                 # one-shot search, JSON to stdout
//! pagelens --config ./pagelens.toml serve         # with explicit config
//! ```
//!
//! When the config file is absent, built-in defaults apply (bind
//! `127.0.0.1:5000`, 500-token chunks, 10 results, Ollama embeddings).

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use pagelens::config::{load_config, Config};
use pagelens::embedding::create_embedder;
use pagelens::fetch::HttpFetcher;
use pagelens::index::IndexEngine;
use pagelens::search::{run_search, SearchContext};
use pagelens::server::run_server;

/// PageLens — semantic in-page search over live web pages.
#[derive(Parser)]
#[command(
    name = "pagelens",
    about = "Fetch a web page and rank its sections against a natural-language query",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Missing file means defaults.
    #[arg(long, global = true, default_value = "./pagelens.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (`POST /search`, `GET /health`).
    Serve,
    /// Run one search and print the results as JSON.
    Search {
        /// Page to fetch and search within.
        url: String,
        /// Natural-language query to rank sections against.
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        load_config(&cli.config)?
    } else {
        Config::default()
    };

    let embedder = create_embedder(&config.embedding)?;
    let fetcher = Arc::new(HttpFetcher::new()?);
    let index = Arc::new(IndexEngine::new());
    let ctx = Arc::new(SearchContext::new(config, fetcher, embedder, index));

    match cli.command {
        Commands::Serve => run_server(ctx).await,
        Commands::Search { url, query } => {
            let results = run_search(&ctx, &url, &query).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "results": results }))?
            );
            Ok(())
        }
    }
}
