// src/error.rs
// =============================================================================
// Typed errors for the crawl engine.
//
// The application glue in main.rs works with anyhow::Result, so every variant
// here converts into anyhow::Error through `?` automatically.
//
// Fatal startup errors (bad seed, unreadable input) abort the run. Per-link
// verification failures are never errors: they become DeadLink entries.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// The seed URL could not be parsed at all
    #[error("invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The seed URL parsed but has no host to scope the crawl to
    #[error("seed URL has no host: {0}")]
    MissingHost(String),

    /// Reading an interactive answer failed (EOF or I/O error)
    #[error("failed to read input: {0}")]
    Input(#[from] std::io::Error),

    /// The shared HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// A link was pushed after the queue was closed
    #[error("link queue is already closed")]
    QueueClosed,

    /// A dead link arrived after the report was assembled
    #[error("dead-link collector is frozen, report already taken")]
    CollectorFrozen,

    /// A verifier task panicked or was cancelled
    #[error("verifier worker failed: {0}")]
    WorkerPanicked(String),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
