//! Catalog-Harvest: a paginated catalog scraper
//!
//! This crate walks the listing pages of a catalog site, visits every item
//! page it links to and turns each one into a structured [`MusicRecord`],
//! written out as one JSON object per line.

pub mod config;
pub mod crawler;
pub mod output;
pub mod record;

use thiserror::Error;

/// Main error type for Catalog-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: crawler::FetchError,
    },

    #[error("Pagination error for {url}: {source}")]
    Pagination {
        url: String,
        #[source]
        source: crawler::PaginationError,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Item task failed for {url}: {message}")]
    Task { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("{failed} of {total} seed URLs failed")]
    SeedsFailed { failed: usize, total: usize },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Result type alias for Catalog-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, ErrorPolicy};
pub use crawler::{run_harvest, Harvester};
pub use record::{MusicDetail, MusicRecord};
