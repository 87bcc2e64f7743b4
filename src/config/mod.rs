//! Configuration module for Catalog-Harvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, and reading the seed URL list.
//!
//! # Example
//!
//! ```no_run
//! use catalog_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Item concurrency: {}", config.crawler.item_concurrency);
//! ```

mod parser;
mod seeds;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, ErrorPolicy, SelectorConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use seeds::{parse_seeds, read_seed_file};
pub use validation::validate;
pub(crate) use validation::compile_selector;
