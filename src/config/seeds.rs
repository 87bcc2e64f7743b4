//! Seed URL list loading
//!
//! A seed file holds one catalog root URL per line. Lines are taken as-is:
//! a blank line is kept and will fail when fetched.

use crate::ConfigResult;
use std::path::Path;

/// Reads the seed file at `path`
pub fn read_seed_file(path: &Path) -> ConfigResult<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_seeds(&content))
}

/// Splits seed file content into one URL per line
pub fn parse_seeds(content: &str) -> Vec<String> {
    content.lines().map(str::to_string).collect()
}
