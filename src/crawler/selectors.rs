use crate::config::{compile_selector, SelectorConfig};
use crate::ConfigError;
use scraper::Selector;

/// Compiled form of [`SelectorConfig`], built once per run
#[derive(Debug, Clone)]
pub struct Selectors {
    pub pagination: Selector,
    pub post_title: Selector,
    /// First anchor inside a post title
    pub anchor: Selector,
    pub title: Selector,
    pub download_links: Selector,
    pub info: Selector,
    pub detail_rows: Selector,
    pub detail_cells: Selector,
    pub tags: Selector,
    pub archive_suffix: String,
}

impl Selectors {
    /// Compiles every configured selector
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            pagination: compile_selector(&config.pagination)?,
            post_title: compile_selector(&config.post_title)?,
            anchor: compile_selector("a")?,
            title: compile_selector(&config.title)?,
            download_links: compile_selector(&config.download_links)?,
            info: compile_selector(&config.info)?,
            detail_rows: compile_selector(&config.detail_rows)?,
            detail_cells: compile_selector(&config.detail_cells)?,
            tags: compile_selector(&config.tags)?,
            archive_suffix: config.archive_suffix.clone(),
        })
    }
}

impl Default for Selectors {
    fn default() -> Self {
        // The built-in selectors are known to compile
        Self::compile(&SelectorConfig::default()).expect("default selectors are valid")
    }
}
