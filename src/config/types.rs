use serde::Deserialize;

/// Main configuration structure for Catalog-Harvest
///
/// Every section has defaults, so an empty document describes the
/// reference behavior: sequential crawl, abort on the first failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub selectors: SelectorConfig,
}

/// What to do when a fetch or pagination step fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Stop the whole run at the first failure
    #[default]
    Abort,

    /// Abandon the failing seed URL and move on to the next one
    ContinueOnSeedError,

    /// Skip item pages that fail to fetch; seed-level failures abandon the seed
    SkipFailedItems,
}

impl ErrorPolicy {
    /// Returns true if a failed seed should not stop the run
    pub fn isolates_seeds(&self) -> bool {
        !matches!(self, Self::Abort)
    }

    /// Returns true if a failed item page should be skipped
    pub fn skips_items(&self) -> bool {
        matches!(self, Self::SkipFailedItems)
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of item pages fetched at once
    #[serde(rename = "item-concurrency")]
    pub item_concurrency: u32,

    /// Failure handling policy
    #[serde(rename = "error-policy")]
    pub error_policy: ErrorPolicy,

    /// Optional per-request timeout in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            item_concurrency: 1,
            error_policy: ErrorPolicy::Abort,
            request_timeout_secs: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// CSS selectors locating each piece of a catalog page
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Pagination indicator on the catalog root
    pub pagination: String,

    /// Item entries on a listing page; the first anchor inside holds the link
    #[serde(rename = "post-title")]
    pub post_title: String,

    /// Item page heading
    pub title: String,

    /// Anchors in the download table
    #[serde(rename = "download-links")]
    pub download_links: String,

    /// Paragraphs holding the description, genres and artist
    pub info: String,

    /// Rows of the technical detail table
    #[serde(rename = "detail-rows")]
    pub detail_rows: String,

    /// Cells inside a detail row
    #[serde(rename = "detail-cells")]
    pub detail_cells: String,

    /// Tag anchors
    pub tags: String,

    /// Suffix a download link must end with
    #[serde(rename = "archive-suffix")]
    pub archive_suffix: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            pagination: ".pages".to_string(),
            post_title: ".post-title".to_string(),
            title: ".post-inner.group h1".to_string(),
            download_links: "table tbody tr td a".to_string(),
            info: ".entry-inner p".to_string(),
            detail_rows: "table tbody tr".to_string(),
            detail_cells: "td".to_string(),
            tags: ".post-tags a".to_string(),
            archive_suffix: ".zip".to_string(),
        }
    }
}
