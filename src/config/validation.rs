use crate::config::types::{Config, CrawlerConfig, SelectorConfig, UserAgentConfig};
use crate::ConfigError;
use scraper::Selector;

/// Upper bound on concurrent item fetches
const MAX_ITEM_CONCURRENCY: u32 = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_selector_config(&config.selectors)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.item_concurrency < 1 || config.item_concurrency > MAX_ITEM_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "item_concurrency must be between 1 and {}, got {}",
            MAX_ITEM_CONCURRENCY, config.item_concurrency
        )));
    }

    if config.request_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be > 0 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every selector compiles
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for selector in [
        &config.pagination,
        &config.post_title,
        &config.title,
        &config.download_links,
        &config.info,
        &config.detail_rows,
        &config.detail_cells,
        &config.tags,
    ] {
        compile_selector(selector)?;
    }

    if config.archive_suffix.is_empty() {
        return Err(ConfigError::Validation(
            "archive_suffix cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Compiles a CSS selector, mapping the parse failure into a config error
pub(crate) fn compile_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}
