//! Pagination resolution
//!
//! The catalog root carries a pagination indicator such as `Page 1 of 12`.
//! Its text is matched against a two-token pattern: the first captured
//! word is the current page label and the second is the last page number.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use thiserror::Error;

/// Two words, each preceded by a non-whitespace run: `<x> <current> <y> <last>`
const PAGINATION_PATTERN: &str = r"\S+\s+(\w+)\s+\S+\s+(\w+)";

/// Reasons a page count could not be determined
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// The indicator is missing or does not have the expected shape
    #[error("no pagination indicator found (catalog may have a single page)")]
    NoPagination,

    /// The last page token is not a positive integer
    #[error("could not parse page count from '{token}'")]
    PageCountParse { token: String },
}

/// Current page label and total page count read from the indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    pub current: String,
    pub total: u32,
}

fn pagination_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PAGINATION_PATTERN).expect("pagination pattern is valid"))
}

/// Parses pagination indicator text
///
/// # Example
///
/// ```
/// use catalog_harvest::crawler::parse_pagination;
///
/// let descriptor = parse_pagination("Page 2 of 3").unwrap();
/// assert_eq!(descriptor.current, "2");
/// assert_eq!(descriptor.total, 3);
/// ```
pub fn parse_pagination(text: &str) -> Result<PageDescriptor, PaginationError> {
    let captures = pagination_regex()
        .captures(text)
        .ok_or(PaginationError::NoPagination)?;

    let current = captures[1].to_string();
    let token = &captures[2];

    let total = token
        .parse::<u32>()
        .ok()
        .filter(|total| *total >= 1)
        .ok_or_else(|| PaginationError::PageCountParse {
            token: token.to_string(),
        })?;

    Ok(PageDescriptor { current, total })
}

/// Resolves the total page count of a catalog root document
///
/// The text of every element matching `selector` is concatenated before
/// parsing, so an absent region yields [`PaginationError::NoPagination`].
pub fn resolve_page_count(document: &Html, selector: &Selector) -> Result<u32, PaginationError> {
    let text: String = document
        .select(selector)
        .flat_map(|element| element.text())
        .collect();

    parse_pagination(&text).map(|descriptor| descriptor.total)
}
