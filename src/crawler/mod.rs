//! Crawler module for catalog fetching and extraction
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching
//! - Pagination resolution on the catalog root
//! - Listing page enumeration and item link extraction
//! - Item page extraction into records
//! - Overall harvest coordination

mod coordinator;
mod extractor;
mod fetcher;
mod listing;
mod pagination;
mod selectors;

pub use coordinator::{run_harvest, Harvester};
pub use extractor::{
    extract_detail, extract_download_url, extract_record, extract_tags, extract_title,
    parse_detail_rows, parse_summary,
};
pub use fetcher::{build_http_client, fetch_page, FetchError, Page};
pub use listing::{extract_item_links, page_urls, ListingPages};
pub use pagination::{parse_pagination, resolve_page_count, PageDescriptor, PaginationError};
pub use selectors::Selectors;
