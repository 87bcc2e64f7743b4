//! Listing page enumeration
//!
//! A catalog with N listing pages is walked as `root + "page/" + n` for
//! n = 1..=N. Each listing page contributes the link of every post title
//! it contains, in document order. Links repeated across pages are kept.

use crate::crawler::selectors::Selectors;
use scraper::Html;
use url::Url;

/// Lazy sequence of listing page URLs for one catalog root
///
/// Finite and not restartable: once drained, it stays empty.
#[derive(Debug, Clone)]
pub struct ListingPages {
    root: String,
    next: u64,
    total: u64,
}

impl ListingPages {
    /// Creates the sequence of `total` page URLs under `root`
    pub fn new(root: &str, total: u32) -> Self {
        Self {
            root: root.to_string(),
            next: 1,
            total: u64::from(total),
        }
    }
}

impl Iterator for ListingPages {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next > self.total {
            return None;
        }
        let url = format!("{}page/{}", self.root, self.next);
        self.next += 1;
        Some(url)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total + 1).saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ListingPages {}

/// Builds all listing page URLs for a catalog root
///
/// # Example
///
/// ```
/// use catalog_harvest::crawler::page_urls;
///
/// let urls = page_urls("https://example.com/catalog/", 2);
/// assert_eq!(urls, vec![
///     "https://example.com/catalog/page/1",
///     "https://example.com/catalog/page/2",
/// ]);
/// ```
pub fn page_urls(root: &str, total: u32) -> Vec<String> {
    ListingPages::new(root, total).collect()
}

/// Extracts item links from a listing page
///
/// For each post title, the `href` of its first anchor is taken and resolved
/// against `page_url`. A post title without a linked anchor still yields an
/// entry, the empty string, so the item fails when fetched and the error
/// policy decides what happens to it.
pub fn extract_item_links(document: &Html, selectors: &Selectors, page_url: &str) -> Vec<String> {
    let base = Url::parse(page_url).ok();

    document
        .select(&selectors.post_title)
        .map(|element| {
            let href = element
                .select(&selectors.anchor)
                .next()
                .and_then(|a| a.value().attr("href"));

            match href {
                Some(href) => resolve_link(href, base.as_ref()),
                None => {
                    tracing::warn!("Post title without link on {}", page_url);
                    String::new()
                }
            }
        })
        .collect()
}

/// Resolves an href against the listing page URL
///
/// Falls back to the raw href when there is no usable base or the join fails.
fn resolve_link(href: &str, base: Option<&Url>) -> String {
    let href = href.trim();
    match base.map(|base| base.join(href)) {
        Some(Ok(absolute_url)) => absolute_url.to_string(),
        _ => href.to_string(),
    }
}
