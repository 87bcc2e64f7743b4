//! Run statistics
//!
//! Counters kept by the harvester while it runs. The summary is logged,
//! never written to the record stream.

/// Counters for one harvest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestStats {
    /// Seed URLs fully processed
    pub seeds_completed: u64,

    /// Seed URLs abandoned after an error
    pub seeds_failed: u64,

    /// Listing pages fetched
    pub listing_pages: u64,

    /// Item links found across all listing pages
    pub item_links: u64,

    /// Records written to the sink
    pub records_emitted: u64,

    /// Item pages skipped after a fetch failure
    pub items_skipped: u64,

    /// Records dropped because they could not be serialized
    pub serialization_failures: u64,
}

impl HarvestStats {
    /// Creates an empty set of counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of items that did not produce a record
    pub fn items_lost(&self) -> u64 {
        self.items_skipped + self.serialization_failures
    }

    /// Logs a one-line summary of the run
    pub fn log_summary(&self) {
        tracing::info!(
            "Harvest finished: {} seeds completed, {} failed, {} listing pages, {} item links, {} records emitted",
            self.seeds_completed,
            self.seeds_failed,
            self.listing_pages,
            self.item_links,
            self.records_emitted
        );

        if self.items_lost() > 0 {
            tracing::warn!(
                "{} items produced no record ({} fetch failures, {} serialization failures)",
                self.items_lost(),
                self.items_skipped,
                self.serialization_failures
            );
        }
    }
}
