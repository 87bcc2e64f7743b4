//! Harvest coordinator - main pipeline orchestration
//!
//! For every seed URL the harvester:
//! 1. Fetches the catalog root and resolves the page count
//! 2. Walks listing pages 1..=N in ascending order
//! 3. Extracts every item page linked from each listing page
//! 4. Emits one record per item, in listing order
//!
//! Item pages may be fetched concurrently, but results are always emitted
//! in the order a sequential traversal would produce them.

use crate::config::Config;
use crate::crawler::extractor::extract_record;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchError, Page};
use crate::crawler::listing::{extract_item_links, ListingPages};
use crate::crawler::pagination::resolve_page_count;
use crate::crawler::selectors::Selectors;
use crate::output::{HarvestStats, RecordSink};
use crate::record::MusicRecord;
use crate::HarvestError;
use reqwest::Client;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::task::JoinHandle;

type ItemTask = (String, JoinHandle<Result<MusicRecord, FetchError>>);

/// Main harvest coordinator structure
pub struct Harvester {
    config: Arc<Config>,
    selectors: Arc<Selectors>,
    client: Client,
    stats: HarvestStats,
}

impl Harvester {
    /// Creates a new harvester instance
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Selectors compiled and HTTP client built
    /// * `Err(HarvestError)` - A selector is invalid or the client failed to build
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let selectors = Selectors::compile(&config.selectors)?;
        let client = build_http_client(&config.user_agent, &config.crawler)?;

        Ok(Self {
            config: Arc::new(config),
            selectors: Arc::new(selectors),
            client,
            stats: HarvestStats::new(),
        })
    }

    /// Returns the counters collected so far
    pub fn stats(&self) -> &HarvestStats {
        &self.stats
    }

    /// Runs the pipeline over every seed URL, in order
    ///
    /// Under [`ErrorPolicy::Abort`](crate::ErrorPolicy::Abort) the first
    /// failure ends the run. Under the isolating policies a failed seed is
    /// logged and skipped, and the run reports
    /// [`HarvestError::SeedsFailed`] once every seed has been tried. Sink
    /// write failures always end the run.
    pub async fn run<S: RecordSink>(
        &mut self,
        seeds: &[String],
        sink: &mut S,
    ) -> Result<(), HarvestError> {
        let policy = self.config.crawler.error_policy;
        tracing::info!(
            "Starting harvest of {} seed URLs (policy: {:?}, item concurrency: {})",
            seeds.len(),
            policy,
            self.config.crawler.item_concurrency
        );

        let mut failed = 0;
        for seed in seeds {
            match self.harvest_seed(seed, sink).await {
                Ok(()) => self.stats.seeds_completed += 1,
                Err(e) => {
                    self.stats.seeds_failed += 1;
                    if !policy.isolates_seeds() || matches!(e, HarvestError::Output(_)) {
                        self.stats.log_summary();
                        return Err(e);
                    }
                    tracing::error!("Abandoning seed {}: {}", seed, e);
                    failed += 1;
                }
            }
        }

        sink.finish()?;
        self.stats.log_summary();

        if failed > 0 {
            return Err(HarvestError::SeedsFailed {
                failed,
                total: seeds.len(),
            });
        }

        Ok(())
    }

    /// Processes one catalog: pagination, every listing page, every item
    pub async fn harvest_seed<S: RecordSink>(
        &mut self,
        seed: &str,
        sink: &mut S,
    ) -> Result<(), HarvestError> {
        tracing::info!("Harvesting catalog {}", seed);

        let root = self.fetch(seed).await?;
        let total_pages = resolve_page_count(&root.document(), &self.selectors.pagination)
            .map_err(|source| HarvestError::Pagination {
                url: seed.to_string(),
                source,
            })?;
        tracing::info!("Catalog {} has {} listing pages", seed, total_pages);

        for page_url in ListingPages::new(seed, total_pages) {
            let page = self.fetch(&page_url).await?;
            let links = extract_item_links(&page.document(), &self.selectors, &page_url);

            self.stats.listing_pages += 1;
            self.stats.item_links += links.len() as u64;
            tracing::debug!("Listing page {} links {} items", page_url, links.len());

            self.harvest_items(links, sink).await?;
        }

        Ok(())
    }

    /// Extracts and emits the items of one listing page
    ///
    /// At most `item-concurrency` item pages are in flight. Finished items
    /// are emitted strictly in link order, so a window of one is a plain
    /// sequential walk.
    async fn harvest_items<S: RecordSink>(
        &mut self,
        links: Vec<String>,
        sink: &mut S,
    ) -> Result<(), HarvestError> {
        let window = self.config.crawler.item_concurrency.max(1) as usize;
        let mut pending = links.into_iter();
        let mut in_flight: VecDeque<ItemTask> = VecDeque::with_capacity(window);

        loop {
            while in_flight.len() < window {
                match pending.next() {
                    Some(url) => {
                        let handle = self.spawn_item(&url);
                        in_flight.push_back((url, handle));
                    }
                    None => break,
                }
            }

            let Some((url, handle)) = in_flight.pop_front() else {
                break;
            };

            let outcome = match handle.await {
                Ok(Ok(record)) => self.emit(&url, &record, sink),
                Ok(Err(source)) => self.item_failed(HarvestError::Fetch {
                    url: url.clone(),
                    source,
                }),
                Err(e) => self.item_failed(HarvestError::Task {
                    url: url.clone(),
                    message: e.to_string(),
                }),
            };

            if let Err(e) = outcome {
                for (_, handle) in in_flight {
                    handle.abort();
                }
                return Err(e);
            }
        }

        Ok(())
    }

    /// Starts fetching and extracting one item page
    fn spawn_item(&self, url: &str) -> JoinHandle<Result<MusicRecord, FetchError>> {
        let client = self.client.clone();
        let selectors = Arc::clone(&self.selectors);
        let url = url.to_string();

        tokio::spawn(async move {
            tracing::debug!("Extracting item {}", url);
            let page = fetch_page(&client, &url).await?;
            Ok::<_, FetchError>(extract_record(&page.document(), &selectors))
        })
    }

    /// Applies the error policy to a failed item
    fn item_failed(&mut self, error: HarvestError) -> Result<(), HarvestError> {
        if self.config.crawler.error_policy.skips_items() {
            tracing::warn!("Skipping item: {}", error);
            self.stats.items_skipped += 1;
            return Ok(());
        }
        Err(error)
    }

    /// Writes a record, tolerating serialization failures
    fn emit<S: RecordSink>(
        &mut self,
        url: &str,
        record: &MusicRecord,
        sink: &mut S,
    ) -> Result<(), HarvestError> {
        match sink.emit(record) {
            Ok(()) => {
                self.stats.records_emitted += 1;
                tracing::debug!("Emitted record for {}", url);
                Ok(())
            }
            Err(e) if e.is_recoverable() => {
                tracing::warn!("Record for {} could not be serialized: {}", url, e);
                self.stats.serialization_failures += 1;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Page, HarvestError> {
        fetch_page(&self.client, url)
            .await
            .map_err(|source| HarvestError::Fetch {
                url: url.to_string(),
                source,
            })
    }
}

/// Runs a complete harvest over `seeds`, writing records to `sink`
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::Config;
/// use catalog_harvest::crawler::run_harvest;
/// use catalog_harvest::output::JsonLinesEmitter;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let seeds = vec!["https://example.com/category/ambient/".to_string()];
/// let mut sink = JsonLinesEmitter::stdout();
/// run_harvest(Config::default(), &seeds, &mut sink).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest<S: RecordSink>(
    config: Config,
    seeds: &[String],
    sink: &mut S,
) -> Result<HarvestStats, HarvestError> {
    let mut harvester = Harvester::new(config)?;
    harvester.run(seeds, sink).await?;
    Ok(harvester.stats)
}
