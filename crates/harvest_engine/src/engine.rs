use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use harvest_core::{
    Collector, ConfigMatcher, CrawlSettings, FinalizedOutput, Labeler, MatchOutcome, Source,
    DEFAULT_LABEL,
};
use harvest_logging::{harvest_debug, harvest_error, harvest_info};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{extract_lines, Crawler, FetchSettings, Fetcher, ReqwestFetcher, SourceError};

/// Sources crawled at the same time.
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub fetch: FetchSettings,
    pub crawl: CrawlSettings,
    pub label: String,
    pub concurrency: usize,
    /// Emit each output newest-first.
    pub reverse: bool,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            crawl: CrawlSettings::default(),
            label: DEFAULT_LABEL.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            reverse: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("page window must be at least 1")]
    ZeroPageWindow,
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("provenance label must not be empty")]
    EmptyLabel,
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    #[error("cannot build http client: {0}")]
    HttpClient(String),
}

impl HarvestConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crawl.page_window == 0 {
            return Err(ConfigError::ZeroPageWindow);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.label.trim().is_empty() {
            return Err(ConfigError::EmptyLabel);
        }
        if self.fetch.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub messages: usize,
    pub pages_fetched: usize,
    pub failed_batches: usize,
    pub bytes_fetched: u64,
    pub lines: usize,
    pub configs: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub location: String,
    pub result: Result<SourceStats, SourceError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestReport {
    pub sources: Vec<SourceReport>,
    /// One entry per bucket, deduplicated and ordered.
    pub outputs: Vec<FinalizedOutput>,
}

impl HarvestReport {
    pub fn failed_sources(&self) -> usize {
        self.sources.iter().filter(|s| s.result.is_err()).count()
    }
}

/// Everything one source yielded before collection.
struct SourceHarvest {
    stats: SourceStats,
    outcomes: Vec<MatchOutcome>,
}

/// Drives a whole run: crawl, extract and match every source, then
/// deduplicate the collected buffers.
pub struct Harvester {
    config: HarvestConfig,
    fetcher: Arc<dyn Fetcher>,
    matcher: ConfigMatcher,
}

impl Harvester {
    pub fn new(config: HarvestConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let fetcher = ReqwestFetcher::new(config.fetch.clone())
            .map_err(|err| ConfigError::HttpClient(err.to_string()))?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    pub fn with_fetcher(config: HarvestConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            fetcher,
            matcher: ConfigMatcher::new(),
        })
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Processes every source and returns the finalized outputs.
    ///
    /// Up to `concurrency` sources are in flight at once. Results are
    /// collected in source-list order, so the outputs do not depend on which
    /// fetch finishes first. A failed or cancelled source is reported and
    /// skipped; every bucket still gets an output.
    pub async fn run(&self, sources: Vec<Source>, cancel: &CancellationToken) -> HarvestReport {
        let mut collector = Collector::new(Labeler::new(self.config.label.clone()));
        let mut reports = Vec::with_capacity(sources.len());

        let mut harvests = stream::iter(sources.into_iter().map(move |source| async move {
            let result = self.harvest_source(&source, cancel).await;
            (source, result)
        }))
        .buffered(self.config.concurrency);

        while let Some((source, result)) = harvests.next().await {
            let result = result.map(|harvest| {
                let collected = collector.absorb(harvest.outcomes, source.output_mode());
                SourceStats {
                    configs: collected.configs,
                    skipped: collected.skipped,
                    ..harvest.stats
                }
            });

            match &result {
                Ok(stats) => harvest_info!(
                    "Crawled {}: {} messages in {} KiB, {} lines, {} configs ({} skipped)",
                    source.location,
                    stats.messages,
                    stats.bytes_fetched / 1024,
                    stats.lines,
                    stats.configs,
                    stats.skipped
                ),
                Err(err) => harvest_error!("Skipping {}: {}", source.location, err),
            }

            reports.push(SourceReport {
                location: source.location,
                result,
            });
        }

        HarvestReport {
            sources: reports,
            outputs: collector.finalize(self.config.reverse),
        }
    }

    async fn harvest_source(
        &self,
        source: &Source,
        cancel: &CancellationToken,
    ) -> Result<SourceHarvest, SourceError> {
        if cancel.is_cancelled() {
            return Err(SourceError::Cancelled);
        }
        let preview = source.preview_url()?;
        harvest_info!("Crawling {}", preview);

        let crawler = Crawler::new(self.fetcher.as_ref(), self.config.crawl);
        let crawl = crawler.crawl(&preview, cancel).await?;

        let lines = extract_lines(&crawl.document, source.extract_mode());
        let mut outcomes = Vec::new();
        for line in &lines {
            for outcome in self.matcher.scan_line(line) {
                if let MatchOutcome::Skipped { scheme, reason, .. } = &outcome {
                    harvest_debug!("Skipped {} link on {}: {}", scheme, preview, reason);
                }
                outcomes.push(outcome);
            }
        }

        Ok(SourceHarvest {
            stats: SourceStats {
                messages: crawl.document.message_count(),
                pages_fetched: crawl.pages_fetched,
                failed_batches: crawl.failed_batches,
                bytes_fetched: crawl.bytes_fetched,
                lines: lines.len(),
                ..SourceStats::default()
            },
            outcomes,
        })
    }
}
