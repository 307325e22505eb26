//! Harvester engine: fetching, pagination, message extraction and the run driver.
mod crawl;
mod decode;
mod document;
mod engine;
mod extract;
mod fetch;
mod output;
mod types;

pub use crawl::{CrawlOutput, Crawler};
pub use decode::decode_page;
pub use document::MessageDocument;
pub use engine::{
    ConfigError, HarvestConfig, HarvestReport, Harvester, SourceReport, SourceStats,
    DEFAULT_CONCURRENCY,
};
pub use extract::extract_lines;
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use output::{OutputError, OutputWriter, DEFAULT_OUTPUT_SUFFIX};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, SourceError};
