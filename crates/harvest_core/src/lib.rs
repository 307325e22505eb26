//! Harvester core: scheme matching, relabeling, collection and finalization.
//!
//! Everything here is pure and synchronous; fetching and HTML handling live in
//! `harvest_engine`.
mod collector;
mod cursor;
mod finalize;
mod labeler;
mod matcher;
mod scheme;
mod source;

pub use collector::{CollectStats, Collector, ExtractedConfig, FinalizedOutput, OutputMode};
pub use cursor::{
    post_position, CrawlSettings, PageCursor, DEFAULT_MIN_MESSAGES, DEFAULT_PAGE_WINDOW,
};
pub use finalize::finalize;
pub use labeler::{Labeler, DEFAULT_LABEL};
pub use matcher::{ConfigMatch, ConfigMatcher, MatchBody, MatchOutcome, SkipReason};
pub use scheme::{Bucket, Scheme};
pub use source::{page_before, ExtractMode, Source, SourceUrlError};
