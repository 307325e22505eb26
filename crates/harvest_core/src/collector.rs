use std::collections::BTreeMap;

use crate::{finalize, Bucket, ConfigMatch, Labeler, MatchOutcome, Scheme};

/// Where a source's configurations are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// One buffer per scheme, label only.
    Separate,
    /// The combined buffer, label plus sequence number.
    Mixed,
}

/// A configuration after relabeling, as appended to its buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedConfig {
    pub scheme: Scheme,
    pub raw_match: String,
    pub rewritten: String,
    /// Position within the receiving buffer, starting at 1.
    pub sequence_id: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub configs: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedOutput {
    pub bucket: Bucket,
    pub text: String,
}

impl FinalizedOutput {
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Buffer {
    text: String,
    last_id: u32,
}

/// Run-wide accumulator of rewritten configurations, one buffer per bucket.
///
/// Owned by whoever drives the run; sources hand their match outcomes in and
/// the buffers are deduplicated once by [`Collector::finalize`].
#[derive(Debug, Clone)]
pub struct Collector {
    labeler: Labeler,
    buffers: BTreeMap<Bucket, Buffer>,
}

impl Collector {
    pub fn new(labeler: Labeler) -> Self {
        let buffers = Bucket::ALL
            .iter()
            .map(|bucket| (*bucket, Buffer::default()))
            .collect();
        Self { labeler, buffers }
    }

    /// Relabels one configuration and appends it to its buffer.
    pub fn accept(&mut self, config: &ConfigMatch, mode: OutputMode) -> ExtractedConfig {
        let bucket = match mode {
            OutputMode::Separate => Bucket::Scheme(config.scheme),
            OutputMode::Mixed => Bucket::Mixed,
        };
        let buffer = self.buffers.entry(bucket).or_default();
        buffer.last_id += 1;
        let sequence_id = buffer.last_id;

        let shown_id = matches!(mode, OutputMode::Mixed).then_some(sequence_id);
        let rewritten = self.labeler.rewrite(config, shown_id);
        buffer.text.push_str(&rewritten);
        buffer.text.push('\n');

        ExtractedConfig {
            scheme: config.scheme,
            raw_match: config.raw.clone(),
            rewritten,
            sequence_id,
        }
    }

    /// Accepts every found configuration and counts the skipped ones.
    pub fn absorb<I>(&mut self, outcomes: I, mode: OutputMode) -> CollectStats
    where
        I: IntoIterator<Item = MatchOutcome>,
    {
        let mut stats = CollectStats::default();
        for outcome in outcomes {
            match outcome {
                MatchOutcome::Found(config) => {
                    self.accept(&config, mode);
                    stats.configs += 1;
                }
                MatchOutcome::Skipped { .. } => stats.skipped += 1,
            }
        }
        stats
    }

    /// Raw, not yet deduplicated, content of one buffer.
    pub fn buffer(&self, bucket: Bucket) -> &str {
        self.buffers
            .get(&bucket)
            .map(|buffer| buffer.text.as_str())
            .unwrap_or("")
    }

    /// Deduplicates every buffer. Always yields one output per bucket, in
    /// [`Bucket::ALL`] order, even for empty buffers.
    pub fn finalize(self, reverse: bool) -> Vec<FinalizedOutput> {
        Bucket::ALL
            .iter()
            .map(|bucket| FinalizedOutput {
                bucket: *bucket,
                text: finalize(self.buffer(*bucket), reverse),
            })
            .collect()
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(Labeler::default())
    }
}
