use std::path::PathBuf;

use clap::Parser;
use harvest_logging::LogDestination;
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(name = "harvest")]
#[command(about = "Collect proxy configuration links from public channel pages")]
#[command(version)]
pub struct Cli {
    /// RON settings file (default: ./harvest.ron when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// CSV source list with `URL,AllMessagesFlag` columns
    #[arg(short, long)]
    pub sources: Option<PathBuf>,

    /// Directory the output files are written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output files are named `<bucket>_<suffix>.txt`
    #[arg(long)]
    pub suffix: Option<String>,

    /// Write every output newest-first
    #[arg(short, long, visible_alias = "sort", overrides_with = "no_reverse")]
    pub reverse: bool,

    /// Keep the collected order even when the settings file asks to reverse
    #[arg(long, overrides_with = "reverse")]
    pub no_reverse: bool,

    /// Keep paging back until a channel has more messages than this
    #[arg(long)]
    pub min_messages: Option<usize>,

    /// How far the cursor moves back per older batch
    #[arg(long)]
    pub page_window: Option<u32>,

    /// Provenance label appended to every configuration
    #[arg(long)]
    pub label: Option<String>,

    /// Channels crawled at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Also write the log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log to the file only, not the terminal
    #[arg(long, requires = "log_file")]
    pub log_only: bool,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        match (&self.log_file, self.log_only) {
            (Some(path), true) => LogDestination::File(path.clone()),
            (Some(path), false) => LogDestination::Both(path.clone()),
            (None, _) => LogDestination::Terminal,
        }
    }

    /// `None` leaves the settings file in charge.
    pub fn reverse_override(&self) -> Option<bool> {
        if self.reverse {
            Some(true)
        } else if self.no_reverse {
            Some(false)
        } else {
            None
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }
}
