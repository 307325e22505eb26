use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use harvest_core::{CrawlSettings, DEFAULT_LABEL, DEFAULT_MIN_MESSAGES, DEFAULT_PAGE_WINDOW};
use harvest_engine::{
    FetchSettings, HarvestConfig, DEFAULT_CONCURRENCY, DEFAULT_OUTPUT_SUFFIX, DEFAULT_USER_AGENT,
};
use harvest_logging::{harvest_info, harvest_warn};
use serde::Deserialize;

use crate::cli::Cli;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "harvest.ron";

/// Contents of the RON settings file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub sources: PathBuf,
    pub output_dir: PathBuf,
    pub suffix: String,
    pub reverse: bool,
    pub min_messages: usize,
    pub page_window: u32,
    pub label: String,
    pub concurrency: usize,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for SettingsFile {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            sources: PathBuf::from("channels.csv"),
            output_dir: PathBuf::from("."),
            suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            reverse: false,
            min_messages: DEFAULT_MIN_MESSAGES,
            page_window: DEFAULT_PAGE_WINDOW,
            label: DEFAULT_LABEL.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: fetch.request_timeout.as_secs(),
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            max_bytes: fetch.max_bytes,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Everything a run needs once the file and the flags are merged.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub sources: PathBuf,
    pub output_dir: PathBuf,
    pub suffix: String,
    pub harvest: HarvestConfig,
}

/// Reads the settings file.
///
/// A file named with `--config` must exist and parse. The implicit
/// `harvest.ron` is optional; if it is unreadable the defaults are used.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<SettingsFile> {
    if let Some(path) = explicit {
        let settings = read_settings(path)
            .with_context(|| format!("Failed to load settings from {:?}", path))?;
        harvest_info!("Loaded settings from {:?}", path);
        return Ok(settings);
    }

    let path = Path::new(DEFAULT_SETTINGS_FILE);
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    match read_settings(path) {
        Ok(settings) => {
            harvest_info!("Loaded settings from {:?}", path);
            Ok(settings)
        }
        Err(err) => {
            harvest_warn!("Ignoring {:?}: {:#}", path, err);
            Ok(SettingsFile::default())
        }
    }
}

fn read_settings(path: &Path) -> anyhow::Result<SettingsFile> {
    let content = fs::read_to_string(path)?;
    let settings = ron::from_str(&content)?;
    Ok(settings)
}

/// Command-line flags win over file values.
pub fn resolve(cli: &Cli, file: SettingsFile) -> RunPlan {
    let fetch = FetchSettings {
        connect_timeout: Duration::from_secs(file.connect_timeout_secs),
        request_timeout: Duration::from_secs(cli.timeout_secs.unwrap_or(file.timeout_secs)),
        max_bytes: file.max_bytes,
        user_agent: file.user_agent,
        ..FetchSettings::default()
    };

    RunPlan {
        sources: cli.sources.clone().unwrap_or(file.sources),
        output_dir: cli.output_dir.clone().unwrap_or(file.output_dir),
        suffix: cli.suffix.clone().unwrap_or(file.suffix),
        harvest: HarvestConfig {
            fetch,
            crawl: CrawlSettings {
                min_messages: cli.min_messages.unwrap_or(file.min_messages),
                page_window: cli.page_window.unwrap_or(file.page_window),
            },
            label: cli.label.clone().unwrap_or(file.label),
            concurrency: cli.concurrency.unwrap_or(file.concurrency),
            reverse: cli.reverse_override().unwrap_or(file.reverse),
        },
    }
}
