use thiserror::Error;
use url::Url;

use crate::OutputMode;

const TELEGRAM_HOSTS: &[&str] = &["t.me", "www.t.me", "telegram.me", "www.telegram.me"];
const PREVIEW_SEGMENT: &str = "s";

/// One row of the source list: a channel page and how its messages are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub location: String,
    pub include_all_messages: bool,
}

/// Which message containers the extractor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Every message text block.
    AllMessages,
    /// Only `code` and `pre` blocks.
    CodeBlocks,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceUrlError {
    #[error("cannot parse {location:?}: {message}")]
    Invalid { location: String, message: String },
    #[error("unsupported url scheme {scheme:?} in {location:?}")]
    UnsupportedScheme { location: String, scheme: String },
    #[error("no channel name in {0:?}")]
    MissingChannel(String),
}

impl Source {
    pub fn new(location: impl Into<String>, include_all_messages: bool) -> Self {
        Self {
            location: location.into(),
            include_all_messages,
        }
    }

    pub fn extract_mode(&self) -> ExtractMode {
        if self.include_all_messages {
            ExtractMode::AllMessages
        } else {
            ExtractMode::CodeBlocks
        }
    }

    /// All-messages sources feed the combined output; code-block sources feed
    /// the per-scheme outputs.
    pub fn output_mode(&self) -> OutputMode {
        if self.include_all_messages {
            OutputMode::Mixed
        } else {
            OutputMode::Separate
        }
    }

    /// Address of the message-preview page for this source.
    ///
    /// Telegram channel links (`https://t.me/<name>`) are rewritten to the web
    /// preview (`https://t.me/s/<name>`). Other hosts are used unchanged.
    pub fn preview_url(&self) -> Result<Url, SourceUrlError> {
        let location = self.location.trim();
        let mut url = Url::parse(location).map_err(|err| SourceUrlError::Invalid {
            location: location.to_string(),
            message: err.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(SourceUrlError::UnsupportedScheme {
                location: location.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        let is_telegram = url
            .host_str()
            .map(|host| TELEGRAM_HOSTS.iter().any(|t| t.eq_ignore_ascii_case(host)))
            .unwrap_or(false);
        if !is_telegram {
            return Ok(url);
        }

        let segments: Vec<String> = url
            .path_segments()
            .map(|parts| {
                parts
                    .filter(|part| !part.is_empty())
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let channel = match segments.as_slice() {
            [] => return Err(SourceUrlError::MissingChannel(location.to_string())),
            [first] if first == PREVIEW_SEGMENT => {
                return Err(SourceUrlError::MissingChannel(location.to_string()))
            }
            [first, channel, ..] if first == PREVIEW_SEGMENT => channel.clone(),
            [channel, ..] => channel.clone(),
        };

        url.set_path(&format!("/{PREVIEW_SEGMENT}/{channel}"));
        url.set_fragment(None);
        url.set_host(Some("t.me"))
            .map_err(|err| SourceUrlError::Invalid {
                location: location.to_string(),
                message: err.to_string(),
            })?;
        Ok(url)
    }
}

/// Preview page listing the messages older than `cursor`.
pub fn page_before(preview: &Url, cursor: i64) -> Url {
    let retained: Vec<(String, String)> = preview
        .query_pairs()
        .filter(|(key, _)| key != "before")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = preview.clone();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("before", &cursor.to_string());
    }
    url
}
