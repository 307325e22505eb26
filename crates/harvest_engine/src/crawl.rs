use harvest_core::{page_before, CrawlSettings, PageCursor};
use harvest_logging::{harvest_debug, harvest_warn};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{decode_page, Fetcher, MessageDocument, SourceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOutput {
    pub document: MessageDocument,
    /// Older batches requested after the first page.
    pub pages_fetched: usize,
    /// Batches whose fetch failed and were counted as empty.
    pub failed_batches: usize,
    /// Body bytes of every page that loaded.
    pub bytes_fetched: u64,
}

/// Walks a channel's preview page backwards until enough messages are loaded.
pub struct Crawler<'a> {
    fetcher: &'a dyn Fetcher,
    settings: CrawlSettings,
}

impl<'a> Crawler<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, settings: CrawlSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Returns a document holding at least `min_messages` messages, or the
    /// whole history when the channel has fewer.
    ///
    /// Only the first page is required: a failed older batch counts as empty
    /// and the cursor still moves, so the loop makes at most
    /// `oldest_id / page_window + 1` requests.
    pub async fn crawl(
        &self,
        preview: &Url,
        cancel: &CancellationToken,
    ) -> Result<CrawlOutput, SourceError> {
        let first_page = self.fetch_page(preview, cancel).await?;
        let mut output = CrawlOutput {
            document: MessageDocument::from_page(&first_page.html),
            pages_fetched: 0,
            failed_batches: 0,
            bytes_fetched: first_page.byte_len,
        };

        if output.document.message_count() >= self.settings.min_messages {
            return Ok(output);
        }

        let Some(mut cursor) = output
            .document
            .oldest_position()
            .and_then(|start| PageCursor::new(start, self.settings.page_window))
        else {
            harvest_debug!("No position marker on {}; nothing older to load", preview);
            return Ok(output);
        };

        loop {
            let url = page_before(preview, cursor.position());
            let batch = match self.fetch_page(&url, cancel).await {
                Ok(page) => {
                    output.bytes_fetched += page.byte_len;
                    page.html
                }
                Err(SourceError::Cancelled) => return Err(SourceError::Cancelled),
                Err(err) => {
                    harvest_warn!("Older batch {} failed: {}", url, err);
                    output.failed_batches += 1;
                    String::new()
                }
            };
            output.document.append_batch(&batch);
            output.pages_fetched += 1;

            let messages = output.document.message_count();
            harvest_debug!(
                "Paged {} before={} -> {} messages",
                preview,
                cursor.position(),
                messages
            );
            if messages > self.settings.min_messages || !cursor.retreat() {
                break;
            }
        }

        Ok(output)
    }

    async fn fetch_page(&self, url: &Url, cancel: &CancellationToken) -> Result<Page, SourceError> {
        let output = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SourceError::Cancelled),
            result = self.fetcher.fetch(url.as_str()) => result?,
        };

        let metadata = output.metadata;
        if metadata.final_url != url.as_str() {
            // Channels without a public preview bounce to their landing page.
            harvest_warn!("{} redirected to {}", url, metadata.final_url);
        }
        Ok(Page {
            html: decode_page(&output.bytes, metadata.content_type.as_deref()),
            byte_len: metadata.byte_len,
        })
    }
}

struct Page {
    html: String,
    byte_len: u64,
}
