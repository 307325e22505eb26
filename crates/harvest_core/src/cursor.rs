/// Message count a crawl tries to reach before it stops paginating.
pub const DEFAULT_MIN_MESSAGES: usize = 100;

/// Number of messages one `?before=` step of the preview page reveals.
///
/// Tied to the upstream page's batch size, so it is a setting rather than a
/// hard limit.
pub const DEFAULT_PAGE_WINDOW: u32 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSettings {
    pub min_messages: usize,
    pub page_window: u32,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            min_messages: DEFAULT_MIN_MESSAGES,
            page_window: DEFAULT_PAGE_WINDOW,
        }
    }
}

/// Backward pagination boundary. Only ever moves toward zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    position: i64,
    window: i64,
}

impl PageCursor {
    /// Returns `None` when there is nothing older to request.
    pub fn new(start: i64, window: u32) -> Option<Self> {
        if start <= 0 || window == 0 {
            return None;
        }
        Some(Self {
            position: start,
            window: i64::from(window),
        })
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    /// Steps one window back. Returns `false` once history is exhausted.
    pub fn retreat(&mut self) -> bool {
        self.position = self.position.saturating_sub(self.window);
        self.position > 0
    }
}

/// Numeric message id from a `data-post="<channel>/<id>"` attribute.
pub fn post_position(data_post: &str) -> Option<i64> {
    data_post
        .rsplit('/')
        .next()
        .and_then(|id| id.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
}
