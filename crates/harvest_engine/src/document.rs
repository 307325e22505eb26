use harvest_core::post_position;
use scraper::{Html, Selector};

/// One entry per message on a preview page.
const MESSAGE_SELECTOR: &str = ".tgme_widget_message_wrap";
/// Elements carrying the `data-post="<channel>/<id>"` position marker.
const POSITION_SELECTOR: &str = ".tgme_widget_message_wrap .js-widget_message";

/// A channel's preview page plus every older batch appended during pagination.
///
/// Batches are kept as body markup in fetch order; each is parsed once on
/// append to count its messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDocument {
    batches: Vec<Batch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Batch {
    markup: String,
    messages: usize,
    oldest_position: Option<i64>,
}

impl MessageDocument {
    pub fn from_page(html: &str) -> Self {
        let mut document = Self::default();
        document.append_batch(html);
        document
    }

    /// Appends the body content of a fetched page. An empty page adds an
    /// empty batch.
    pub fn append_batch(&mut self, html: &str) {
        let page = Html::parse_document(html);
        let messages = Selector::parse(MESSAGE_SELECTOR)
            .ok()
            .map(|sel| page.select(&sel).count())
            .unwrap_or(0);
        let oldest_position = Selector::parse(POSITION_SELECTOR).ok().and_then(|sel| {
            page.select(&sel)
                .filter_map(|el| el.value().attr("data-post"))
                .filter_map(post_position)
                .min()
        });

        self.batches.push(Batch {
            markup: body_markup(&page),
            messages,
            oldest_position,
        });
    }

    pub fn message_count(&self) -> usize {
        self.batches.iter().map(|batch| batch.messages).sum()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Smallest message id seen in any batch.
    pub fn oldest_position(&self) -> Option<i64> {
        self.batches
            .iter()
            .filter_map(|batch| batch.oldest_position)
            .min()
    }

    /// Body markup of every batch, in document order.
    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.batches.iter().map(|batch| batch.markup.as_str())
    }
}

fn body_markup(page: &Html) -> String {
    if let Ok(sel) = Selector::parse("body") {
        if let Some(body) = page.select(&sel).next() {
            return body.inner_html();
        }
    }
    page.root_element().html()
}
