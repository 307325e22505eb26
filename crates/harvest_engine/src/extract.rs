use ego_tree::NodeRef;
use harvest_core::ExtractMode;
use scraper::node::Node;
use scraper::{Html, Selector};

use crate::MessageDocument;

const MESSAGE_TEXT_SELECTOR: &str = ".tgme_widget_message_text";
const CODE_BLOCK_SELECTOR: &str = "code, pre";

/// Candidate lines from the selected message containers, in document order.
///
/// `<br>` becomes a line break, everything else is reduced to its text with
/// entities decoded. Lines are trimmed and blank lines dropped.
pub fn extract_lines(document: &MessageDocument, mode: ExtractMode) -> Vec<String> {
    let css = match mode {
        ExtractMode::AllMessages => MESSAGE_TEXT_SELECTOR,
        ExtractMode::CodeBlocks => CODE_BLOCK_SELECTOR,
    };
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    for fragment in document.fragments() {
        let html = Html::parse_fragment(fragment);
        for container in html.select(&selector) {
            let mut text = String::new();
            push_text(*container, &mut text);
            lines.extend(
                text.split('\n')
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(ToOwned::to_owned),
            );
        }
    }
    lines
}

fn push_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) if element.name().eq_ignore_ascii_case("br") => out.push('\n'),
        _ => {
            for child in node.children() {
                push_text(child, out);
            }
        }
    }
}
