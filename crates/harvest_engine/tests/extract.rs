mod common;

use common::channel_page;
use harvest_core::ExtractMode;
use harvest_engine::{extract_lines, MessageDocument};
use pretty_assertions::assert_eq;

#[test]
fn line_breaks_split_message_text() {
    let page = channel_page(
        "chan",
        &[(7, "Fresh servers<br/>vless://id@h:443#x<br/>  <br/> &amp; more  ")],
    );
    let document = MessageDocument::from_page(&page);

    assert_eq!(
        extract_lines(&document, ExtractMode::AllMessages),
        vec!["Fresh servers", "vless://id@h:443#x", "& more"]
    );
}

#[test]
fn code_block_mode_reads_only_code_and_pre() {
    let page = channel_page(
        "chan",
        &[
            (1, "ss://prose@h:1#x"),
            (2, "config below<br/><code>trojan://pw@h:443#y</code>"),
            (3, "<pre>vless://a@h:1#z<br/>vless://b@h:1#z</pre>"),
        ],
    );
    let document = MessageDocument::from_page(&page);

    assert_eq!(
        extract_lines(&document, ExtractMode::CodeBlocks),
        vec!["trojan://pw@h:443#y", "vless://a@h:1#z", "vless://b@h:1#z"]
    );
    assert_eq!(
        extract_lines(&document, ExtractMode::AllMessages),
        vec![
            "ss://prose@h:1#x",
            "config below",
            "trojan://pw@h:443#y",
            "vless://a@h:1#z",
            "vless://b@h:1#z",
        ]
    );
}

#[test]
fn appended_batches_follow_the_first_page() {
    let mut document = MessageDocument::from_page(&channel_page("chan", &[(50, "newer")]));
    document.append_batch(&channel_page("chan", &[(20, "older"), (21, "old")]));

    assert_eq!(document.message_count(), 3);
    assert_eq!(document.oldest_position(), Some(20));
    assert_eq!(
        extract_lines(&document, ExtractMode::AllMessages),
        vec!["newer", "older", "old"]
    );
}

#[test]
fn empty_batch_adds_nothing() {
    let mut document = MessageDocument::from_page(&channel_page("chan", &[(3, "one")]));
    document.append_batch("");

    assert_eq!(document.batch_count(), 2);
    assert_eq!(document.message_count(), 1);
    assert_eq!(extract_lines(&document, ExtractMode::AllMessages), vec!["one"]);
}
