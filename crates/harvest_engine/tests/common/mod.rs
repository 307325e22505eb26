#![allow(dead_code)]

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A message-preview page holding `messages` as `(id, inner html)` pairs.
pub fn channel_page(channel: &str, messages: &[(i64, &str)]) -> String {
    let mut body = String::new();
    for (id, text) in messages {
        body.push_str(&format!(
            r#"<div class="tgme_widget_message_wrap js-widget_message_wrap">
  <div class="tgme_widget_message js-widget_message" data-post="{channel}/{id}">
    <div class="tgme_widget_message_text js-message_text" dir="auto">{text}</div>
  </div>
</div>
"#
        ));
    }
    format!(
        r#"<!DOCTYPE html><html><head><title>{channel}</title></head>
<body><section class="tgme_channel_history js-message_history">
{body}</section></body></html>"#
    )
}

/// Plain messages without any links, ids `first..=last`.
pub fn filler_page(channel: &str, first: i64, last: i64) -> String {
    let messages: Vec<(i64, &str)> = (first..=last).map(|id| (id, "hello")).collect();
    channel_page(channel, &messages)
}

pub fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

/// Serves `body` for the first page of `/s/<channel>`.
pub async fn mount_first_page(server: &MockServer, channel: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/s/{channel}")))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Serves `response` for `/s/<channel>?before=<before>`, exactly once.
pub async fn mount_before(server: &MockServer, channel: &str, before: i64, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/s/{channel}")))
        .and(query_param("before", before.to_string()))
        .respond_with(response)
        .with_priority(1)
        .expect(1)
        .mount(server)
        .await;
}
