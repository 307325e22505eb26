mod common;

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::{channel_page, mount_first_page};
use harvest_core::{Bucket, CrawlSettings, Scheme, Source};
use harvest_engine::{ConfigError, HarvestConfig, HarvestReport, Harvester, SourceError};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;
use wiremock::MockServer;

fn config() -> HarvestConfig {
    HarvestConfig {
        crawl: CrawlSettings {
            min_messages: 1,
            page_window: 21,
        },
        label: "@t".to_string(),
        ..HarvestConfig::default()
    }
}

fn output(report: &HarvestReport, bucket: Bucket) -> &str {
    report
        .outputs
        .iter()
        .find(|output| output.bucket == bucket)
        .map(|output| output.text.as_str())
        .expect("every bucket has an output")
}

fn source(server: &MockServer, channel: &str, all_messages: bool) -> Source {
    Source::new(format!("{}/s/{channel}", server.uri()), all_messages)
}

#[tokio::test]
async fn duplicate_configs_across_sources_collapse() {
    let server = MockServer::start().await;
    let body = "<code>vless://id@h:443#x</code>";
    mount_first_page(&server, "a", channel_page("a", &[(5, body)])).await;
    mount_first_page(&server, "b", channel_page("b", &[(9, body)])).await;

    let harvester = Harvester::new(config()).expect("valid config");
    let sources = vec![source(&server, "a", false), source(&server, "b", false)];
    let report = harvester.run(sources, &CancellationToken::new()).await;

    assert_eq!(report.failed_sources(), 0);
    assert_eq!(report.outputs.len(), 5);
    assert_eq!(output(&report, Bucket::Scheme(Scheme::Vless)), "vless://id@h:443#@t");
    assert_eq!(output(&report, Bucket::Mixed), "");
}

#[tokio::test]
async fn all_messages_source_feeds_mixed_with_sequence_ids() {
    let server = MockServer::start().await;
    let body = "new servers<br/>ss://abc@h:1#one<br/>trojan://pw@h:2#two";
    mount_first_page(&server, "mix", channel_page("mix", &[(3, body)])).await;

    let harvester = Harvester::new(config()).expect("valid config");
    let report = harvester
        .run(vec![source(&server, "mix", true)], &CancellationToken::new())
        .await;

    assert_eq!(
        output(&report, Bucket::Mixed),
        "ss://abc@h:1#@t-1\ntrojan://pw@h:2#@t-2"
    );
    assert_eq!(output(&report, Bucket::Scheme(Scheme::Shadowsocks)), "");
    assert_eq!(output(&report, Bucket::Scheme(Scheme::Trojan)), "");

    let stats = report.sources[0].result.clone().expect("source ok");
    assert_eq!(stats.messages, 1);
    assert_eq!(stats.lines, 3);
    assert_eq!(stats.configs, 2);
    assert!(stats.bytes_fetched > 0);
}

#[tokio::test]
async fn vmess_payload_is_relabeled() {
    let server = MockServer::start().await;
    let payload = STANDARD.encode(r#"{"add":"h","ps":"old"}"#);
    let body = format!("<pre>vmess://{payload}</pre>");
    mount_first_page(&server, "vm", channel_page("vm", &[(2, &body)])).await;

    let harvester = Harvester::new(config()).expect("valid config");
    let report = harvester
        .run(vec![source(&server, "vm", false)], &CancellationToken::new())
        .await;

    let expected = format!("vmess://{}", STANDARD.encode(r#"{"add":"h","ps":"@t"}"#));
    assert_eq!(output(&report, Bucket::Scheme(Scheme::Vmess)), expected);
}

#[tokio::test]
async fn failed_source_is_reported_and_others_still_count() {
    let server = MockServer::start().await;
    let body = "<code>trojan://pw@h:443#x</code>";
    mount_first_page(&server, "ok", channel_page("ok", &[(1, body)])).await;

    let harvester = Harvester::new(config()).expect("valid config");
    let sources = vec![
        source(&server, "gone", false),
        source(&server, "ok", false),
        Source::new("ftp://t.me/chan", false),
    ];
    let report = harvester.run(sources, &CancellationToken::new()).await;

    assert_eq!(report.sources.len(), 3);
    assert_eq!(report.failed_sources(), 2);
    assert!(matches!(report.sources[0].result, Err(SourceError::Fetch(_))));
    assert!(report.sources[1].result.is_ok());
    assert!(matches!(report.sources[2].result, Err(SourceError::Location(_))));
    assert_eq!(report.outputs.len(), 5);
    assert_eq!(output(&report, Bucket::Scheme(Scheme::Trojan)), "trojan://pw@h:443#@t");
}

#[tokio::test]
async fn cancelled_run_still_yields_every_output() {
    let server = MockServer::start().await;
    mount_first_page(&server, "a", channel_page("a", &[(1, "<code>ss://x@h:1#y</code>")])).await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let harvester = Harvester::new(config()).expect("valid config");
    let report = harvester
        .run(vec![source(&server, "a", false), source(&server, "b", true)], &cancel)
        .await;

    assert!(report
        .sources
        .iter()
        .all(|source| source.result == Err(SourceError::Cancelled)));
    assert_eq!(report.outputs.len(), 5);
    assert!(report.outputs.iter().all(|output| output.text.is_empty()));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn reverse_emits_newest_first() {
    let server = MockServer::start().await;
    let body = "<code>vless://a@h:1#x</code><br/><code>vless://b@h:1#x</code>";
    mount_first_page(&server, "r", channel_page("r", &[(4, body)])).await;

    let harvester = Harvester::new(HarvestConfig {
        reverse: true,
        ..config()
    })
    .expect("valid config");
    let report = harvester
        .run(vec![source(&server, "r", false)], &CancellationToken::new())
        .await;

    assert_eq!(
        output(&report, Bucket::Scheme(Scheme::Vless)),
        "vless://b@h:1#@t\nvless://a@h:1#@t"
    );
}

#[test]
fn invalid_config_is_rejected() {
    let zero_window = HarvestConfig {
        crawl: CrawlSettings {
            min_messages: 10,
            page_window: 0,
        },
        ..HarvestConfig::default()
    };
    assert_eq!(
        Harvester::new(zero_window).err().map(|e| e.to_string()),
        Some(ConfigError::ZeroPageWindow.to_string())
    );

    let blank_label = HarvestConfig {
        label: "  ".to_string(),
        ..HarvestConfig::default()
    };
    assert_eq!(blank_label.validate(), Err(ConfigError::EmptyLabel));

    let no_workers = HarvestConfig {
        concurrency: 0,
        ..HarvestConfig::default()
    };
    assert_eq!(no_workers.validate(), Err(ConfigError::ZeroConcurrency));
}

#[test]
fn zero_request_timeout_is_rejected() {
    let mut config = HarvestConfig::default();
    config.fetch.request_timeout = Duration::ZERO;

    assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    assert!(matches!(
        Harvester::new(config).err(),
        Some(ConfigError::ZeroTimeout)
    ));
}
