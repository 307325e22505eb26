use std::fs;

use harvest_core::{Bucket, FinalizedOutput, Scheme};
use harvest_engine::{OutputError, OutputWriter, DEFAULT_OUTPUT_SUFFIX};
use pretty_assertions::assert_eq;

fn output(bucket: Bucket, text: &str) -> FinalizedOutput {
    FinalizedOutput {
        bucket,
        text: text.to_string(),
    }
}

#[test]
fn file_names_follow_bucket_and_suffix() {
    let writer = OutputWriter::new("out", DEFAULT_OUTPUT_SUFFIX);
    assert_eq!(writer.file_name(Bucket::Scheme(Scheme::Shadowsocks)), "ss_output.txt");
    assert_eq!(writer.file_name(Bucket::Mixed), "mixed_output.txt");

    let nightly = OutputWriter::new("out", "nightly");
    assert_eq!(nightly.file_name(Bucket::Scheme(Scheme::Vless)), "vless_nightly.txt");
}

#[test]
fn write_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let target_dir = dir.path().join("nested").join("out");
    let writer = OutputWriter::new(&target_dir, "output");

    let path = writer
        .write(&output(Bucket::Scheme(Scheme::Trojan), "trojan://a@h:1#@t"))
        .expect("write ok");

    assert_eq!(path, target_dir.join("trojan_output.txt"));
    assert_eq!(fs::read_to_string(path).unwrap(), "trojan://a@h:1#@t");
}

#[test]
fn write_all_replaces_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let writer = OutputWriter::new(dir.path(), "output");
    fs::write(dir.path().join("mixed_output.txt"), "stale\nlines\n").unwrap();

    let outputs = vec![
        output(Bucket::Scheme(Scheme::Vmess), ""),
        output(Bucket::Mixed, "ss://x@h:1#@t-1"),
    ];
    let paths = writer.write_all(&outputs).expect("write ok");

    assert_eq!(paths.len(), 2);
    assert_eq!(fs::read_to_string(&paths[0]).unwrap(), "");
    assert_eq!(
        fs::read_to_string(dir.path().join("mixed_output.txt")).unwrap(),
        "ss://x@h:1#@t-1"
    );
}

#[test]
fn write_fails_when_directory_is_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("out");
    fs::write(&blocker, "not a dir").unwrap();

    let writer = OutputWriter::new(&blocker, "output");
    let err = writer
        .write(&output(Bucket::Mixed, "x"))
        .unwrap_err();

    assert!(matches!(err, OutputError::OutputDir(_)));
}
