use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use harvest_core::Source;
use harvest_logging::{harvest_info, harvest_warn};
use serde::{de, Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
struct SourceRow {
    #[serde(rename = "URL")]
    url: String,
    #[serde(rename = "AllMessagesFlag", deserialize_with = "lenient_bool")]
    all_messages: bool,
}

/// Accepts `true/false`, `1/0` and `yes/no`, case-insensitively.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(de::Error::invalid_value(
            de::Unexpected::Str(other),
            &"true/false, 1/0 or yes/no",
        )),
    }
}

/// Parses a source list with a `URL,AllMessagesFlag` header.
///
/// Rows with an empty URL are skipped; any other malformed row is an error.
pub fn parse_sources<R: Read>(reader: R) -> anyhow::Result<Vec<Source>> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut sources = Vec::new();
    for (index, row) in csv.deserialize::<SourceRow>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let row = row.with_context(|| format!("Invalid source row on line {line}"))?;
        if row.url.is_empty() {
            harvest_warn!("Skipping source row on line {} with no URL", line);
            continue;
        }
        sources.push(Source::new(row.url, row.all_messages));
    }
    Ok(sources)
}

pub fn load_sources(path: &Path) -> anyhow::Result<Vec<Source>> {
    let file = File::open(path).with_context(|| format!("Failed to open source list {:?}", path))?;
    let sources =
        parse_sources(file).with_context(|| format!("Failed to read source list {:?}", path))?;
    harvest_info!("Loaded {} sources from {:?}", sources.len(), path);
    Ok(sources)
}
