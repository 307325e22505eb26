use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use harvest_logging::harvest_debug;

/// Decodes a fetched page to text.
///
/// Encoding is picked from the BOM, then the Content-Type charset, then
/// chardetng. Undecodable sequences become U+FFFD; configuration links are
/// ASCII, so a lossy page is still worth scanning.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(charset_label)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        harvest_debug!("Lossy decode of {} bytes as {}", bytes.len(), encoding.name());
    }
    text.into_owned()
}

fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(&['"', '\''][..]))
    })
}
