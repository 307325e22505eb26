use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::Scheme;

/// Standard alphabet, padding optional. Shared links drop the `=` often enough.
const VMESS_PAYLOAD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Scheme names a vmess payload may have swallowed from the link that follows
/// it, longest first so `vless` wins over `ss`.
const TRAILING_SCHEME_NAMES: [&str; 4] = ["trojan", "vless", "vmess", "ss"];

#[derive(Debug, Clone, PartialEq)]
pub enum MatchBody {
    /// Kept as matched; the label is appended.
    Verbatim,
    /// Decoded vmess JSON object; the label replaces its `ps` field.
    Vmess(Map<String, Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigMatch {
    pub scheme: Scheme,
    pub raw: String,
    pub body: MatchBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("payload is not valid base64: {0}")]
    InvalidBase64(String),
    #[error("payload is not valid json: {0}")]
    InvalidJson(String),
    #[error("payload is not a json object")]
    NotAnObject,
}

/// Result of one match on a line.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Found(ConfigMatch),
    /// The text had the shape of a configuration but its payload was unusable.
    Skipped {
        scheme: Scheme,
        raw: String,
        reason: SkipReason,
    },
}

impl MatchOutcome {
    pub fn scheme(&self) -> Scheme {
        match self {
            MatchOutcome::Found(config) => config.scheme,
            MatchOutcome::Skipped { scheme, .. } => *scheme,
        }
    }
}

/// Finds every configuration link embedded in a line of message text.
pub struct ConfigMatcher {
    patterns: Vec<(Scheme, Regex)>,
}

impl ConfigMatcher {
    pub fn new() -> Self {
        let patterns = Scheme::ALL
            .iter()
            .map(|scheme| {
                let pattern = match scheme {
                    Scheme::Vmess => r"vmess://[A-Za-z0-9+/=]+".to_string(),
                    other => format!(r"{}\S+?(?:%3A%40|#)", regex::escape(other.prefix())),
                };
                let regex = Regex::new(&pattern).expect("static scheme pattern");
                (*scheme, regex)
            })
            .collect();
        Self { patterns }
    }

    /// Scans `line` left to right and returns one outcome per embedded
    /// configuration, in order of appearance.
    ///
    /// Each step takes the earliest match of any scheme after the consumed
    /// span, so configurations pasted back to back are all found.
    pub fn scan_line(&self, line: &str) -> Vec<MatchOutcome> {
        let mut outcomes = Vec::new();
        let mut cursor = 0;

        while cursor < line.len() {
            let earliest = self
                .patterns
                .iter()
                .filter_map(|(scheme, regex)| {
                    find_from(*scheme, regex, line, cursor).map(|(start, end)| (*scheme, start, end))
                })
                .min_by_key(|(_, start, _)| *start);

            let Some((scheme, start, end)) = earliest else {
                break;
            };
            outcomes.push(classify(scheme, &line[start..end]));
            cursor = end;
        }

        outcomes
    }
}

impl Default for ConfigMatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn find_from(scheme: Scheme, regex: &Regex, line: &str, from: usize) -> Option<(usize, usize)> {
    let mut from = from;
    loop {
        let found = regex.find_at(line, from)?;
        let start = found.start();
        match scheme {
            // `ss://` is also the tail of `vless://` and `vmess://`; those
            // belong to their own scheme.
            Scheme::Shadowsocks if is_tail_of_other_scheme(line, start) => {}
            Scheme::Vmess => {
                let end = trim_following_scheme(line, start, found.end());
                if end > start + scheme.prefix().len() {
                    return Some((start, end));
                }
            }
            // A link without its own terminator must not swallow the next one.
            _ if runs_into_another_link(&line[start + scheme.prefix().len()..found.end()]) => {}
            _ => return Some((start, found.end())),
        }
        // Scheme prefixes are ASCII, so `start + 1` is a char boundary.
        from = start + 1;
    }
}

fn runs_into_another_link(body: &str) -> bool {
    Scheme::ALL.iter().any(|scheme| body.contains(scheme.prefix()))
}

fn is_tail_of_other_scheme(line: &str, start: usize) -> bool {
    let before = &line[..start];
    before.ends_with("vle") || before.ends_with("vme")
}

/// A vmess payload runs into the next link's scheme name when two links are
/// pasted together (`...=vless://...`). Hand that name back.
fn trim_following_scheme(line: &str, start: usize, end: usize) -> usize {
    if !line[end..].starts_with("://") {
        return end;
    }
    let payload = &line[start..end];
    TRAILING_SCHEME_NAMES
        .iter()
        .find(|name| payload.ends_with(*name))
        .map(|name| end - name.len())
        .unwrap_or(end)
}

fn classify(scheme: Scheme, raw: &str) -> MatchOutcome {
    if scheme != Scheme::Vmess {
        return MatchOutcome::Found(ConfigMatch {
            scheme,
            raw: raw.to_string(),
            body: MatchBody::Verbatim,
        });
    }

    let payload = &raw[scheme.prefix().len()..];
    match decode_vmess(payload) {
        Ok(fields) => MatchOutcome::Found(ConfigMatch {
            scheme,
            raw: raw.to_string(),
            body: MatchBody::Vmess(fields),
        }),
        Err(reason) => MatchOutcome::Skipped {
            scheme,
            raw: raw.to_string(),
            reason,
        },
    }
}

fn decode_vmess(payload: &str) -> Result<Map<String, Value>, SkipReason> {
    let bytes = VMESS_PAYLOAD
        .decode(payload)
        .map_err(|err| SkipReason::InvalidBase64(err.to_string()))?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(SkipReason::NotAnObject),
        Err(err) => Err(SkipReason::InvalidJson(err.to_string())),
    }
}
