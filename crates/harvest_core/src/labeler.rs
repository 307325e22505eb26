use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use crate::{ConfigMatch, MatchBody};

/// Provenance label appended to every harvested configuration.
pub const DEFAULT_LABEL: &str = "@config_harvest";

/// vmess field holding the display name.
const VMESS_NAME_FIELD: &str = "ps";

/// Rewrites matched configurations so they carry the provenance label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labeler {
    label: String,
}

impl Labeler {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The label, suffixed with `-<sequence>` when one is given.
    pub fn tag(&self, sequence: Option<u32>) -> String {
        match sequence {
            Some(id) => format!("{}-{id}", self.label),
            None => self.label.clone(),
        }
    }

    pub fn rewrite(&self, config: &ConfigMatch, sequence: Option<u32>) -> String {
        let tag = self.tag(sequence);
        match &config.body {
            MatchBody::Verbatim => format!("{}{tag}", config.raw),
            MatchBody::Vmess(fields) => {
                let mut fields = fields.clone();
                fields.insert(VMESS_NAME_FIELD.to_string(), Value::String(tag));
                let json = Value::Object(fields).to_string();
                format!("{}{}", config.scheme.prefix(), STANDARD.encode(json))
            }
        }
    }
}

impl Default for Labeler {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL)
    }
}
