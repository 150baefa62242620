//! Export/import codec for the portable site document.
//!
//! An exported document is the server's full site snapshot: business data the
//! console does not model, plus the theme at `siteSettings.theme`. The codec
//! keeps the whole object verbatim (including key order) so a document can be
//! re-imported byte-for-byte equivalent. Documents that carry the theme at the
//! top level (`{"theme": ...}`) are accepted too.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ThemeError;
use crate::theme::Theme;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportedDocument(Map<String, Value>);

impl ExportedDocument {
    pub fn new(fields: Map<String, Value>) -> Self {
        ExportedDocument(fields)
    }

    /// A minimal document holding only `siteSettings.theme`.
    pub fn from_theme(theme: &Theme) -> Result<Self, ThemeError> {
        let mut site_settings = Map::new();
        site_settings.insert("theme".into(), theme.to_value()?);
        let mut fields = Map::new();
        fields.insert("siteSettings".into(), Value::Object(site_settings));
        Ok(ExportedDocument(fields))
    }

    /// The theme object carried by the document, if any.
    pub fn theme(&self) -> Option<&Value> {
        self.0
            .get("siteSettings")
            .and_then(|settings| settings.get("theme"))
            .or_else(|| self.0.get("theme"))
            .filter(|theme| theme.is_object())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// Encode a document as pretty-printed JSON text.
pub fn serialize(document: &ExportedDocument) -> Result<Vec<u8>, ThemeError> {
    serde_json::to_vec_pretty(document).map_err(|e| ThemeError::MalformedDocument {
        reason: e.to_string(),
    })
}

/// Decode a document. Anything that is not a JSON object is malformed.
pub fn deserialize(bytes: &[u8]) -> Result<ExportedDocument, ThemeError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| ThemeError::MalformedDocument {
        reason: e.to_string(),
    })?;
    match value {
        Value::Object(fields) => Ok(ExportedDocument(fields)),
        other => Err(ThemeError::MalformedDocument {
            reason: format!("expected a JSON object, found {}", kind(&other)),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
