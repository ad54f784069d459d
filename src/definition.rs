//! Declarative layout documents.
//!
//! Layout format (JSON, field order is layout order):
//! ```text
//! {
//!   "filler": " ",
//!   "fields": {
//!     "name":  { "type": "string",  "start": 1,  "end": 10 },
//!     "0":     { "type": "string",  "start": 11, "length": 1 },
//!     "count": { "type": "integer", "start": 12, "length": 5 }
//!   }
//! }
//! ```
//!
//! - `base`, `filler` and `trim_before_encode` are optional
//! - keys made only of digits are skip columns

use serde::Deserialize;
use serde_json::{Map, Value as Json};

use crate::error::LayoutError;
use crate::field::{FieldDef, FieldKey};
use crate::layout::{Layout, LayoutConfig};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    base: Option<usize>,
    filler: Option<char>,
    trim_before_encode: Option<bool>,
    #[serde(default)]
    fields: Map<String, Json>,
}

/// A parsed layout document, not yet validated.
#[derive(Debug, Clone)]
pub struct LayoutDefinition {
    pub config: LayoutConfig,
    pub fields: Vec<(FieldKey, FieldDef)>,
}

impl LayoutDefinition {
    /// Parses a JSON layout document.
    pub fn from_json(text: &str) -> Result<Self, LayoutError> {
        let doc: Document = serde_json::from_str(text)?;

        let defaults = LayoutConfig::default();
        let config = LayoutConfig {
            base: doc.base.unwrap_or(defaults.base),
            filler: doc.filler.unwrap_or(defaults.filler),
            trim_before_encode: doc.trim_before_encode.unwrap_or(defaults.trim_before_encode),
        };

        let fields = doc
            .fields
            .into_iter()
            .map(|(key, def)| {
                let def: FieldDef = serde_json::from_value(def)
                    .map_err(|e| LayoutError::Definition(format!("field {key}: {e}")))?;
                Ok((FieldKey::from_key(&key), def))
            })
            .collect::<Result<Vec<_>, LayoutError>>()?;

        Ok(Self { config, fields })
    }

    /// Validates the definition into a layout.
    pub fn build(self) -> Result<Layout, LayoutError> {
        Layout::with_config(self.fields, self.config)
    }
}

impl Layout {
    /// Parses and builds a layout from a JSON document.
    pub fn from_json(text: &str) -> Result<Layout, LayoutError> {
        LayoutDefinition::from_json(text)?.build()
    }
}
