//! The layout engine: a validated field table plus line read/write.
//!
//! A [`Layout`] is built once and never mutated afterwards, so it can be
//! shared freely between threads. Rebuilding means building a new value.
//!
//! ## Example
//!
//! ```
//! use fixed_width::{FieldDef, Layout, Record, Value};
//!
//! let layout = Layout::build([
//!     ("a", FieldDef::string().start(1).end(5)),
//!     ("b", FieldDef::integer().start(6).end(10)),
//! ])
//! .unwrap();
//!
//! let line = layout
//!     .write_line(&Record::new().with("a", "xxx").with("b", 42))
//!     .unwrap();
//! assert_eq!(line, "xxx  00042");
//!
//! let record = layout.read_line(&line).unwrap();
//! assert_eq!(record.get("b"), Some(&Value::Int(42)));
//! ```

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::coerce;
use crate::error::LayoutError;
use crate::field::{Field, FieldDef, FieldKey, Value};
use crate::record::Record;

/// Engine-wide settings, shared by every field of a layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Number of the first column (1 = first character of the line)
    pub base: usize,
    /// Character a fresh output line is filled with before fields are written
    pub filler: char,
    /// Trim surrounding whitespace from values before encoding
    pub trim_before_encode: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base: 1,
            filler: ' ',
            trim_before_encode: true,
        }
    }
}

/// A validated fixed-width record layout.
#[derive(Debug, Clone)]
pub struct Layout {
    fields: Vec<Field>,
    by_name: HashMap<String, usize>,
    config: LayoutConfig,
    length: usize,
}

impl Layout {
    /// Builds a layout with the default configuration (base 1).
    pub fn build<I, K>(defs: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = (K, FieldDef)>,
        K: Into<FieldKey>,
    {
        Self::with_config(defs, LayoutConfig::default())
    }

    /// Builds a layout, normalizing every field and then rejecting overlaps.
    ///
    /// Fields are processed in iteration order and the first problem found
    /// is returned. Every field is normalized before any overlap check runs.
    pub fn with_config<I, K>(defs: I, config: LayoutConfig) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = (K, FieldDef)>,
        K: Into<FieldKey>,
    {
        let mut fields: Vec<Field> = Vec::new();
        let mut by_name = HashMap::new();

        for (key, def) in defs {
            let key = key.into();
            if fields.iter().any(|f| f.key() == &key) {
                return Err(LayoutError::DuplicateField { field: key });
            }
            let field = Field::normalize(key, def, config.base)?;
            if let Some(name) = field.name() {
                by_name.insert(name.to_string(), fields.len());
            }
            fields.push(field);
        }

        for (i, field) in fields.iter().enumerate() {
            check_overlap(i, field, &fields)?;
        }

        let length = fields.iter().map(Field::end).max().unwrap_or(0);
        debug!(fields = fields.len(), length, base = config.base, "layout built");

        Ok(Self {
            fields,
            by_name,
            config,
            length,
        })
    }

    /// Normalized fields in layout order, skip columns included.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a named field.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Minimum line length holding every field: the largest field end.
    ///
    /// Zero for a layout without fields.
    pub fn length(&self) -> usize {
        self.length
    }

    fn lookup(&self, name: &str) -> Result<&Field, LayoutError> {
        self.field(name).ok_or_else(|| LayoutError::UnknownField {
            field: name.to_string(),
        })
    }

    /// Characters needed to hold every field when counting from `base`.
    fn width(&self) -> usize {
        if self.fields.is_empty() {
            0
        } else {
            self.length + 1 - self.config.base
        }
    }

    /// Column offset of a field within a line (0-based).
    fn offset(&self, field: &Field) -> usize {
        field.start() - self.config.base
    }

    /// Reads one named field from a line.
    ///
    /// Trailing line terminators are discarded. A line shorter than the
    /// field yields whatever part of the field is present.
    pub fn read_field(&self, line: &str, name: &str) -> Result<Value, LayoutError> {
        let field = self.lookup(name)?;
        self.decode(line.trim_end_matches(['\r', '\n']), field)
    }

    fn decode(&self, line: &str, field: &Field) -> Result<Value, LayoutError> {
        let raw: String = line
            .chars()
            .skip(self.offset(field))
            .take(field.length())
            .collect();
        coerce::text_to_value(field, &raw)
    }

    /// Reads every named field of a line into a record.
    pub fn read_line(&self, line: &str) -> Result<Record, LayoutError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut record = Record::new();
        for field in &self.fields {
            let Some(name) = field.name() else {
                continue;
            };
            record.insert(name, self.decode(line, field)?);
        }
        trace!(fields = record.len(), "line read");
        Ok(record)
    }

    /// Encodes a value for the named field, padded and cut to its width.
    pub fn value_to_text(&self, name: &str, value: &Value) -> Result<String, LayoutError> {
        let field = self.lookup(name)?;
        coerce::value_to_text(field, value, self.config.trim_before_encode)
    }

    /// Writes a record as a line wide enough for every field.
    ///
    /// With the usual base of 1 the line is exactly
    /// [`length`](Self::length) characters.
    ///
    /// Fields missing from the record take their default. Skip columns
    /// always take their default.
    pub fn write_line(&self, record: &Record) -> Result<String, LayoutError> {
        let width = self.width();
        let mut line = Vec::new();
        line.try_reserve_exact(width)
            .map_err(|_| LayoutError::LineTooLong { width })?;
        line.resize(width, self.config.filler);
        for field in &self.fields {
            let value = field
                .name()
                .and_then(|name| record.get(name))
                .unwrap_or_else(|| field.default());
            let text = coerce::value_to_text(field, value, self.config.trim_before_encode)?;
            let offset = self.offset(field);
            for (slot, c) in line[offset..offset + field.length()].iter_mut().zip(text.chars()) {
                *slot = c;
            }
        }
        trace!(width = line.len(), "line written");
        Ok(line.into_iter().collect())
    }

    /// Checks that each value in the record has its field's declared type.
    ///
    /// Only keys present in the record are checked; `required` is not
    /// enforced.
    pub fn validate(&self, record: &Record) -> Result<bool, LayoutError> {
        for (name, value) in record.iter() {
            let field = self.lookup(name)?;
            let actual = value.field_type();
            if actual != field.ty() {
                return Err(LayoutError::TypeMismatch {
                    field: name.to_string(),
                    expected: field.ty(),
                    actual,
                });
            }
        }
        Ok(true)
    }
}

fn check_overlap(index: usize, field: &Field, fields: &[Field]) -> Result<(), LayoutError> {
    for (j, other) in fields.iter().enumerate() {
        if j != index && field.overlaps(other) {
            return Err(LayoutError::Overlap {
                field: field.key().clone(),
                start: field.start(),
                end: field.end(),
                other: other.key().clone(),
                other_start: other.start(),
                other_end: other.end(),
            });
        }
    }
    Ok(())
}
