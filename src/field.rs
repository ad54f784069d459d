//! Field definitions and their normalized form.
//!
//! A [`FieldDef`] is what a caller declares: any subset of start, length,
//! end, alignment, padding and default. [`Field::normalize`] turns it into a
//! [`Field`] with every property resolved, or reports the first problem.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Key of a field within a layout.
///
/// Positional keys reserve columns without appearing in records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Named(String),
    Position(usize),
}

impl FieldKey {
    pub fn named(name: impl Into<String>) -> Self {
        FieldKey::Named(name.into())
    }

    /// Interprets a document key: all-digit keys are positional.
    pub fn from_key(key: &str) -> Self {
        if !key.is_empty()
            && key.bytes().all(|b| b.is_ascii_digit())
            && let Ok(index) = key.parse()
        {
            return FieldKey::Position(index);
        }
        FieldKey::Named(key.to_string())
    }

    /// Returns the record name, or `None` for positional keys.
    pub fn name(&self) -> Option<&str> {
        match self {
            FieldKey::Named(name) => Some(name),
            FieldKey::Position(_) => None,
        }
    }
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        FieldKey::Named(name.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(name: String) -> Self {
        FieldKey::Named(name)
    }
}

impl From<usize> for FieldKey {
    fn from(index: usize) -> Self {
        FieldKey::Position(index)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Named(name) => f.write_str(name),
            FieldKey::Position(index) => write!(f, "{index}"),
        }
    }
}

/// Supported field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Integer,
}

impl FieldType {
    /// Every supported type, in declaration order.
    pub const ALL: [FieldType; 2] = [FieldType::String, FieldType::Integer];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == name)
    }

    /// Content side used when the definition does not choose one.
    pub fn default_alignment(self) -> Alignment {
        match self {
            FieldType::String => Alignment::Left,
            FieldType::Integer => Alignment::Right,
        }
    }

    pub fn default_padding(self) -> char {
        match self {
            FieldType::String => ' ',
            FieldType::Integer => '0',
        }
    }

    /// Value written when a record omits the field.
    pub fn default_value(self) -> Value {
        match self {
            FieldType::String => Value::Str(String::new()),
            FieldType::Integer => Value::Int(0),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of the field that holds the content. Padding fills the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

impl Alignment {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Alignment::Left),
            "right" => Some(Alignment::Right),
            _ => None,
        }
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Str(String),
}

impl Value {
    /// The field type this value naturally belongs to.
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Int(_) => FieldType::Integer,
            Value::Str(_) => FieldType::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Str(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// Declared field, as written by the caller.
///
/// Textual properties (type, alignment, padding) stay strings here so that
/// bad values surface as layout errors naming the field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub start: Option<i64>,
    pub length: Option<i64>,
    pub end: Option<i64>,
    pub alignment: Option<String>,
    pub padding: Option<String>,
    pub required: Option<bool>,
    pub default: Option<Value>,
}

impl FieldDef {
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: Some(ty.into()),
            ..Self::default()
        }
    }

    pub fn string() -> Self {
        Self::new(FieldType::String.as_str())
    }

    pub fn integer() -> Self {
        Self::new(FieldType::Integer.as_str())
    }

    #[must_use]
    pub fn start(mut self, start: i64) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub fn length(mut self, length: i64) -> Self {
        self.length = Some(length);
        self
    }

    #[must_use]
    pub fn end(mut self, end: i64) -> Self {
        self.end = Some(end);
        self
    }

    #[must_use]
    pub fn alignment(mut self, alignment: impl Into<String>) -> Self {
        self.alignment = Some(alignment.into());
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: impl Into<String>) -> Self {
        self.padding = Some(padding.into());
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// A fully resolved field.
///
/// # Invariants
///
/// - `start >= base` of the layout that built it
/// - `length >= 1` and `end == start + length - 1`
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: FieldKey,
    ty: FieldType,
    start: usize,
    length: usize,
    end: usize,
    alignment: Alignment,
    padding: char,
    required: bool,
    default: Value,
}

impl Field {
    /// Resolves a declared field against the layout's column base.
    ///
    /// Checks run in a fixed order: type, extent, defaults, alignment,
    /// padding. The first failure is returned.
    pub fn normalize(key: FieldKey, def: FieldDef, base: usize) -> Result<Field, LayoutError> {
        let ty = match def.ty.as_deref() {
            None | Some("") => return Err(LayoutError::MissingType { field: key }),
            Some(name) => FieldType::parse(name).ok_or_else(|| LayoutError::InvalidType {
                field: key.clone(),
                given: name.to_string(),
            })?,
        };

        let (start, length, end) = normalize_extent(&key, &def, base)?;

        let alignment = match def.alignment {
            None => ty.default_alignment(),
            Some(name) => Alignment::parse(&name).ok_or_else(|| LayoutError::InvalidAlignment {
                field: key.clone(),
                given: name,
            })?,
        };

        let padding = match def.padding {
            None => ty.default_padding(),
            Some(padding) => {
                let mut chars = padding.chars();
                match (chars.next(), chars.next()) {
                    (None, _) => return Err(LayoutError::EmptyPadding { field: key }),
                    (Some(c), None) => c,
                    (Some(_), Some(_)) => {
                        return Err(LayoutError::InvalidPadding {
                            field: key,
                            given: padding,
                        });
                    }
                }
            }
        };

        Ok(Field {
            key,
            ty,
            start,
            length,
            end,
            alignment,
            padding,
            required: def.required.unwrap_or(false),
            default: def.default.unwrap_or_else(|| ty.default_value()),
        })
    }

    pub fn key(&self) -> &FieldKey {
        &self.key
    }

    /// Record name of the field, `None` for positional skip columns.
    pub fn name(&self) -> Option<&str> {
        self.key.name()
    }

    pub fn ty(&self) -> FieldType {
        self.ty
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn padding(&self) -> char {
        self.padding
    }

    /// Advisory only; nothing in the layout enforces it.
    pub fn required(&self) -> bool {
        self.required
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    /// Returns true if the closed column ranges of both fields intersect.
    pub fn overlaps(&self, other: &Field) -> bool {
        other.end >= self.start && self.end >= other.start
    }
}

/// Reconciles start, length and end into `(start, length, end)`.
fn normalize_extent(
    key: &FieldKey,
    def: &FieldDef,
    base: usize,
) -> Result<(usize, usize, usize), LayoutError> {
    let start = def
        .start
        .ok_or_else(|| LayoutError::MissingStart { field: key.clone() })?;
    if start < 0 || (start as u64) < base as u64 {
        return Err(LayoutError::StartBeforeBase {
            field: key.clone(),
            start,
            base,
        });
    }

    let (length, end) = match (def.length, def.end) {
        (Some(length), Some(end)) => {
            if start.checked_add(length).and_then(|e| e.checked_sub(1)) != Some(end) {
                return Err(LayoutError::LengthMismatch {
                    field: key.clone(),
                    start,
                    length,
                    end,
                });
            }
            (length, end)
        }
        (Some(length), None) => {
            let end = start
                .checked_add(length)
                .and_then(|e| e.checked_sub(1))
                .ok_or_else(|| LayoutError::ExtentOverflow { field: key.clone() })?;
            (length, end)
        }
        (None, Some(end)) => {
            let length = end
                .checked_sub(start)
                .and_then(|l| l.checked_add(1))
                .ok_or_else(|| LayoutError::ExtentOverflow { field: key.clone() })?;
            (length, end)
        }
        (None, None) => return Err(LayoutError::MissingExtent { field: key.clone() }),
    };

    if end < start {
        return Err(LayoutError::EndBeforeStart {
            field: key.clone(),
            start,
            end,
        });
    }

    // start >= 0 and end >= start make all three non-negative
    Ok((start as usize, length as usize, end as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(def: FieldDef) -> Result<Field, LayoutError> {
        Field::normalize(FieldKey::named("xxx"), def, 1)
    }

    #[test]
    fn test_from_key_positional() {
        assert_eq!(FieldKey::from_key("0"), FieldKey::Position(0));
        assert_eq!(FieldKey::from_key("12"), FieldKey::Position(12));
        assert_eq!(FieldKey::from_key("a1"), FieldKey::named("a1"));
        assert_eq!(FieldKey::from_key(""), FieldKey::named(""));
    }

    #[test]
    fn test_available_types() {
        let names: Vec<&str> = FieldType::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(names, vec!["string", "integer"]);
        assert_eq!(FieldType::parse("integer"), Some(FieldType::Integer));
        assert_eq!(FieldType::parse("xxxxx"), None);
    }

    #[test]
    fn test_missing_type() {
        let def = FieldDef {
            start: Some(1),
            end: Some(10),
            ..FieldDef::default()
        };
        assert!(matches!(
            normalize(def),
            Err(LayoutError::MissingType { .. })
        ));
    }

    #[test]
    fn test_invalid_type() {
        let err = normalize(FieldDef::new("xxxxx").start(1).end(10)).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidType { ref given, .. } if given == "xxxxx"));
    }

    #[test]
    fn test_start_end_length_all_given() {
        let field = normalize(FieldDef::string().start(3).length(4).end(6)).unwrap();
        assert_eq!((field.start(), field.length(), field.end()), (3, 4, 6));
    }

    #[test]
    fn test_length_derived_from_end() {
        let field = normalize(FieldDef::string().start(3).end(6)).unwrap();
        assert_eq!((field.start(), field.length(), field.end()), (3, 4, 6));
    }

    #[test]
    fn test_end_derived_from_length() {
        let field = normalize(FieldDef::integer().start(10).length(7)).unwrap();
        assert_eq!(field.end(), 16);
    }

    #[test]
    fn test_end_length_mismatch() {
        let err = normalize(FieldDef::string().start(1).length(3).end(9)).unwrap_err();
        assert!(matches!(err, LayoutError::LengthMismatch { .. }));
    }

    #[test]
    fn test_end_before_start() {
        let err = normalize(FieldDef::string().start(10).end(5)).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::EndBeforeStart {
                start: 10,
                end: 5,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_length_rejected() {
        let err = normalize(FieldDef::string().start(4).length(0)).unwrap_err();
        assert!(matches!(err, LayoutError::EndBeforeStart { .. }));
    }

    #[test]
    fn test_extent_overflow_rejected() {
        let err = normalize(FieldDef::string().start(2).length(i64::MAX)).unwrap_err();
        assert!(matches!(err, LayoutError::ExtentOverflow { .. }));

        let err = normalize(FieldDef::string().start(5).end(i64::MIN)).unwrap_err();
        assert!(matches!(err, LayoutError::ExtentOverflow { .. }));
    }

    #[test]
    fn test_extent_keeps_end_length_consistent() {
        for def in [
            FieldDef::string().start(2).length(i64::MAX - 2),
            FieldDef::string().start(7).end(i64::MAX - 1),
        ] {
            let field = normalize(def).unwrap();
            assert_eq!(field.end(), field.start() + field.length() - 1);
        }
    }

    #[test]
    fn test_missing_extent() {
        let err = normalize(FieldDef::string().start(4)).unwrap_err();
        assert!(matches!(err, LayoutError::MissingExtent { .. }));
    }

    #[test]
    fn test_start_before_base() {
        let err = normalize(FieldDef::string().start(0).end(4)).unwrap_err();
        assert!(matches!(err, LayoutError::StartBeforeBase { base: 1, .. }));

        let field = Field::normalize(FieldKey::named("z"), FieldDef::string().start(0).end(4), 0)
            .unwrap();
        assert_eq!(field.length(), 5);
    }

    #[test]
    fn test_bad_alignment() {
        let err = normalize(FieldDef::string().alignment("xxxx").start(1).end(9)).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidAlignment { .. }));
    }

    #[test]
    fn test_empty_padding() {
        let err = normalize(FieldDef::string().start(1).end(10).padding("")).unwrap_err();
        assert!(matches!(err, LayoutError::EmptyPadding { .. }));
    }

    #[test]
    fn test_multichar_padding() {
        let err = normalize(FieldDef::string().start(1).end(10).padding("ab")).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidPadding { .. }));
    }

    #[test]
    fn test_type_defaults() {
        let s = normalize(FieldDef::string().start(1).end(10)).unwrap();
        assert_eq!(s.alignment(), Alignment::Left);
        assert_eq!(s.padding(), ' ');
        assert_eq!(s.default(), &Value::Str(String::new()));
        assert!(!s.required());

        let n = normalize(FieldDef::integer().start(1).end(10)).unwrap();
        assert_eq!(n.alignment(), Alignment::Right);
        assert_eq!(n.padding(), '0');
        assert_eq!(n.default(), &Value::Int(0));
    }

    #[test]
    fn test_explicit_values_not_overwritten() {
        for def in [FieldDef::string(), FieldDef::integer()] {
            let field = normalize(
                def.start(1)
                    .end(10)
                    .padding(".")
                    .alignment("left")
                    .required(true)
                    .default_value("x"),
            )
            .unwrap();
            assert_eq!(field.padding(), '.');
            assert_eq!(field.alignment(), Alignment::Left);
            assert!(field.required());
            assert_eq!(field.default(), &Value::from("x"));
        }
    }

    #[test]
    fn test_type_checked_before_extent() {
        let def = FieldDef::new("xxxxx").start(10).end(5);
        assert!(matches!(
            normalize(def),
            Err(LayoutError::InvalidType { .. })
        ));
    }

    #[test]
    fn test_overlaps_touching_ranges() {
        let a = normalize(FieldDef::string().start(1).end(5)).unwrap();
        let b = normalize(FieldDef::string().start(6).end(10)).unwrap();
        let c = normalize(FieldDef::string().start(5).end(7)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_value_deserialize_untagged() {
        let v: Value = serde_json::from_str("42").unwrap();
        assert_eq!(v, Value::Int(42));
        let v: Value = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(v, Value::Str("42".to_string()));
    }
}
