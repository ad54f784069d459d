//! Error types for layout construction and record conversion.

use thiserror::Error;

use crate::field::{FieldKey, FieldType};

/// Broad category of a [`LayoutError`].
///
/// Schema-level categories are raised while a layout is built; the others
/// are raised by individual decode, encode or validate calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed layout document (bad JSON, wrong shape).
    Definition,
    /// Invalid field definition.
    Schema,
    /// Two fields claim the same columns.
    Overlap,
    /// A field name that is not part of the layout.
    UnknownField,
    /// Text that cannot be read as the field's type.
    Coercion,
    /// Numeric text wider than its field.
    Overflow,
    /// Value that cannot live on a single line.
    Format,
    /// Record value whose type differs from the declared type.
    Validation,
}

/// Layout errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Layout document could not be parsed
    #[error("Invalid layout definition: {0}")]
    Definition(String),

    /// Field has no type
    #[error("Field {field} must have a type, none given")]
    MissingType { field: FieldKey },

    /// Field type is not one of the supported types
    #[error("Field {field} type is invalid ({given})")]
    InvalidType { field: FieldKey, given: String },

    /// Field has no start column
    #[error("Field {field} has no start column")]
    MissingStart { field: FieldKey },

    /// Field gives neither a length nor an end column
    #[error("Field {field} needs a length or an end column")]
    MissingExtent { field: FieldKey },

    #[error("Field {field} start ({start}) cannot be less than the base ({base})")]
    StartBeforeBase {
        field: FieldKey,
        start: i64,
        base: usize,
    },

    /// Column arithmetic does not fit in an `i64`
    #[error("Field {field} extends beyond the addressable column range")]
    ExtentOverflow { field: FieldKey },

    #[error("Field {field} ends ({end}) before it starts ({start})")]
    EndBeforeStart { field: FieldKey, start: i64, end: i64 },

    /// Explicit length and end disagree
    #[error("Start/end/length mismatch on field {field} (start {start}, length {length}, end {end})")]
    LengthMismatch {
        field: FieldKey,
        start: i64,
        length: i64,
        end: i64,
    },

    #[error("Field {field} has an invalid alignment value ({given})")]
    InvalidAlignment { field: FieldKey, given: String },

    #[error("Field {field} must have a non empty padding")]
    EmptyPadding { field: FieldKey },

    /// Padding must be exactly one character
    #[error("Field {field} padding must be a single character ({given:?} given)")]
    InvalidPadding { field: FieldKey, given: String },

    #[error("Field {field} is defined more than once")]
    DuplicateField { field: FieldKey },

    /// Two fields share at least one column
    #[error(
        "Field {field} ({start}/{end}) overlaps with field {other} ({other_start}/{other_end})"
    )]
    Overlap {
        field: FieldKey,
        start: usize,
        end: usize,
        other: FieldKey,
        other_start: usize,
        other_end: usize,
    },

    #[error("Field '{field}' is not part of the layout")]
    UnknownField { field: String },

    /// Text cannot be parsed as the field's type
    #[error("Field {field} cannot be cast as {ty} (value: '{value}')")]
    Coercion {
        field: FieldKey,
        ty: FieldType,
        value: String,
    },

    /// Encoded integer does not fit the field
    #[error("Field {field} overflows (max length: {length} {ty}, value: '{value}')")]
    Overflow {
        field: FieldKey,
        ty: FieldType,
        length: usize,
        value: String,
    },

    /// Output line cannot be allocated
    #[error("Line of {width} characters is too long to write")]
    LineTooLong { width: usize },

    #[error("Field {field} contains newlines")]
    Newline { field: FieldKey },

    /// Record value type differs from the declared field type
    #[error("Field {field} must be of type {expected} ({actual} given)")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        actual: FieldType,
    },
}

impl LayoutError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LayoutError::Definition(_) => ErrorKind::Definition,
            LayoutError::MissingType { .. }
            | LayoutError::InvalidType { .. }
            | LayoutError::MissingStart { .. }
            | LayoutError::MissingExtent { .. }
            | LayoutError::StartBeforeBase { .. }
            | LayoutError::ExtentOverflow { .. }
            | LayoutError::EndBeforeStart { .. }
            | LayoutError::LengthMismatch { .. }
            | LayoutError::InvalidAlignment { .. }
            | LayoutError::EmptyPadding { .. }
            | LayoutError::InvalidPadding { .. }
            | LayoutError::DuplicateField { .. } => ErrorKind::Schema,
            LayoutError::Overlap { .. } => ErrorKind::Overlap,
            LayoutError::UnknownField { .. } => ErrorKind::UnknownField,
            LayoutError::Coercion { .. } => ErrorKind::Coercion,
            LayoutError::Overflow { .. } => ErrorKind::Overflow,
            LayoutError::Newline { .. } | LayoutError::LineTooLong { .. } => ErrorKind::Format,
            LayoutError::TypeMismatch { .. } => ErrorKind::Validation,
        }
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(err: serde_json::Error) -> Self {
        LayoutError::Definition(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_message_names_both_ranges() {
        let err = LayoutError::Overlap {
            field: FieldKey::named("a"),
            start: 3,
            end: 14,
            other: FieldKey::named("b"),
            other_start: 10,
            other_end: 17,
        };
        assert_eq!(
            err.to_string(),
            "Field a (3/14) overlaps with field b (10/17)"
        );
        assert_eq!(err.kind(), ErrorKind::Overlap);
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = LayoutError::TypeMismatch {
            field: "a".to_string(),
            expected: FieldType::String,
            actual: FieldType::Integer,
        };
        assert_eq!(err.to_string(), "Field a must be of type string (integer given)");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_positional_key_in_message() {
        let err = LayoutError::EmptyPadding {
            field: FieldKey::Position(0),
        };
        assert_eq!(err.to_string(), "Field 0 must have a non empty padding");
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_json_error_is_definition() {
        let err: LayoutError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Definition);
    }
}
