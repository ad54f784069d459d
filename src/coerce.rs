//! Conversion between a field's column text and its value.
//!
//! Alignment names the side holding the content, so padding always sits on
//! the opposite side: left-aligned fields are padded and trimmed on the
//! right, right-aligned fields on the left.

use crate::error::LayoutError;
use crate::field::{Alignment, Field, FieldType, Value};

/// Decodes the raw column text of `field` into a value.
pub fn text_to_value(field: &Field, raw: &str) -> Result<Value, LayoutError> {
    let pad = field.padding();
    let trimmed = match field.alignment() {
        Alignment::Left => raw.trim_end_matches(pad),
        Alignment::Right => raw.trim_start_matches(pad),
    };

    match field.ty() {
        FieldType::String => Ok(Value::Str(trimmed.to_string())),
        FieldType::Integer => {
            // A zero written with '0' padding trims down to nothing
            if trimmed.is_empty() && !raw.is_empty() && pad == '0' {
                return Ok(Value::Int(0));
            }
            parse_integer(trimmed)
                .map(Value::Int)
                .ok_or_else(|| LayoutError::Coercion {
                    field: field.key().clone(),
                    ty: FieldType::Integer,
                    value: trimmed.to_string(),
                })
        }
    }
}

/// Optional sign followed by at least one ASCII digit, within `i64` range.
fn parse_integer(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Encodes `value` into exactly `field.length()` characters.
///
/// Integer text wider than the field is an overflow; string text is cut.
pub fn value_to_text(field: &Field, value: &Value, trim: bool) -> Result<String, LayoutError> {
    let text = value.to_string();
    let text = if trim { text.trim() } else { text.as_str() };

    let width = field.length();
    let count = text.chars().count();
    let fill: String = std::iter::repeat_n(field.padding(), width.saturating_sub(count)).collect();
    let padded = match field.alignment() {
        Alignment::Left => format!("{text}{fill}"),
        Alignment::Right => format!("{fill}{text}"),
    };

    if count > width && field.ty() == FieldType::Integer {
        return Err(LayoutError::Overflow {
            field: field.key().clone(),
            ty: field.ty(),
            length: width,
            value: text.to_string(),
        });
    }
    if text.contains('\n') {
        return Err(LayoutError::Newline {
            field: field.key().clone(),
        });
    }

    Ok(padded.chars().take(width).collect())
}
