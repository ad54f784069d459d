//! # fixed-width
//!
//! Fixed-width record layouts for mainframe-style flat files.
//!
//! Legacy exports and EDI-like feeds store one record per line, each field
//! in a fixed column range. This library describes such a layout, checks it
//! once, and then converts lines to records and back.
//!
//! ## Overview
//!
//! - **Layout**: ordered fields, each with a type, column range, alignment,
//!   padding and default; overlapping fields are rejected at build time
//! - **Decoding**: a line becomes a [`Record`] of strings and integers
//! - **Encoding**: a record becomes a line, fields padded to their width
//! - **Validation**: record values are checked against declared types
//!
//! ## Example
//!
//! ```
//! use fixed_width::{FieldDef, Layout, Record, Value};
//!
//! // Record layout: Last(8) First(10) Salary(8)
//! let layout = Layout::build([
//!     ("last", FieldDef::string().start(1).length(8)),
//!     ("first", FieldDef::string().start(9).length(10)),
//!     ("salary", FieldDef::integer().start(19).length(8)),
//! ])
//! .unwrap();
//!
//! let record = layout.read_line("SMITH   JOHN      00050000").unwrap();
//! assert_eq!(record.get("first"), Some(&Value::from("JOHN")));
//! assert_eq!(record.get("salary"), Some(&Value::Int(50000)));
//!
//! let line = layout
//!     .write_line(&Record::new().with("last", "DOE").with("salary", 60000))
//!     .unwrap();
//! assert_eq!(line, "DOE               00060000");
//! ```

pub mod coerce;
pub mod definition;
pub mod error;
pub mod field;
pub mod layout;
pub mod record;

pub use definition::LayoutDefinition;
pub use error::{ErrorKind, LayoutError};
pub use field::{Alignment, Field, FieldDef, FieldKey, FieldType, Value};
pub use layout::{Layout, LayoutConfig};
pub use record::Record;

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
