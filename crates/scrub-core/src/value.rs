//! A small, driver-agnostic representation of a SQL scalar value.
//!
//! `scrub-core` never talks to a database; the `scrub-pg` driver adapter
//! decodes `PgRow` columns into `SqlValue` and, symmetrically, renders
//! `SqlValue` back into bind parameters. Everything that isn't natively
//! modeled (uuid, timestamp, arrays, ...) round-trips as text alongside the
//! column's own declared SQL type, which the driver casts against on bind.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Exact-precision decimal text, e.g. `"299.99"`.
    Numeric(String),
    /// Text, and the textual fallback for any type without a dedicated variant.
    Text(String),
    /// Serialized JSON text.
    Json(String),
    Bytes(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Renders the value as the string a `Transformed`/`JsonRewrite` column
    /// operates on. Only meaningful for non-null, textual-ish values; callers
    /// are expected to have already handled the NULL case (spec §4.D).
    pub fn as_display_string(&self) -> String {
        match self {
            SqlValue::Null => String::new(),
            SqlValue::Bool(b) => b.to_string(),
            SqlValue::Int(i) => i.to_string(),
            SqlValue::Float(f) => f.to_string(),
            SqlValue::Numeric(s) | SqlValue::Text(s) | SqlValue::Json(s) => s.clone(),
            SqlValue::Bytes(b) => format!("\\x{}", hex_encode(b)),
        }
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// One source row, in the ordinal order the query selected it.
#[derive(Debug, Clone, Default)]
pub struct SourceRow {
    values: HashMap<String, SqlValue>,
}

impl SourceRow {
    pub fn new(values: HashMap<String, SqlValue>) -> Self {
        SourceRow { values }
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.values.get(name)
    }
}
