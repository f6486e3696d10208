//! The row rewriter: one `OutputColumn` per destination column (spec §4.D).

use std::sync::Arc;

use thiserror::Error;

use crate::lens::Lens;
use crate::value::SqlValue;

/// `Arc` rather than `Box` because a `TableSpec` may be cloned (e.g. to
/// recompute effective filters) without cloning every closure it carries.
pub type StringFn = Arc<dyn Fn(&str) -> String + Send + Sync>;
pub type OptStringFn = Arc<dyn Fn(Option<&str>) -> Option<String> + Send + Sync>;

#[derive(Clone)]
pub enum OutputColumn {
    /// Passes a source column through unchanged.
    Source { source: String },
    /// A literal value with an explicit SQL type hint, independent of any
    /// source column.
    Fixed { value: SqlValue, sql_type: String },
    /// `NULL` passes through as `NULL`; otherwise `fn` runs on the source
    /// value rendered as text, producing a `TEXT` column.
    Transformed { source: String, transform: StringFn },
    /// Like `Transformed`, but `fn` itself receives and returns an
    /// `Option<&str>`, so it decides what to do with `NULL`.
    TransformedOpt { source: String, transform: OptStringFn },
    /// Parses the source as JSON, rewrites string leaves reached by `lens`
    /// with `fn`, and re-serializes as `JSONB`. `NULL` passes through.
    JsonRewrite { source: String, lens: Lens, transform: StringFn },
}

impl std::fmt::Debug for OutputColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputColumn::Source { source } => f.debug_struct("Source").field("source", source).finish(),
            OutputColumn::Fixed { value, sql_type } => {
                f.debug_struct("Fixed").field("value", value).field("sql_type", sql_type).finish()
            }
            OutputColumn::Transformed { source, .. } => {
                f.debug_struct("Transformed").field("source", source).finish()
            }
            OutputColumn::TransformedOpt { source, .. } => {
                f.debug_struct("TransformedOpt").field("source", source).finish()
            }
            OutputColumn::JsonRewrite { source, .. } => {
                f.debug_struct("JsonRewrite").field("source", source).finish()
            }
        }
    }
}

/// `.nulled` sugar: a column that is always `NULL`, declared as `sql_type`.
/// Equivalent to `OutputColumn::Fixed { value: SqlValue::Null, sql_type }`.
pub fn nulled(sql_type: impl Into<String>) -> OutputColumn {
    OutputColumn::Fixed { value: SqlValue::Null, sql_type: sql_type.into() }
}

impl OutputColumn {
    /// The one source column this output reads, if any. `Fixed` depends on
    /// none; every other variant depends on exactly one.
    pub fn source_dependency(&self) -> Option<&str> {
        match self {
            OutputColumn::Source { source }
            | OutputColumn::Transformed { source, .. }
            | OutputColumn::TransformedOpt { source, .. }
            | OutputColumn::JsonRewrite { source, .. } => Some(source),
            OutputColumn::Fixed { .. } => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColumnError {
    #[error("source column {0:?} referenced by output spec was not found in the row")]
    MissingSource(String),
    #[error("column {0:?} is not valid JSON and cannot be rewritten: {1}")]
    JsonMalformed(String, String),
}

/// The resolved destination value: its SQL type hint, and its rendered
/// value (`None` means `NULL`).
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub sql_type: String,
    pub value: Option<String>,
}

impl OutputColumn {
    /// The SQL type this output always declares, independent of any
    /// particular row — the same value `resolve` would report as
    /// `Resolved::sql_type`. Lets a caller fix an INSERT's column types
    /// once before streaming rows through it.
    pub fn sql_type(&self, source_sql_type: &dyn Fn(&str) -> Option<&str>) -> String {
        match self {
            OutputColumn::Source { source } => source_sql_type(source).unwrap_or("text").to_string(),
            OutputColumn::Fixed { sql_type, .. } => sql_type.clone(),
            OutputColumn::Transformed { .. } | OutputColumn::TransformedOpt { .. } => "text".to_string(),
            OutputColumn::JsonRewrite { .. } => "jsonb".to_string(),
        }
    }

    /// Resolves this output against one source row. `source_sql_type` looks
    /// up a source column's reflected SQL type (spec §4.D's `sqlTypeOf`);
    /// `Source` passes that type straight through, while `Transformed`
    /// variants always widen to `TEXT` per the algebra's definition.
    pub fn resolve(
        &self,
        row: &crate::value::SourceRow,
        source_sql_type: &dyn Fn(&str) -> Option<&str>,
    ) -> Result<Resolved, ColumnError> {
        match self {
            OutputColumn::Source { source } => {
                let v = row.get(source).ok_or_else(|| ColumnError::MissingSource(source.clone()))?;
                Ok(Resolved {
                    sql_type: source_sql_type(source).unwrap_or("text").to_string(),
                    value: if v.is_null() { None } else { Some(v.as_display_string()) },
                })
            }
            OutputColumn::Fixed { value, sql_type } => Ok(Resolved {
                sql_type: sql_type.clone(),
                value: if value.is_null() { None } else { Some(value.as_display_string()) },
            }),
            OutputColumn::Transformed { source, transform } => {
                let v = row.get(source).ok_or_else(|| ColumnError::MissingSource(source.clone()))?;
                Ok(Resolved {
                    sql_type: "text".to_string(),
                    value: if v.is_null() { None } else { Some(transform(&v.as_display_string())) },
                })
            }
            OutputColumn::TransformedOpt { source, transform } => {
                let v = row.get(source).ok_or_else(|| ColumnError::MissingSource(source.clone()))?;
                let input = if v.is_null() { None } else { Some(v.as_display_string()) };
                Ok(Resolved { sql_type: "text".to_string(), value: transform(input.as_deref()) })
            }
            OutputColumn::JsonRewrite { source, lens, transform } => {
                let v = row.get(source).ok_or_else(|| ColumnError::MissingSource(source.clone()))?;
                if v.is_null() {
                    return Ok(Resolved { sql_type: "jsonb".to_string(), value: None });
                }
                let text = v.as_display_string();
                let mut parsed: serde_json::Value = serde_json::from_str(&text)
                    .map_err(|e| ColumnError::JsonMalformed(source.clone(), e.to_string()))?;
                lens.rewrite(&mut parsed, transform);
                let serialized = serde_json::to_string(&parsed)
                    .map_err(|e| ColumnError::JsonMalformed(source.clone(), e.to_string()))?;
                Ok(Resolved { sql_type: "jsonb".to_string(), value: Some(serialized) })
            }
        }
    }
}
