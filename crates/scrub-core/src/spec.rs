//! Table spec construction (spec §4.E, §3): the DSL entry point users build
//! against, and the conflict policy it carries.

use std::collections::HashSet;

use thiserror::Error;

use crate::column::OutputColumn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictTarget {
    /// Resolved by the copier at execution time from the table's own PK.
    PrimaryKeyAuto,
    ExplicitColumns(Vec<String>),
    NamedConstraint(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Plain INSERT; a PK clash aborts the copy.
    None,
    DoNothing { target: ConflictTarget },
    DoUpdate { target: ConflictTarget, update_cols: Vec<String> },
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        ConflictPolicy::None
    }
}

/// Names a source column, for use with the free function [`col`] and the
/// builder's `.output(col("name"), ...)` calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef(pub String);

pub fn col(name: impl Into<String>) -> ColumnRef {
    ColumnRef(name.into())
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("duplicate output column {0:?} in table spec")]
    DuplicateColumn(String),
}

/// An immutable, user-built description of how one table should be copied.
#[derive(Debug, Clone, Default)]
pub struct TableSpec {
    pub outputs: Vec<(String, OutputColumn)>,
    pub where_clause: Option<String>,
    pub conflict: ConflictPolicy,
}

impl TableSpec {
    pub fn builder() -> TableSpecBuilder {
        TableSpecBuilder::default()
    }

    /// The set of distinct destination column names this spec names.
    pub fn output_names(&self) -> HashSet<&str> {
        self.outputs.iter().map(|(name, _)| name.as_str()).collect()
    }
}

#[derive(Debug, Default)]
pub struct TableSpecBuilder {
    outputs: Vec<(String, OutputColumn)>,
    where_clause: Option<String>,
    conflict: ConflictPolicy,
}

impl TableSpecBuilder {
    /// Records an output column in user-visible order. Duplicate names are
    /// only caught at [`build`](Self::build): the builder stays append-only
    /// so callers can compose specs programmatically before validating.
    pub fn output(mut self, name: impl Into<String>, column: OutputColumn) -> Self {
        self.outputs.push((name.into(), column));
        self
    }

    pub fn where_clause(mut self, clause: impl Into<String>) -> Self {
        self.where_clause = Some(clause.into());
        self
    }

    pub fn on_conflict(mut self, policy: ConflictPolicy) -> Self {
        self.conflict = policy;
        self
    }

    pub fn build(self) -> Result<TableSpec, SpecError> {
        let mut seen = HashSet::new();
        for (name, _) in &self.outputs {
            if !seen.insert(name.as_str()) {
                return Err(SpecError::DuplicateColumn(name.clone()));
            }
        }
        Ok(TableSpec {
            outputs: self.outputs,
            where_clause: self.where_clause,
            conflict: self.conflict,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SqlValue;

    #[test]
    fn builder_preserves_declaration_order() {
        let spec = TableSpec::builder()
            .output("id", OutputColumn::Source { source: "id".into() })
            .output("email", OutputColumn::Fixed { value: SqlValue::Text("x".into()), sql_type: "text".into() })
            .build()
            .unwrap();
        assert_eq!(spec.outputs[0].0, "id");
        assert_eq!(spec.outputs[1].0, "email");
    }

    #[test]
    fn duplicate_output_names_are_rejected() {
        let err = TableSpec::builder()
            .output("id", OutputColumn::Source { source: "id".into() })
            .output("id", OutputColumn::Source { source: "id".into() })
            .build()
            .unwrap_err();
        assert_eq!(err, SpecError::DuplicateColumn("id".into()));
    }

    #[test]
    fn default_conflict_policy_is_none() {
        let spec = TableSpec::builder().build().unwrap();
        assert_eq!(spec.conflict, ConflictPolicy::None);
    }
}
