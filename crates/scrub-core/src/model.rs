//! Shared schema data model (spec §3): tables, columns, keys.

/// A schema-qualified table name. Equality is case-sensitive, matching
/// Postgres's treatment of quoted identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableIdentity {
    pub schema: String,
    pub table: String,
}

impl TableIdentity {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        TableIdentity {
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Double-quoted `"schema"."table"` form, safe to splice into generated SQL.
    pub fn quoted(&self) -> String {
        format!("\"{}\".\"{}\"", self.schema, self.table)
    }
}

impl std::fmt::Display for TableIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// A source column as reflected from the live schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    /// Opaque SQL type descriptor (e.g. `"numeric(10,2)"`, `"jsonb"`, `"text[]"`).
    pub sql_type: String,
    pub nullable: bool,
    pub ordinal: i32,
}

/// Ordered primary key column list; empty for a heap table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryKey {
    pub columns: Vec<String>,
}

impl PrimaryKey {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A directed foreign key edge: `child_columns` in `child` reference
/// `parent_columns` in `parent`, in corresponding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub child: TableIdentity,
    pub child_columns: Vec<String>,
    pub parent: TableIdentity,
    pub parent_columns: Vec<String>,
}

impl ForeignKey {
    pub fn is_self_referencing(&self) -> bool {
        self.child == self.parent
    }
}
