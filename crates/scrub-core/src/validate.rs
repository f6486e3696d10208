//! Coverage validation (spec §4.I): every non-skipped table must have a
//! spec, and every spec must address every data column of its table.

use std::collections::{HashMap, HashSet};

use crate::model::{ColumnInfo, ForeignKey, PrimaryKey, TableIdentity};
use crate::spec::TableSpec;

#[derive(Debug, PartialEq, Eq)]
pub struct CoverageError {
    pub missing_tables: Vec<MissingTable>,
    pub missing_columns: Vec<MissingColumns>,
}

impl std::fmt::Display for CoverageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "coverage validation failed:{}{}",
            render_missing_tables(&self.missing_tables),
            render_missing_columns(&self.missing_columns)
        )
    }
}

impl std::error::Error for CoverageError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTable {
    pub table: TableIdentity,
    /// A copy-pastable starting point for the spec the table is missing.
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumns {
    pub table: TableIdentity,
    pub columns: Vec<String>,
}

fn render_missing_tables(missing: &[MissingTable]) -> String {
    if missing.is_empty() {
        return String::new();
    }
    let mut out = String::from("\n  Missing table specs:\n");
    for m in missing {
        out.push_str(&format!("    {}\n{}\n", m.table, indent(&m.snippet)));
    }
    out
}

fn render_missing_columns(missing: &[MissingColumns]) -> String {
    if missing.is_empty() {
        return String::new();
    }
    let mut out = String::from("\n  missing columns:\n");
    for m in missing {
        out.push_str(&format!("    {}: {}\n", m.table, m.columns.join(", ")));
    }
    out
}

fn indent(snippet: &str) -> String {
    snippet.lines().map(|l| format!("      {l}")).collect::<Vec<_>>().join("\n")
}

/// Generates the `"<name>" -> TableSpec.select { row => Seq(...) }`-shaped
/// snippet for a table with no spec yet, one line per data column.
fn snippet_for(table: &TableIdentity, data_columns: &[&str]) -> String {
    let lines = data_columns
        .iter()
        .map(|c| format!("row.{c}.mapString(...),"))
        .collect::<Vec<_>>()
        .join("\n      ");
    format!("\"{table}\" -> TableSpec.select {{ row => Seq(\n      {lines}\n    ) }}")
}

fn data_columns<'a>(
    table: &TableIdentity,
    columns: &'a [ColumnInfo],
    primary_keys: &HashMap<TableIdentity, PrimaryKey>,
    foreign_keys: &[ForeignKey],
) -> Vec<&'a str> {
    let pk_cols: HashSet<&str> = primary_keys
        .get(table)
        .map(|pk| pk.columns.iter().map(|c| c.as_str()).collect())
        .unwrap_or_default();
    let fk_cols: HashSet<&str> = foreign_keys
        .iter()
        .filter(|fk| &fk.child == table)
        .flat_map(|fk| fk.child_columns.iter().map(|c| c.as_str()))
        .collect();

    columns
        .iter()
        .map(|c| c.name.as_str())
        .filter(|name| !pk_cols.contains(name) && !fk_cols.contains(name))
        .collect()
}

pub fn check(
    tables: &[TableIdentity],
    columns: &HashMap<TableIdentity, Vec<ColumnInfo>>,
    primary_keys: &HashMap<TableIdentity, PrimaryKey>,
    foreign_keys: &[ForeignKey],
    specs: &HashMap<TableIdentity, TableSpec>,
    skipped_tables: &HashSet<TableIdentity>,
) -> Result<(), CoverageError> {
    let mut missing_tables = Vec::new();
    let mut missing_columns = Vec::new();

    for table in tables {
        if skipped_tables.contains(table) {
            continue;
        }
        let cols = columns.get(table).map(Vec::as_slice).unwrap_or_default();
        let data_cols = data_columns(table, cols, primary_keys, foreign_keys);

        match specs.get(table) {
            None => {
                missing_tables.push(MissingTable {
                    table: table.clone(),
                    snippet: snippet_for(table, &data_cols),
                });
            }
            Some(spec) => {
                let covered = spec.output_names();
                let uncovered: Vec<String> =
                    data_cols.iter().filter(|c| !covered.contains(*c)).map(|c| c.to_string()).collect();
                if !uncovered.is_empty() {
                    missing_columns.push(MissingColumns { table: table.clone(), columns: uncovered });
                }
            }
        }
    }

    if missing_tables.is_empty() && missing_columns.is_empty() {
        Ok(())
    } else {
        Err(CoverageError { missing_tables, missing_columns })
    }
}
