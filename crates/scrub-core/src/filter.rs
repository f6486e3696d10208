//! Propagates per-table WHERE clauses down the foreign-key graph (spec §4.H).
//!
//! Restricting a parent table automatically restricts every table that
//! (transitively) references it, by turning the parent's filter into an
//! `IN (SELECT ...)` subquery on the child. Propagation is one-directional:
//! a child's filter never flows back up to a parent.

use std::collections::HashMap;

use crate::model::{ForeignKey, TableIdentity};

/// Computes the effective filter for every table in `levels`, evaluated in
/// topological order so a parent's effective filter is always known before
/// its children are processed.
pub fn effective_filters(
    levels: &[Vec<TableIdentity>],
    foreign_keys: &[ForeignKey],
    raw_filters: &HashMap<TableIdentity, String>,
) -> HashMap<TableIdentity, Option<String>> {
    let mut effective: HashMap<TableIdentity, Option<String>> = HashMap::new();

    for level in levels {
        for table in level {
            let own = raw_filters.get(table).cloned();
            let mut clauses: Vec<String> = Vec::new();
            if let Some(own) = &own {
                clauses.push(format!("({own})"));
            }

            let mut parent_fks: Vec<&ForeignKey> = foreign_keys
                .iter()
                .filter(|fk| &fk.child == table && !fk.is_self_referencing())
                .collect();
            // Deterministic output: order subqueries by parent name, then by
            // the FK's own child-column list.
            parent_fks.sort_by(|a, b| (&a.parent, &a.child_columns).cmp(&(&b.parent, &b.child_columns)));

            for fk in parent_fks {
                let Some(Some(parent_filter)) = effective.get(&fk.parent) else {
                    continue;
                };
                clauses.push(subquery_clause(fk, parent_filter));
            }

            let combined = if clauses.is_empty() { None } else { Some(clauses.join(" AND ")) };
            effective.insert(table.clone(), combined);
        }
    }

    effective
}

fn subquery_clause(fk: &ForeignKey, parent_filter: &str) -> String {
    let child_cols = quoted_list(&fk.child_columns);
    let parent_cols = quoted_list(&fk.parent_columns);
    format!(
        "({child_cols}) IN (SELECT {parent_cols} FROM {} WHERE {parent_filter})",
        fk.parent.quoted()
    )
}

fn quoted_list(cols: &[String]) -> String {
    cols.iter().map(|c| format!("\"{c}\"")).collect::<Vec<_>>().join(", ")
}
