//! Kahn-style dependency leveling over the foreign-key graph (spec §4.G).

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::model::{ForeignKey, TableIdentity};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopoError {
    #[error("dependency cycle among tables: {}", .0.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", "))]
    Cycle(Vec<TableIdentity>),
}

/// Partitions `tables` into dependency levels `[L0, L1, ..., Ld]` such that
/// every non-self FK from a table in `Lk` points into an earlier level.
/// Self-referencing FKs are ignored here; the copier handles them via
/// deferred constraints at copy time. Each level is sorted lexicographically
/// so runs are reproducible.
pub fn levels(tables: &[TableIdentity], foreign_keys: &[ForeignKey]) -> Result<Vec<Vec<TableIdentity>>, TopoError> {
    let table_set: BTreeSet<&TableIdentity> = tables.iter().collect();

    // parent -> children, restricted to non-self FKs between known tables.
    let mut dependents: BTreeMap<&TableIdentity, BTreeSet<&TableIdentity>> = BTreeMap::new();
    let mut indegree: BTreeMap<&TableIdentity, usize> = tables.iter().map(|t| (t, 0)).collect();

    for fk in foreign_keys {
        if fk.is_self_referencing() {
            continue;
        }
        if !table_set.contains(&fk.child) || !table_set.contains(&fk.parent) {
            continue;
        }
        let inserted = dependents.entry(&fk.parent).or_default().insert(&fk.child);
        if inserted {
            *indegree.entry(&fk.child).or_insert(0) += 1;
        }
    }

    let mut remaining = indegree.clone();
    let mut out = Vec::new();
    let mut placed = 0usize;

    loop {
        let mut current: Vec<&TableIdentity> =
            remaining.iter().filter(|(_, &deg)| deg == 0).map(|(t, _)| *t).collect();
        if current.is_empty() {
            break;
        }
        current.sort();
        for t in &current {
            remaining.remove(*t);
        }
        for t in &current {
            if let Some(children) = dependents.get(*t) {
                for child in children {
                    if let Some(deg) = remaining.get_mut(child) {
                        *deg -= 1;
                    }
                }
            }
        }
        placed += current.len();
        out.push(current.into_iter().cloned().collect());
    }

    if placed < tables.len() {
        let mut cyclic: Vec<TableIdentity> = remaining.keys().map(|t| (*t).clone()).collect();
        cyclic.sort();
        return Err(TopoError::Cycle(cyclic));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(name: &str) -> TableIdentity {
        TableIdentity::new("public", name)
    }

    fn fk(child: &str, parent: &str) -> ForeignKey {
        ForeignKey {
            child: t(child),
            child_columns: vec!["parent_id".into()],
            parent: t(parent),
            parent_columns: vec!["id".into()],
        }
    }

    #[test]
    fn independent_tables_share_level_zero() {
        let tables = vec![t("users"), t("products")];
        let levels = levels(&tables, &[]).unwrap();
        assert_eq!(levels, vec![vec![t("products"), t("users")]]);
    }

    #[test]
    fn a_chain_produces_one_level_per_link() {
        let tables = vec![t("users"), t("orders"), t("order_items")];
        let fks = vec![fk("orders", "users"), fk("order_items", "orders")];
        let levels = levels(&tables, &fks).unwrap();
        assert_eq!(levels, vec![vec![t("users")], vec![t("orders")], vec![t("order_items")]]);
    }

    #[test]
    fn self_fk_is_ignored_for_leveling() {
        let tables = vec![t("categories")];
        let fks = vec![fk("categories", "categories")];
        let levels = levels(&tables, &fks).unwrap();
        assert_eq!(levels, vec![vec![t("categories")]]);
    }

    #[test]
    fn tie_break_is_lexicographic() {
        let tables = vec![t("zebra"), t("apple"), t("mango")];
        let levels = levels(&tables, &[]).unwrap();
        assert_eq!(levels, vec![vec![t("apple"), t("mango"), t("zebra")]]);
    }

    #[test]
    fn a_genuine_cycle_is_an_error() {
        let tables = vec![t("a"), t("b")];
        let fks = vec![fk("a", "b"), fk("b", "a")];
        let err = levels(&tables, &fks).unwrap_err();
        assert_eq!(err, TopoError::Cycle(vec![t("a"), t("b")]));
    }
}
