//! Streams one table from the source, rewrites each row, and writes it to
//! the target in batches (spec §4.J).

use std::collections::{BTreeSet, HashMap};

use futures::StreamExt;
use scrub_core::{ColumnInfo, ConflictPolicy, ConflictTarget, ForeignKey, PrimaryKey, TableIdentity, TableSpec};

use crate::driver::Driver;
use crate::error::ScrubError;

/// Resolves the destination column sequence for `table`: the user's
/// declared outputs, in order, followed by an implicit `Source` passthrough
/// for every PK/FK column the user didn't already name, in schema ordinal
/// order.
fn resolve_output_sequence(
    table_spec: &TableSpec,
    primary_key: &PrimaryKey,
    foreign_keys: &[ForeignKey],
    table: &TableIdentity,
    columns: &[ColumnInfo],
) -> Vec<(String, scrub_core::OutputColumn)> {
    let mut outputs = table_spec.outputs.clone();
    let declared: BTreeSet<&str> = outputs.iter().map(|(name, _)| name.as_str()).collect();

    let mut implicit_names: BTreeSet<&str> = primary_key.columns.iter().map(String::as_str).collect();
    for fk in foreign_keys.iter().filter(|fk| &fk.child == table) {
        implicit_names.extend(fk.child_columns.iter().map(String::as_str));
    }

    let mut implicit: Vec<&ColumnInfo> = columns.iter().filter(|c| implicit_names.contains(c.name.as_str()) && !declared.contains(c.name.as_str())).collect();
    implicit.sort_by_key(|c| c.ordinal);

    for col in implicit {
        outputs.push((col.name.clone(), scrub_core::OutputColumn::Source { source: col.name.clone() }));
    }

    outputs
}

fn conflict_sql(conflict: &ConflictPolicy, primary_key: &PrimaryKey) -> String {
    fn target_clause(target: &ConflictTarget, primary_key: &PrimaryKey) -> String {
        match target {
            ConflictTarget::PrimaryKeyAuto => {
                if primary_key.is_empty() {
                    String::new()
                } else {
                    format!("({})", primary_key.columns.iter().map(|c| format!("\"{c}\"")).collect::<Vec<_>>().join(", "))
                }
            }
            ConflictTarget::ExplicitColumns(cols) => {
                format!("({})", cols.iter().map(|c| format!("\"{c}\"")).collect::<Vec<_>>().join(", "))
            }
            ConflictTarget::NamedConstraint(name) => format!("ON CONSTRAINT \"{name}\""),
        }
    }

    match conflict {
        ConflictPolicy::None => String::new(),
        ConflictPolicy::DoNothing { target } => {
            let clause = target_clause(target, primary_key);
            if clause.is_empty() {
                "ON CONFLICT DO NOTHING".to_string()
            } else {
                format!("ON CONFLICT {clause} DO NOTHING")
            }
        }
        ConflictPolicy::DoUpdate { target, update_cols } => {
            let clause = target_clause(target, primary_key);
            let sets = update_cols.iter().map(|c| format!("\"{c}\" = EXCLUDED.\"{c}\"")).collect::<Vec<_>>().join(", ");
            format!("ON CONFLICT {clause} DO UPDATE SET {sets}")
        }
    }
}

pub struct CopyOutcome {
    /// Rows consumed from the source cursor, not rows ultimately inserted
    /// (which may be fewer under `DoNothing`).
    pub rows_consumed: u64,
}

#[allow(clippy::too_many_arguments)]
pub async fn copy_table(
    source: &dyn Driver,
    target: &dyn Driver,
    table: &TableIdentity,
    effective_filter: Option<&str>,
    primary_key: &PrimaryKey,
    foreign_keys: &[ForeignKey],
    columns: &[ColumnInfo],
    table_spec: &TableSpec,
    fetch_size: u32,
    batch_size: u32,
) -> Result<CopyOutcome, ScrubError> {
    let _span = tracing::info_span!("copy_table", schema = %table.schema, table = %table.table).entered();

    let outputs = resolve_output_sequence(table_spec, primary_key, foreign_keys, table, columns);

    let dependencies: BTreeSet<String> =
        outputs.iter().filter_map(|(_, col)| col.source_dependency().map(str::to_string)).collect();
    // Stable, ordinal-ordered SELECT list for reproducible generated SQL.
    let ordinal_of: HashMap<&str, i32> = columns.iter().map(|c| (c.name.as_str(), c.ordinal)).collect();
    let mut select_columns: Vec<String> = dependencies.into_iter().collect();
    select_columns.sort_by_key(|name| ordinal_of.get(name.as_str()).copied().unwrap_or(i32::MAX));

    let type_map: HashMap<&str, &str> = columns.iter().map(|c| (c.name.as_str(), c.sql_type.as_str())).collect();
    let source_sql_type = |name: &str| type_map.get(name).copied();

    let column_defs: Vec<(String, String)> =
        outputs.iter().map(|(name, col)| (name.clone(), col.sql_type(&source_sql_type))).collect();

    let is_self_fk = foreign_keys.iter().any(|fk| &fk.child == table && fk.is_self_referencing());
    let conflict = conflict_sql(&table_spec.conflict, primary_key);

    let mut tx = target.begin().await?;
    if is_self_fk {
        tx.set_constraints_deferred().await?;
    }

    let mut stream = source.fetch_rows(table, &select_columns, effective_filter, fetch_size);
    let mut batch: Vec<Vec<Option<String>>> = Vec::with_capacity(batch_size as usize);
    let mut rows_consumed: u64 = 0;

    while let Some(row) = stream.next().await {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                let _ = tx.rollback().await;
                return Err(ScrubError::Driver(e));
            }
        };
        rows_consumed += 1;

        let mut values = Vec::with_capacity(outputs.len());
        for (_, col) in &outputs {
            match col.resolve(&row, &source_sql_type) {
                Ok(resolved) => values.push(resolved.value),
                Err(e) => {
                    let _ = tx.rollback().await;
                    return Err(ScrubError::Column(e));
                }
            }
        }
        batch.push(values);

        if batch.len() >= batch_size as usize {
            if let Err(e) = tx.insert_batch(table, &column_defs, &batch, &conflict).await {
                let _ = tx.rollback().await;
                return Err(ScrubError::Driver(e));
            }
            batch.clear();
        }
    }

    if !batch.is_empty() {
        if let Err(e) = tx.insert_batch(table, &column_defs, &batch, &conflict).await {
            let _ = tx.rollback().await;
            return Err(ScrubError::Driver(e));
        }
    }

    tx.commit().await?;
    tracing::info!(rows_consumed, "table copy complete");

    Ok(CopyOutcome { rows_consumed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrub_core::OutputColumn;

    fn t(name: &str) -> TableIdentity {
        TableIdentity::new("public", name)
    }

    fn col(name: &str, ordinal: i32) -> ColumnInfo {
        ColumnInfo { name: name.to_string(), sql_type: "text".into(), nullable: true, ordinal }
    }

    #[test]
    fn conflict_sql_is_empty_for_plain_insert() {
        assert_eq!(conflict_sql(&ConflictPolicy::None, &PrimaryKey::default()), "");
    }

    #[test]
    fn conflict_sql_do_nothing_with_primary_key_auto() {
        let pk = PrimaryKey { columns: vec!["id".into()] };
        let sql = conflict_sql(&ConflictPolicy::DoNothing { target: ConflictTarget::PrimaryKeyAuto }, &pk);
        assert_eq!(sql, "ON CONFLICT (\"id\") DO NOTHING");
    }

    #[test]
    fn conflict_sql_do_nothing_with_no_primary_key_omits_a_target_list() {
        let sql = conflict_sql(&ConflictPolicy::DoNothing { target: ConflictTarget::PrimaryKeyAuto }, &PrimaryKey::default());
        assert_eq!(sql, "ON CONFLICT DO NOTHING");
    }

    #[test]
    fn conflict_sql_do_nothing_with_explicit_composite_columns() {
        let target = ConflictTarget::ExplicitColumns(vec!["tenant_id".into(), "id".into()]);
        let sql = conflict_sql(&ConflictPolicy::DoNothing { target }, &PrimaryKey::default());
        assert_eq!(sql, "ON CONFLICT (\"tenant_id\", \"id\") DO NOTHING");
    }

    #[test]
    fn conflict_sql_do_nothing_with_named_constraint() {
        let target = ConflictTarget::NamedConstraint("users_email_key".into());
        let sql = conflict_sql(&ConflictPolicy::DoNothing { target }, &PrimaryKey::default());
        assert_eq!(sql, "ON CONFLICT ON CONSTRAINT \"users_email_key\" DO NOTHING");
    }

    #[test]
    fn conflict_sql_do_update_sets_excluded_values() {
        let pk = PrimaryKey { columns: vec!["id".into()] };
        let policy = ConflictPolicy::DoUpdate {
            target: ConflictTarget::PrimaryKeyAuto,
            update_cols: vec!["name".into(), "email".into()],
        };
        let sql = conflict_sql(&policy, &pk);
        assert_eq!(sql, "ON CONFLICT (\"id\") DO UPDATE SET \"name\" = EXCLUDED.\"name\", \"email\" = EXCLUDED.\"email\"");
    }

    #[test]
    fn resolve_output_sequence_keeps_declared_outputs_in_order() {
        let spec = TableSpec::builder()
            .output("email", OutputColumn::Source { source: "email".into() })
            .output("name", OutputColumn::Source { source: "name".into() })
            .build()
            .unwrap();
        let columns = vec![col("id", 1), col("name", 2), col("email", 3)];
        let pk = PrimaryKey { columns: vec!["id".into()] };

        let outputs = resolve_output_sequence(&spec, &pk, &[], &t("users"), &columns);

        assert_eq!(outputs[0].0, "email");
        assert_eq!(outputs[1].0, "name");
        assert_eq!(outputs[2].0, "id");
    }

    #[test]
    fn resolve_output_sequence_does_not_duplicate_a_pk_column_the_user_already_declared() {
        let spec = TableSpec::builder().output("id", OutputColumn::Source { source: "id".into() }).build().unwrap();
        let columns = vec![col("id", 1), col("name", 2)];
        let pk = PrimaryKey { columns: vec!["id".into()] };

        let outputs = resolve_output_sequence(&spec, &pk, &[], &t("users"), &columns);

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].0, "id");
    }

    #[test]
    fn resolve_output_sequence_adds_fk_columns_in_schema_ordinal_order() {
        let spec = TableSpec::builder().output("total", OutputColumn::Source { source: "total".into() }).build().unwrap();
        let columns = vec![col("id", 1), col("user_id", 2), col("total", 3)];
        let fks = vec![ForeignKey {
            child: t("orders"),
            child_columns: vec!["user_id".into()],
            parent: t("users"),
            parent_columns: vec!["id".into()],
        }];
        let pk = PrimaryKey { columns: vec!["id".into()] };

        let outputs = resolve_output_sequence(&spec, &pk, &fks, &t("orders"), &columns);

        assert_eq!(outputs.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(), vec!["total", "id", "user_id"]);
    }

    #[test]
    fn resolve_output_sequence_ignores_fks_belonging_to_other_tables() {
        let spec = TableSpec::builder().build().unwrap();
        // "user_id" here is a column of "users" itself (e.g. a self-referring
        // manager id), distinct from the "orders.user_id" FK below — it must
        // not be pulled in as an implicit output just because the names match.
        let columns = vec![col("id", 1), col("user_id", 2)];
        let fks = vec![ForeignKey {
            child: t("orders"),
            child_columns: vec!["user_id".into()],
            parent: t("users"),
            parent_columns: vec!["id".into()],
        }];
        let pk = PrimaryKey { columns: vec!["id".into()] };

        let outputs = resolve_output_sequence(&spec, &pk, &fks, &t("users"), &columns);

        assert_eq!(outputs.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(), vec!["id"]);
    }
}
