//! The narrow boundary between pure copy/reflection logic and a concrete
//! database client (spec §6.1), plus the one implementation this crate
//! ships: [`PgDriver`], wrapping `sqlx::PgPool`.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::TryStreamExt;
use scrub_core::{ColumnInfo, ForeignKey, PrimaryKey, SourceRow, SqlValue, TableIdentity};
use sqlx::{PgPool, Row};

/// Everything the copier and reflector need from a live connection.
/// Reflection and row-streaming methods take `&self`; writes go through a
/// [`Transaction`] so self-referencing tables can defer constraints.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn get_tables(&self, schema: &str) -> Result<Vec<TableIdentity>, sqlx::Error>;
    async fn get_primary_key(&self, table: &TableIdentity) -> Result<PrimaryKey, sqlx::Error>;
    async fn get_foreign_keys(&self, schema: &str) -> Result<Vec<ForeignKey>, sqlx::Error>;
    async fn get_columns(&self, table: &TableIdentity) -> Result<Vec<ColumnInfo>, sqlx::Error>;

    /// Streams rows of `table`, selecting exactly `select_columns`, each
    /// cast to text so every column decodes uniformly regardless of its
    /// native Postgres type (the "text-plus-cast" passthrough).
    fn fetch_rows<'a>(
        &'a self,
        table: &'a TableIdentity,
        select_columns: &'a [String],
        where_clause: Option<&'a str>,
        fetch_size: u32,
    ) -> BoxStream<'a, Result<SourceRow, sqlx::Error>>;

    async fn begin(&self) -> Result<Box<dyn Transaction>, sqlx::Error>;
}

/// A write transaction against the target database. `sqlx::Pool::begin`
/// hands back a `'static` transaction, so this trait carries no lifetime.
#[async_trait]
pub trait Transaction: Send {
    async fn set_constraints_deferred(&mut self) -> Result<(), sqlx::Error>;

    /// Issues one multi-VALUES `INSERT` for `rows`, each the same length
    /// as `columns`, decorated with `conflict_sql` (already the full
    /// `ON CONFLICT ...` suffix, or empty for [`scrub_core::ConflictPolicy::None`]).
    async fn insert_batch(
        &mut self,
        table: &TableIdentity,
        columns: &[(String, String)],
        rows: &[Vec<Option<String>>],
        conflict_sql: &str,
    ) -> Result<(), sqlx::Error>;

    async fn commit(self: Box<Self>) -> Result<(), sqlx::Error>;
    async fn rollback(self: Box<Self>) -> Result<(), sqlx::Error>;
}

pub struct PgDriver {
    pool: PgPool,
}

impl PgDriver {
    pub fn new(pool: PgPool) -> Self {
        PgDriver { pool }
    }
}

#[async_trait]
impl Driver for PgDriver {
    async fn get_tables(&self, schema: &str) -> Result<Vec<TableIdentity>, sqlx::Error> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT table_name FROM information_schema.tables
             WHERE table_schema = $1 AND table_type = 'BASE TABLE'
             ORDER BY table_name",
        )
        .bind(schema)
        .fetch_all(&self.pool)
        .await?;

        Ok(names.into_iter().map(|name| TableIdentity::new(schema, name)).collect())
    }

    async fn get_primary_key(&self, table: &TableIdentity) -> Result<PrimaryKey, sqlx::Error> {
        let columns: Vec<String> = sqlx::query_scalar(
            "SELECT kcu.column_name
             FROM information_schema.table_constraints tc
             JOIN information_schema.key_column_usage kcu
               ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema
             WHERE tc.table_schema = $1 AND tc.table_name = $2 AND tc.constraint_type = 'PRIMARY KEY'
             ORDER BY kcu.ordinal_position",
        )
        .bind(&table.schema)
        .bind(&table.table)
        .fetch_all(&self.pool)
        .await?;

        Ok(PrimaryKey { columns })
    }

    async fn get_foreign_keys(&self, schema: &str) -> Result<Vec<ForeignKey>, sqlx::Error> {
        #[derive(sqlx::FromRow)]
        struct Row {
            child_table: String,
            child_column: String,
            parent_table: String,
            parent_column: String,
            constraint_name: String,
            ordinal_position: i32,
        }

        let rows: Vec<Row> = sqlx::query_as(
            "SELECT
                tc.table_name AS child_table,
                kcu.column_name AS child_column,
                ccu.table_name AS parent_table,
                ccu.column_name AS parent_column,
                tc.constraint_name AS constraint_name,
                kcu.ordinal_position AS ordinal_position
             FROM information_schema.table_constraints tc
             JOIN information_schema.key_column_usage kcu
               ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema
             JOIN information_schema.constraint_column_usage ccu
               ON ccu.constraint_name = tc.constraint_name AND ccu.table_schema = tc.table_schema
             WHERE tc.table_schema = $1 AND tc.constraint_type = 'FOREIGN KEY'
             ORDER BY tc.constraint_name, kcu.ordinal_position",
        )
        .bind(schema)
        .fetch_all(&self.pool)
        .await?;

        // Composite FKs span multiple rows sharing a constraint name; group
        // them back into ordered column lists.
        let mut grouped: HashMap<String, (String, Vec<String>, String, Vec<String>)> = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        for r in rows {
            let entry = grouped.entry(r.constraint_name.clone()).or_insert_with(|| {
                order.push(r.constraint_name.clone());
                (r.child_table.clone(), Vec::new(), r.parent_table.clone(), Vec::new())
            });
            entry.1.push(r.child_column);
            entry.3.push(r.parent_column);
        }

        Ok(order
            .into_iter()
            .map(|name| {
                let (child_table, child_columns, parent_table, parent_columns) = grouped.remove(&name).unwrap();
                ForeignKey {
                    child: TableIdentity::new(schema, child_table),
                    child_columns,
                    parent: TableIdentity::new(schema, parent_table),
                    parent_columns,
                }
            })
            .collect())
    }

    async fn get_columns(&self, table: &TableIdentity) -> Result<Vec<ColumnInfo>, sqlx::Error> {
        #[derive(sqlx::FromRow)]
        struct Row {
            column_name: String,
            data_type: String,
            is_nullable: bool,
            ordinal_position: i32,
        }

        let rows: Vec<Row> = sqlx::query_as(
            "SELECT column_name, data_type, (is_nullable = 'YES') AS is_nullable, ordinal_position
             FROM information_schema.columns
             WHERE table_schema = $1 AND table_name = $2
             ORDER BY ordinal_position",
        )
        .bind(&table.schema)
        .bind(&table.table)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ColumnInfo {
                name: r.column_name,
                sql_type: r.data_type,
                nullable: r.is_nullable,
                ordinal: r.ordinal_position,
            })
            .collect())
    }

    fn fetch_rows<'a>(
        &'a self,
        table: &'a TableIdentity,
        select_columns: &'a [String],
        where_clause: Option<&'a str>,
        fetch_size: u32,
    ) -> BoxStream<'a, Result<SourceRow, sqlx::Error>> {
        let select_list = select_columns
            .iter()
            .map(|c| format!("\"{c}\"::text AS \"{c}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("SELECT {select_list} FROM {}", table.quoted());
        if let Some(clause) = where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(clause);
        }
        tracing::debug!(sql, fetch_size, "streaming source rows");

        let stream = sqlx::query(&sql).fetch(&self.pool).map_ok(move |row| {
            let mut values = HashMap::with_capacity(select_columns.len());
            for (i, name) in select_columns.iter().enumerate() {
                let text: Option<String> = row.try_get::<Option<String>, _>(i).ok().flatten();
                values.insert(name.clone(), text.map(SqlValue::Text).unwrap_or(SqlValue::Null));
            }
            SourceRow::new(values)
        });

        Box::pin(stream)
    }

    async fn begin(&self) -> Result<Box<dyn Transaction>, sqlx::Error> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTransaction { tx: Some(tx) }))
    }
}

struct PgTransaction {
    tx: Option<sqlx::Transaction<'static, sqlx::Postgres>>,
}

#[async_trait]
impl Transaction for PgTransaction {
    async fn set_constraints_deferred(&mut self) -> Result<(), sqlx::Error> {
        let tx = self.tx.as_mut().expect("transaction already consumed");
        sqlx::query("SET CONSTRAINTS ALL DEFERRED").execute(&mut **tx).await?;
        Ok(())
    }

    async fn insert_batch(
        &mut self,
        table: &TableIdentity,
        columns: &[(String, String)],
        rows: &[Vec<Option<String>>],
        conflict_sql: &str,
    ) -> Result<(), sqlx::Error> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.tx.as_mut().expect("transaction already consumed");

        let col_list = columns.iter().map(|(name, _)| format!("\"{name}\"")).collect::<Vec<_>>().join(", ");

        let mut placeholder = 1usize;
        let mut values_sql = String::new();
        for (i, _) in rows.iter().enumerate() {
            if i > 0 {
                values_sql.push_str(", ");
            }
            values_sql.push('(');
            for (j, (_, sql_type)) in columns.iter().enumerate() {
                if j > 0 {
                    values_sql.push_str(", ");
                }
                values_sql.push_str(&format!("${placeholder}::{sql_type}"));
                placeholder += 1;
            }
            values_sql.push(')');
        }

        let sql = format!(
            "INSERT INTO {} ({col_list}) VALUES {values_sql} {conflict_sql}",
            table.quoted()
        );

        let mut query = sqlx::query(&sql);
        for row in rows {
            for value in row {
                query = query.bind(value.clone());
            }
        }
        tracing::debug!(table = %table, rows = rows.len(), "flushing insert batch");
        query.execute(&mut **tx).await?;
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> Result<(), sqlx::Error> {
        self.tx.take().expect("transaction already consumed").commit().await
    }

    async fn rollback(mut self: Box<Self>) -> Result<(), sqlx::Error> {
        self.tx.take().expect("transaction already consumed").rollback().await
    }
}
