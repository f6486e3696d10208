//! Reads live schema metadata once per run (spec §4.F). Never caches
//! across calls: a fresh [`Metadata`] is built at the start of every
//! [`crate::orchestrator::Orchestrator::run`].

use std::collections::HashMap;

use scrub_core::{ColumnInfo, ForeignKey, PrimaryKey, TableIdentity};

use crate::driver::Driver;

#[derive(Debug, Clone)]
pub struct Metadata {
    pub tables: Vec<TableIdentity>,
    pub primary_keys: HashMap<TableIdentity, PrimaryKey>,
    pub foreign_keys: Vec<ForeignKey>,
    pub columns: HashMap<TableIdentity, Vec<ColumnInfo>>,
}

pub async fn reflect(driver: &dyn Driver, schema: &str) -> Result<Metadata, sqlx::Error> {
    let tables = driver.get_tables(schema).await?;
    let foreign_keys = driver.get_foreign_keys(schema).await?;

    let mut primary_keys = HashMap::with_capacity(tables.len());
    let mut columns = HashMap::with_capacity(tables.len());
    for table in &tables {
        primary_keys.insert(table.clone(), driver.get_primary_key(table).await?);
        columns.insert(table.clone(), driver.get_columns(table).await?);
    }

    tracing::info!(table_count = tables.len(), fk_count = foreign_keys.len(), "reflected schema metadata");

    Ok(Metadata { tables, primary_keys, foreign_keys, columns })
}
