//! Wires reflection, coverage validation, dependency leveling, filter
//! propagation, and per-table copies into one `run` (spec §4.K, §3.1).

use std::collections::{HashMap, HashSet};

use scrub_core::{effective_filters, levels, TableIdentity, TableSpec};

use crate::copier::copy_table;
use crate::driver::Driver;
use crate::error::ScrubError;
use crate::reflect::reflect;

/// Library-level configuration for one `run`: the connected pools, the
/// schema to copy, and the copier's batching knobs. Loading a
/// `DATABASE_URL` or a config file is the caller's concern, not this
/// crate's (out of scope per the system overview).
pub struct RunConfig {
    pub source: sqlx::PgPool,
    pub target: sqlx::PgPool,
    pub schema: String,
    pub fetch_size: u32,
    pub batch_size: u32,
    pub skipped_tables: HashSet<TableIdentity>,
}

impl RunConfig {
    pub fn new(source: sqlx::PgPool, target: sqlx::PgPool, schema: impl Into<String>) -> Self {
        RunConfig {
            source,
            target,
            schema: schema.into(),
            fetch_size: 1000,
            batch_size: 1000,
            skipped_tables: HashSet::new(),
        }
    }

    pub fn fetch_size(mut self, fetch_size: u32) -> Self {
        self.fetch_size = fetch_size;
        self
    }

    pub fn batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn skip(mut self, table: TableIdentity) -> Self {
        self.skipped_tables.insert(table);
        self
    }
}

pub struct Orchestrator {
    source_driver: crate::driver::PgDriver,
    target_driver: crate::driver::PgDriver,
    config: RunConfig,
}

impl Orchestrator {
    pub fn new(config: RunConfig) -> Self {
        let source_driver = crate::driver::PgDriver::new(config.source.clone());
        let target_driver = crate::driver::PgDriver::new(config.target.clone());
        Orchestrator { source_driver, target_driver, config }
    }

    /// Copies every non-skipped table named (implicitly, via metadata) by
    /// the source schema, using `specs` to drive each table's transform.
    /// Returns the number of rows consumed from the source per table;
    /// skipped tables map to zero.
    pub async fn run(
        &self,
        specs: HashMap<TableIdentity, TableSpec>,
    ) -> Result<HashMap<TableIdentity, u64>, ScrubError> {
        let run_span =
            tracing::info_span!("run", schema = %self.config.schema, table_count = tracing::field::Empty).entered();

        let metadata = reflect(&self.source_driver, &self.config.schema).await?;
        run_span.record("table_count", metadata.tables.len());
        tracing::info!(table_count = metadata.tables.len(), "metadata reflected");

        scrub_core::check_coverage(
            &metadata.tables,
            &metadata.columns,
            &metadata.primary_keys,
            &metadata.foreign_keys,
            &specs,
            &self.config.skipped_tables,
        )?;

        let levels = levels(&metadata.tables, &metadata.foreign_keys)?;

        let mut raw_filters = HashMap::new();
        for (table, spec) in &specs {
            if let Some(clause) = &spec.where_clause {
                raw_filters.insert(table.clone(), clause.clone());
            }
        }
        let effective = effective_filters(&levels, &metadata.foreign_keys, &raw_filters);

        let mut counts = HashMap::with_capacity(metadata.tables.len());
        let empty_spec = TableSpec::default();

        for level in &levels {
            for table in level {
                if self.config.skipped_tables.contains(table) {
                    counts.insert(table.clone(), 0);
                    continue;
                }
                let spec = specs.get(table).unwrap_or(&empty_spec);
                let filter = effective.get(table).and_then(|f| f.as_deref());
                let primary_key = metadata.primary_keys.get(table).cloned().unwrap_or_default();
                let columns = metadata.columns.get(table).cloned().unwrap_or_default();

                tracing::debug!(table = %table, filter, "effective filter for table");

                let outcome = copy_table(
                    &self.source_driver,
                    &self.target_driver,
                    table,
                    filter,
                    &primary_key,
                    &metadata.foreign_keys,
                    &columns,
                    spec,
                    self.config.fetch_size,
                    self.config.batch_size,
                )
                .await?;

                tracing::info!(table = %table, rows = outcome.rows_consumed, "copied table");
                counts.insert(table.clone(), outcome.rows_consumed);
            }
        }

        drop(run_span);
        Ok(counts)
    }
}
