//! The crate-level error returned from [`crate::orchestrator::Orchestrator::run`]
//! (spec §7). Every narrower, per-module error converts into it via `#[from]`.

use scrub_core::{ColumnError, CoverageError, SpecError, TopoError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrubError {
    /// Table or column not addressed by any spec; carries the generated
    /// snippets so a caller can surface them without re-deriving anything.
    #[error(transparent)]
    SpecMissing(#[from] CoverageError),

    /// A column named twice in one `TableSpec`.
    #[error(transparent)]
    SpecDuplicate(#[from] SpecError),

    /// Covers both `SchemaMismatch` (a spec references a column the
    /// reflected row doesn't have) and `JSONMalformed` (a `JsonRewrite`
    /// column's source value wasn't valid JSON) — both are narrow failures
    /// of resolving one column, so they share `scrub_core::ColumnError`.
    #[error(transparent)]
    Column(#[from] ColumnError),

    /// A non-self FK cycle among distinct tables.
    #[error(transparent)]
    CycleDetected(#[from] TopoError),

    /// Any DB-level failure, propagated with whatever context `sqlx`
    /// attaches; aborts the current table's transaction.
    #[error(transparent)]
    Driver(#[from] sqlx::Error),
}
