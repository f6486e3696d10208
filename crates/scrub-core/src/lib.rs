//! Pure, DB-agnostic anonymization logic: the pool sampler, the named
//! anonymizer registry, the JSON lens, the column-transform algebra, table
//! specs, the dependency-level sorter, the filter propagator, and coverage
//! validation.
//!
//! Nothing in this crate performs I/O; `scrub-pg` is the only crate that
//! talks to a database, decoding rows into the [`value::SourceRow`] shape
//! this crate operates on and rendering [`column::Resolved`] values back
//! into bind parameters.

pub mod column;
pub mod filter;
pub mod lens;
pub mod model;
pub mod registry;
pub mod sampler;
pub mod spec;
pub mod topo;
pub mod validate;
pub mod value;

pub use column::{nulled, ColumnError, OptStringFn, OutputColumn, Resolved, StringFn};
pub use filter::effective_filters;
pub use lens::{Lens, LensBuilder, Step};
pub use model::{ColumnInfo, ForeignKey, PrimaryKey, TableIdentity};
pub use registry::Anonymizer;
pub use sampler::{pool_index, salted_pool_index, sample};
pub use spec::{col, ColumnRef, ConflictPolicy, ConflictTarget, SpecError, TableSpec, TableSpecBuilder};
pub use topo::{levels, TopoError};
pub use validate::{check as check_coverage, CoverageError, MissingColumns, MissingTable};
pub use value::{SourceRow, SqlValue};
