//! The Postgres adapter: schema reflection, streaming table copy, and the
//! orchestrator that ties them to `scrub-core`'s pure transform logic.

pub mod copier;
pub mod driver;
pub mod error;
pub mod orchestrator;
pub mod reflect;

pub use driver::{Driver, PgDriver, Transaction};
pub use error::ScrubError;
pub use orchestrator::{Orchestrator, RunConfig};
pub use reflect::{reflect, Metadata};
