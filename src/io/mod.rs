//! Input/output helpers.
//!
//! - scan ingest + grouping (`ingest`)
//! - per-cell result exports (CSV) (`export`)
//! - fit JSON read/write (`curve`)
//! - lattice summary read-back (`lattice`)

pub mod curve;
pub mod export;
pub mod ingest;
pub mod lattice;

pub use curve::*;
pub use export::*;
pub use ingest::*;
pub use lattice::*;
