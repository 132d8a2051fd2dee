//! Reporting utilities: fit report, lattice summary and terminal tables.

pub mod format;

pub use format::*;
