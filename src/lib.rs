//! `eqs-lattice` library crate.
//!
//! The binary (`eqs`) is a thin wrapper around this library so that:
//!
//! - ingest, fitting and report formatting are testable without spawning processes
//! - the report formats can be produced or read back by other tools

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
