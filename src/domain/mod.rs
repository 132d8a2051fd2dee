//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - parsed scan records and their per-U grouping (`Sample`, `ScanGroups`)
//! - fitter policy (`FitConfig`) and run configuration (`AnalysisConfig`)
//! - fit outputs (`FitResult`, `CubicFit`, `FitStatus`, etc.)

pub mod types;

pub use types::*;
