//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - filter and gate each (U, column) series
//! - fit a cubic to every surviving series (parallel)
//! - locate the in-range minimum of each fitted curve

pub mod fitter;
pub mod locate;

pub use fitter::*;
pub use locate::*;
