//! Curve model used by the fitter.
//!
//! The model is implemented as small, pure functions so that the fitting code
//! stays free of polynomial bookkeeping.

pub mod model;

pub use model::*;
