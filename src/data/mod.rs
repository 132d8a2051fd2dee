//! Data sources beyond the scan files themselves.
//!
//! - `scan`: seeded synthetic scans for demos and tests

pub mod scan;

pub use scan::*;
