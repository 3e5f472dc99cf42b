//! Analysis modules.
//!
//! Pure statistics over a run's response records.

pub mod aggregator;

pub use aggregator::*;
