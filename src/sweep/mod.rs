//! Periodic sweep over pending watches
//!
//! One sweep fetches quotes, evaluates thresholds, and sends trigger
//! notifications. The scheduler serializes sweeps on a fixed interval.

pub mod evaluator;
pub mod scheduler;

pub use evaluator::evaluate;
pub use scheduler::{SweepStats, Sweeper};
