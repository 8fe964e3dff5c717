//! Time-domain modeling
//!
//! The temporal half of the trace model: [`TimeAnalyzer`] reduces an
//! observed packet stream to per-flow on/off burst structure and fits
//! Pareto shapes to it; [`BurstGenerator`] runs the fitted (or chosen)
//! renewal process forward to schedule synthetic bursts.

pub mod analyzer;
pub mod burst_gen;

pub use analyzer::TimeAnalyzer;
pub use burst_gen::{BurstGenerator, BurstTimes};
