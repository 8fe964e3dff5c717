//! Trace synthesis
//!
//! Combines the fitted address and time models into a pull-model generator:
//! construct a [`TraceGenerator`] over an ingested [`crate::time::TimeAnalyzer`],
//! then drain it with `next_packet()` to obtain a globally time-ordered
//! synthetic trace.

mod schedule;
pub mod trace;

pub use trace::TraceGenerator;
