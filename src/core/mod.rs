//! Core data model: packets, flow keys, and bursts.
//!
//! These are the value types exchanged between the ingest layer, the
//! fitting components, and the trace generator.

pub mod burst;
pub mod packet;

pub use burst::Burst;
pub use packet::{FlowKey, Packet};
