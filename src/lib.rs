//! flowsynth: statistical modeling and synthesis of network packet traces
//!
//! Models a trace as a joint stochastic process over time (bursty per-flow
//! arrivals) and IPv4 address space (multifractal structure of the source
//! and destination sets), fits both models to an observed capture, and
//! generates synthetic traces matching chosen targets. Synthetic traces are
//! intended as controlled inputs for evaluating in-network query systems.
//!
//! # Pipeline
//!
//! ```ignore
//! use flowsynth::{AddrParameters, TimeAnalyzer, TimeParameters, TraceGenerator};
//!
//! let mut observed = TimeAnalyzer::new();
//! for (key, pkt) in flowsynth::ingest::read_packets("trace.pcap")? {
//!     observed.add(key, pkt);
//! }
//!
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
//! let mut gen = TraceGenerator::new(
//!     &observed,
//!     &TimeParameters::default(),
//!     &AddrParameters::default(),
//!     &mut rng,
//! );
//! while let Some((key, pkt)) = gen.next_packet() {
//!     // packets arrive in global timestamp order
//! }
//! ```
//!
//! The whole core is single-threaded and pull-driven: all randomness is
//! consumed at construction, so a fixed seed and input reproduce a trace
//! byte for byte.

pub mod addr;
pub mod config;
pub mod core;
pub mod error;
pub mod ingest;
pub mod output;
pub mod stats;
pub mod synth;
pub mod time;

pub use crate::addr::{AddrMap, CascadeGenerator, Prefix, PrefixTree};
pub use crate::config::{AddrParameters, SynthConfig, TimeParameters};
pub use crate::core::{Burst, FlowKey, Packet};
pub use crate::error::{Result, SynthError};
pub use crate::stats::SlopeFitter;
pub use crate::synth::TraceGenerator;
pub use crate::time::{BurstGenerator, TimeAnalyzer};
