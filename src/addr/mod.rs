//! Address-space modeling
//!
//! Models the spatial structure of an IPv4 address set as a conservative
//! binary cascade on the 33-level prefix tree, and rebuilds sets with the
//! same structure at a chosen spread:
//!
//! - [`PrefixTree`] accumulates observed addresses, fits the logit-normal
//!   spread σ, and estimates per-address singularity exponents.
//! - [`CascadeGenerator`] samples a fresh address set at a target σ.
//! - [`AddrMap`] links the two sets rank-by-rank so synthesized traffic
//!   keeps the relative intensity ordering of the original.

pub mod cascade;
pub mod map;
pub mod prefix;
pub mod tree;

pub use cascade::CascadeGenerator;
pub use map::AddrMap;
pub use prefix::Prefix;
pub use tree::PrefixTree;
