//! Synthetic trace generation
//!
//! Couples the address and time models: every observed flow gets a fresh
//! burst schedule from the shared renewal process, its packets are copied
//! into those bursts with remapped addresses and uniformly respaced
//! timestamps, and a two-level priority queue interleaves all flows into
//! one globally time-ordered packet stream.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rand::Rng;
use tracing::{debug, info};

use crate::addr::{AddrMap, CascadeGenerator, PrefixTree};
use crate::config::{AddrParameters, TimeParameters};
use crate::core::{Burst, FlowKey, Packet};
use crate::time::{BurstGenerator, TimeAnalyzer};

use super::schedule::ScheduledBurst;

/// Pull-model generator of a synthetic packet trace.
///
/// Construction does all the sampling; emission is a deterministic drain of
/// the scheduler heaps, so a fixed PRNG seed and input reproduce the trace
/// exactly.
pub struct TraceGenerator {
    pending_bursts: BinaryHeap<Reverse<ScheduledBurst>>,
    active_bursts: BinaryHeap<Reverse<ScheduledBurst>>,
}

impl TraceGenerator {
    /// Build a generator over the observed flows with the given targets.
    pub fn new<R: Rng>(
        observed: &TimeAnalyzer,
        time: &TimeParameters,
        addr: &AddrParameters,
        rng: &mut R,
    ) -> Self {
        let mut src_tree = PrefixTree::new();
        let mut dst_tree = PrefixTree::new();
        for key in observed.flows().keys() {
            src_tree
                .add(key.saddr, 1.0)
                .expect("tree is unsealed during construction");
            dst_tree
                .add(key.daddr, 1.0)
                .expect("tree is unsealed during construction");
        }
        let src_map = build_addr_map(&mut src_tree, addr.src_sigma, rng);
        let dst_map = build_addr_map(&mut dst_tree, addr.dst_sigma, rng);

        let mut burst_gen = BurstGenerator::new(time);
        let mut pending_bursts = BinaryHeap::new();
        let mut scheduled_packets = 0usize;
        for (key, bursts) in observed.flows() {
            let budget: u64 = bursts.iter().map(|b| b.len() as u64).sum();
            let schedule = burst_gen.next(rng, budget);

            let mapped = FlowKey::new(
                src_map
                    .get(key.saddr)
                    .expect("observed source address missing from address map"),
                dst_map
                    .get(key.daddr)
                    .expect("observed destination address missing from address map"),
            );
            debug!(%key, %mapped, budget, bursts = schedule.len(), "flow scheduled");

            // Refill synthetic bursts from the flow's own packets, wrapping
            // around the observed burst list as needed.
            let mut source = observed_packets(bursts).cycle();
            for burst in schedule {
                let span = burst.end_time - burst.start_time;
                let mut packets = Vec::with_capacity(burst.pkts as usize);
                for i in 0..burst.pkts {
                    let mut pkt = *source
                        .next()
                        .expect("observed flow holds at least one packet");
                    pkt.time = burst.start_time + i as f64 * span / burst.pkts as f64;
                    packets.push(pkt);
                }
                scheduled_packets += packets.len();
                pending_bursts.push(Reverse(ScheduledBurst::new(mapped, packets)));
            }
        }

        info!(
            flows = observed.n_flows(),
            packets = scheduled_packets,
            "synthetic trace scheduled"
        );
        Self {
            pending_bursts,
            active_bursts: BinaryHeap::new(),
        }
    }

    /// Emit the globally earliest remaining packet, or `None` when drained.
    ///
    /// At every step the winner is the earlier of the next burst to start
    /// and the earliest active burst's next packet, so emitted timestamps
    /// are non-decreasing over the whole trace.
    pub fn next_packet(&mut self) -> Option<(FlowKey, Packet)> {
        let from_pending = match (self.pending_bursts.peek(), self.active_bursts.peek()) {
            (None, None) => return None,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some(Reverse(pending)), Some(Reverse(active))) => {
                pending.next_time() <= active.next_time()
            }
        };

        let heap = if from_pending {
            &mut self.pending_bursts
        } else {
            &mut self.active_bursts
        };
        let Reverse(mut burst) = heap.pop()?;

        let pkt = burst.packets[burst.cursor];
        let key = burst.key;
        burst.cursor += 1;
        if burst.cursor < burst.packets.len() {
            self.active_bursts.push(Reverse(burst));
        }
        Some((key, pkt))
    }

    /// Drain the generator into a vector.
    pub fn generate_all(&mut self) -> Vec<(FlowKey, Packet)> {
        let mut out = Vec::new();
        while let Some(item) = self.next_packet() {
            out.push(item);
        }
        out
    }
}

/// All packets of a flow in burst order.
fn observed_packets(bursts: &[Burst]) -> impl Iterator<Item = &Packet> + Clone {
    bursts.iter().flat_map(|b| b.packets.iter())
}

/// Fit α per observed address, run the cascade at the target spread, and
/// pair the two sets by rank.
fn build_addr_map<R: Rng>(tree: &mut PrefixTree, sigma: f64, rng: &mut R) -> AddrMap {
    if tree.n() == 0 {
        return AddrMap::new(Vec::new(), Vec::new());
    }
    tree.prefixify();
    let addrs: Vec<u32> = tree.addresses().collect();
    let observed: Vec<(u32, f64)> = addrs
        .into_iter()
        .map(|a| (a, tree.singularity(a)))
        .collect();
    let synthetic = CascadeGenerator::new(sigma, tree.n() as u64).generate(rng);
    AddrMap::new(observed, synthetic)
}
