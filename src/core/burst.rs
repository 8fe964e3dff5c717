//! Burst: a maximal run of closely spaced packets within a flow

use serde::{Deserialize, Serialize};

use super::Packet;

/// A maximal run of packets whose consecutive gaps are all below the
/// configured burst timeout.
///
/// Invariants: `start_time <= end_time`, `packets` is non-empty,
/// `packets.first().time == start_time` and `packets.last().time == end_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Burst {
    /// Timestamp of the first packet
    pub start_time: f64,
    /// Timestamp of the last packet
    pub end_time: f64,
    /// Packets in arrival order
    pub packets: Vec<Packet>,
}

impl Burst {
    /// Open a burst with its first packet.
    pub fn new(pkt: Packet) -> Self {
        Self {
            start_time: pkt.time,
            end_time: pkt.time,
            packets: vec![pkt],
        }
    }

    /// Append a packet and extend the burst's end time.
    pub fn push(&mut self, pkt: Packet) {
        self.end_time = pkt.time;
        self.packets.push(pkt);
    }

    /// On-duration of this burst.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }
}
