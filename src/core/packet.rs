//! Unified packet representation
//!
//! A per-packet record carrying the fields the statistical models consume.
//! All multi-byte integers are in host byte order; wire formats are decoded
//! at ingest.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// A single observed or synthesized packet.
///
/// Timestamps are seconds since epoch with double precision. `len` is the
/// IPv4 total length; `tcpflags` is zero for non-TCP packets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    /// Capture or synthesis timestamp (seconds)
    pub time: f64,
    /// L4 source port
    pub sport: u16,
    /// L4 destination port
    pub dport: u16,
    /// IP protocol number (6 = TCP, 17 = UDP)
    pub proto: u8,
    /// IPv4 total length
    pub len: u16,
    /// TCP flag bits (FIN=0x01, SYN=0x02, ...)
    pub tcpflags: u8,
}

impl Packet {
    /// Create a packet with the given timestamp and zeroed header fields.
    pub fn at(time: f64) -> Self {
        Self {
            time,
            sport: 0,
            dport: 0,
            proto: 0,
            len: 0,
            tcpflags: 0,
        }
    }
}

/// Flow identity: the (source, destination) address pair.
///
/// Flows are keyed on addresses only; ports are carried per-packet but do
/// not participate in grouping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FlowKey {
    /// Source IPv4 address, host byte order
    pub saddr: u32,
    /// Destination IPv4 address, host byte order
    pub daddr: u32,
}

impl FlowKey {
    pub fn new(saddr: u32, daddr: u32) -> Self {
        Self { saddr, daddr }
    }
}

impl std::fmt::Display for FlowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}->{}",
            Ipv4Addr::from(self.saddr),
            Ipv4Addr::from(self.daddr)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_key_display() {
        let key = FlowKey::new(0x01010101, 0x02020202);
        assert_eq!(key.to_string(), "1.1.1.1->2.2.2.2");
    }

    #[test]
    fn test_flow_key_ordering() {
        let a = FlowKey::new(1, 9);
        let b = FlowKey::new(2, 0);
        assert!(a < b);
    }
}
