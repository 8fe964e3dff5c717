//! Pcap ingest
//!
//! Reads a capture file and decodes Ethernet/IPv4/TCP/UDP frames into the
//! `(FlowKey, Packet)` tuples the analyzers consume. Multi-byte fields are
//! converted to host byte order here; IPv6 and non-TCP/UDP frames are
//! skipped, as are frames that fail to decode.

use std::path::Path;

use etherparse::{NetSlice, SlicedPacket, TcpSlice, TransportSlice};
use pcap::Capture;
use tracing::debug;

use crate::core::{FlowKey, Packet};
use crate::error::Result;

/// Read a pcap file into decoded packets, in capture order.
pub fn read_packets<P: AsRef<Path>>(path: P) -> Result<Vec<(FlowKey, Packet)>> {
    let mut cap = Capture::from_file(path.as_ref())?;

    let mut packets = Vec::new();
    let mut skipped = 0usize;
    while let Ok(frame) = cap.next_packet() {
        let time = frame.header.ts.tv_sec as f64 + frame.header.ts.tv_usec as f64 * 1e-6;
        match decode(frame.data, time) {
            Some(tuple) => packets.push(tuple),
            None => skipped += 1,
        }
    }

    debug!(
        packets = packets.len(),
        skipped,
        "pcap ingest finished: {}",
        path.as_ref().display()
    );
    Ok(packets)
}

/// Parse one raw frame into our packet record.
fn decode(data: &[u8], time: f64) -> Option<(FlowKey, Packet)> {
    let sliced = SlicedPacket::from_ethernet(data).ok()?;

    let (key, proto, len) = match &sliced.net {
        Some(NetSlice::Ipv4(ipv4)) => {
            let header = ipv4.header();
            let key = FlowKey::new(
                u32::from(header.source_addr()),
                u32::from(header.destination_addr()),
            );
            (key, header.protocol().0, header.total_len())
        }
        // IPv6, ARP and other non-IPv4 frames are out of scope
        _ => return None,
    };

    let (sport, dport, tcpflags) = match &sliced.transport {
        Some(TransportSlice::Tcp(tcp)) => {
            (tcp.source_port(), tcp.destination_port(), flag_bits(tcp))
        }
        Some(TransportSlice::Udp(udp)) => (udp.source_port(), udp.destination_port(), 0),
        _ => return None,
    };

    let pkt = Packet {
        time,
        sport,
        dport,
        proto,
        len,
        tcpflags,
    };
    Some((key, pkt))
}

fn flag_bits(tcp: &TcpSlice) -> u8 {
    let mut flags = 0u8;
    if tcp.fin() {
        flags |= 0x01;
    }
    if tcp.syn() {
        flags |= 0x02;
    }
    if tcp.rst() {
        flags |= 0x04;
    }
    if tcp.psh() {
        flags |= 0x08;
    }
    if tcp.ack() {
        flags |= 0x10;
    }
    if tcp.urg() {
        flags |= 0x20;
    }
    flags
}

#[cfg(test)]
mod tests {
    use etherparse::PacketBuilder;

    use super::*;

    #[test]
    fn test_decode_tcp_frame() {
        let builder = PacketBuilder::ethernet2([1; 6], [2; 6])
            .ipv4([10, 0, 0, 1], [192, 168, 1, 7], 64)
            .tcp(443, 51000, 1000, 65535)
            .syn();
        let mut frame = Vec::new();
        builder.write(&mut frame, &[]).unwrap();

        let (key, pkt) = decode(&frame, 12.5).unwrap();
        assert_eq!(key, FlowKey::new(0x0a000001, 0xc0a80107));
        assert_eq!(pkt.time, 12.5);
        assert_eq!(pkt.sport, 443);
        assert_eq!(pkt.dport, 51000);
        assert_eq!(pkt.proto, 6);
        assert_eq!(pkt.tcpflags, 0x02);
    }

    #[test]
    fn test_decode_udp_frame() {
        let builder = PacketBuilder::ethernet2([1; 6], [2; 6])
            .ipv4([1, 1, 1, 1], [8, 8, 8, 8], 64)
            .udp(53, 40000);
        let mut frame = Vec::new();
        builder.write(&mut frame, &[0xde, 0xad]).unwrap();

        let (key, pkt) = decode(&frame, 0.0).unwrap();
        assert_eq!(key, FlowKey::new(0x01010101, 0x08080808));
        assert_eq!(pkt.proto, 17);
        assert_eq!(pkt.tcpflags, 0);
    }

    #[test]
    fn test_non_ip_frame_skipped() {
        // Runt ethernet frame with an unknown ethertype
        let frame = [0u8; 20];
        assert!(decode(&frame, 0.0).is_none());
    }
}
