//! CSV trace output
//!
//! Streams emitted `(FlowKey, Packet)` tuples to CSV, one row per packet,
//! addresses rendered dotted-quad.

use std::fs::File;
use std::io::Write;
use std::net::Ipv4Addr;
use std::path::Path;

use csv::Writer;
use tracing::debug;

use crate::core::{FlowKey, Packet};
use crate::error::Result;

const HEADER: [&str; 8] = [
    "time", "saddr", "daddr", "sport", "dport", "proto", "len", "tcpflags",
];

/// Write a packet stream as CSV to any writer.
pub fn write_csv<W, I>(writer: W, packets: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = (FlowKey, Packet)>,
{
    let mut csv = Writer::from_writer(writer);
    csv.write_record(HEADER)?;

    let mut rows = 0usize;
    for (key, pkt) in packets {
        csv.write_record(&[
            format!("{:.9}", pkt.time),
            Ipv4Addr::from(key.saddr).to_string(),
            Ipv4Addr::from(key.daddr).to_string(),
            pkt.sport.to_string(),
            pkt.dport.to_string(),
            pkt.proto.to_string(),
            pkt.len.to_string(),
            pkt.tcpflags.to_string(),
        ])?;
        rows += 1;
    }
    csv.flush()?;

    debug!(rows, "csv written");
    Ok(())
}

/// Write a packet stream as CSV to a file.
pub fn write_csv_file<P, I>(path: P, packets: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (FlowKey, Packet)>,
{
    write_csv(File::create(path)?, packets)
}
