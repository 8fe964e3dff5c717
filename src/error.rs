use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("prefix tree is sealed, cannot insert {addr:#010x}")]
    TreeSealed { addr: u32 },

    #[error("pcap error: {0}")]
    Pcap(#[from] pcap::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SynthError>;
