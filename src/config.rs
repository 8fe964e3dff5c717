//! Configuration for fitting and synthesis

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default inactivity gap separating bursts (seconds).
pub const DEFAULT_BURST_TIMEOUT: f64 = 0.01;

/// Target parameters of the on/off renewal process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeParameters {
    /// Pareto shape of on-durations
    pub a_on: f64,
    /// Pareto position of on-durations (seconds)
    pub m_on: f64,
    /// Pareto shape of off-durations
    pub a_off: f64,
    /// Pareto position of off-durations (seconds)
    pub m_off: f64,
    /// Length of the synthesized trace (seconds)
    pub total_duration: f64,
}

impl Default for TimeParameters {
    fn default() -> Self {
        Self {
            a_on: 1.2,
            m_on: 0.01,
            a_off: 1.1,
            m_off: 0.05,
            total_duration: 10.0,
        }
    }
}

/// Target spreads of the source and destination address cascades.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddrParameters {
    pub src_sigma: f64,
    pub dst_sigma: f64,
}

impl Default for AddrParameters {
    fn default() -> Self {
        Self {
            src_sigma: 1.0,
            dst_sigma: 1.0,
        }
    }
}

/// Top-level synthesis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthConfig {
    #[serde(default)]
    pub time: TimeParameters,

    #[serde(default)]
    pub addr: AddrParameters,

    /// Inactivity gap separating bursts during ingest (seconds)
    #[serde(default = "default_burst_timeout")]
    pub burst_timeout: f64,

    /// PRNG seed; a fixed seed reproduces the trace exactly
    #[serde(default)]
    pub seed: u64,
}

fn default_burst_timeout() -> f64 {
    DEFAULT_BURST_TIMEOUT
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            time: TimeParameters::default(),
            addr: AddrParameters::default(),
            burst_timeout: DEFAULT_BURST_TIMEOUT,
            seed: 0,
        }
    }
}

impl SynthConfig {
    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}
