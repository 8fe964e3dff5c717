use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

use flowsynth::config::{AddrParameters, SynthConfig, TimeParameters};
use flowsynth::time::TimeAnalyzer;
use flowsynth::{ingest, output, PrefixTree, TraceGenerator};

#[derive(Parser)]
#[command(name = "flowsynth")]
#[command(author, version, about = "statistical modeling and synthesis of packet traces")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fit the time and address models to an observed trace
    Fit {
        /// Input pcap file
        pcap: PathBuf,

        /// Burst inactivity timeout in seconds (overrides config)
        #[arg(short, long)]
        timeout: Option<f64>,
    },

    /// Synthesize a trace matching the configured targets
    Synth {
        /// Input pcap file providing the observed flows
        pcap: PathBuf,

        /// Output CSV path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// PRNG seed (overrides config; fixed seed reproduces the trace)
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

/// Fitted parameters as printed by `fit`.
#[derive(Serialize)]
struct FitReport {
    flows: usize,
    packets: usize,
    time: TimeParameters,
    addr: AddrParameters,
}

pub fn run_command(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => SynthConfig::load(path)?,
        None => SynthConfig::default(),
    };

    match cli.command {
        Commands::Fit { pcap, timeout } => {
            run_fit(&pcap, timeout.unwrap_or(config.burst_timeout))
        }
        Commands::Synth { pcap, output, seed } => {
            run_synth(&pcap, output.as_deref(), seed.unwrap_or(config.seed), &config)
        }
    }
}

fn run_fit(pcap: &std::path::Path, burst_timeout: f64) -> Result<()> {
    let analyzer = ingest_trace(pcap, burst_timeout)?;
    let (a_on, a_off) = analyzer.pareto_fit();

    let mut src_tree = PrefixTree::new();
    let mut dst_tree = PrefixTree::new();
    for key in analyzer.flows().keys() {
        src_tree.add(key.saddr, 1.0)?;
        dst_tree.add(key.daddr, 1.0)?;
    }

    let total_duration = analyzer
        .time_span()
        .map(|(first, last)| last - first)
        .unwrap_or(0.0);

    let report = FitReport {
        flows: analyzer.n_flows(),
        packets: analyzer.total_packets(),
        time: TimeParameters {
            a_on,
            m_on: burst_timeout,
            a_off,
            m_off: burst_timeout,
            total_duration,
        },
        addr: AddrParameters {
            src_sigma: src_tree.fit_logit_normal(),
            dst_sigma: dst_tree.fit_logit_normal(),
        },
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_synth(
    pcap: &std::path::Path,
    out_path: Option<&std::path::Path>,
    seed: u64,
    config: &SynthConfig,
) -> Result<()> {
    let analyzer = ingest_trace(pcap, config.burst_timeout)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut gen = TraceGenerator::new(&analyzer, &config.time, &config.addr, &mut rng);
    let stream = std::iter::from_fn(move || gen.next_packet());

    match out_path {
        Some(path) => {
            output::write_csv_file(path, stream)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("trace written to {}", path.display());
        }
        None => output::write_csv(std::io::stdout().lock(), stream)?,
    }
    Ok(())
}

fn ingest_trace(pcap: &std::path::Path, burst_timeout: f64) -> Result<TimeAnalyzer> {
    let packets = ingest::read_packets(pcap)
        .with_context(|| format!("failed to read {}", pcap.display()))?;

    let mut analyzer = TimeAnalyzer::with_timeout(burst_timeout);
    for (key, pkt) in packets {
        analyzer.add(key, pkt);
    }
    info!(
        flows = analyzer.n_flows(),
        packets = analyzer.total_packets(),
        "trace ingested"
    );
    Ok(analyzer)
}
