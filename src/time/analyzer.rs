//! Burst structure of an observed trace
//!
//! Groups a packet stream into per-flow bursts with an inactivity timeout
//! and fits Pareto shapes to the resulting on/off duration samples.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::DEFAULT_BURST_TIMEOUT;
use crate::core::{Burst, FlowKey, Packet};
use crate::stats::RunningStats;

/// Per-flow burst grouping and on/off duration fitting.
///
/// Packets are assumed to arrive in non-decreasing time order within each
/// flow; that precondition is not guarded. Flows are held in an ordered map
/// so downstream consumers iterate them deterministically.
pub struct TimeAnalyzer {
    burst_timeout: f64,
    flows: BTreeMap<FlowKey, Vec<Burst>>,
}

impl Default for TimeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeAnalyzer {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_BURST_TIMEOUT)
    }

    /// Use a custom inactivity gap (seconds) for burst separation.
    pub fn with_timeout(burst_timeout: f64) -> Self {
        assert!(
            burst_timeout > 0.0,
            "burst timeout must be positive, got {burst_timeout}"
        );
        Self {
            burst_timeout,
            flows: BTreeMap::new(),
        }
    }

    pub fn burst_timeout(&self) -> f64 {
        self.burst_timeout
    }

    /// Append a packet to its flow, opening a new burst when the gap since
    /// the flow's last packet reaches the timeout.
    pub fn add(&mut self, key: FlowKey, pkt: Packet) {
        let bursts = self.flows.entry(key).or_default();
        match bursts.last_mut() {
            Some(last) if pkt.time - last.end_time < self.burst_timeout => last.push(pkt),
            _ => bursts.push(Burst::new(pkt)),
        }
    }

    /// Flows with their bursts, keyed and iterated in address order.
    pub fn flows(&self) -> &BTreeMap<FlowKey, Vec<Burst>> {
        &self.flows
    }

    pub fn n_flows(&self) -> usize {
        self.flows.len()
    }

    pub fn total_packets(&self) -> usize {
        self.flows
            .values()
            .flat_map(|bursts| bursts.iter())
            .map(|b| b.len())
            .sum()
    }

    /// First and last packet timestamps over the whole trace.
    pub fn time_span(&self) -> Option<(f64, f64)> {
        let first = self
            .flows
            .values()
            .filter_map(|b| b.first())
            .map(|b| b.start_time)
            .fold(f64::INFINITY, f64::min);
        let last = self
            .flows
            .values()
            .filter_map(|b| b.last())
            .map(|b| b.end_time)
            .fold(f64::NEG_INFINITY, f64::max);
        (first <= last).then_some((first, last))
    }

    /// Burst lengths of every flow.
    pub fn on_durations(&self) -> Vec<f64> {
        self.flows
            .values()
            .flat_map(|bursts| bursts.iter())
            .map(|b| b.duration())
            .collect()
    }

    /// Gaps between consecutive bursts of the same flow.
    pub fn off_durations(&self) -> Vec<f64> {
        self.flows
            .values()
            .flat_map(|bursts| bursts.windows(2))
            .map(|pair| pair[1].start_time - pair[0].end_time)
            .collect()
    }

    /// Maximum-likelihood Pareto shapes of the on and off duration samples.
    ///
    /// The position parameter is the burst timeout for both fits: on-durations
    /// below the timeout are definitionally impossible, and off-durations are
    /// at least the timeout by construction. Shorter samples are excluded. A
    /// set with no qualifying samples yields an infinite shape.
    pub fn pareto_fit(&self) -> (f64, f64) {
        let a_on = self.pareto_shape(&self.on_durations());
        let a_off = self.pareto_shape(&self.off_durations());
        debug!(a_on, a_off, "pareto fit");
        (a_on, a_off)
    }

    fn pareto_shape(&self, samples: &[f64]) -> f64 {
        let mut stats = RunningStats::new();
        for &x in samples.iter().filter(|&&x| x >= self.burst_timeout) {
            stats.update((x / self.burst_timeout).ln());
        }
        1.0 / stats.mean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> FlowKey {
        FlowKey::new(0x01010101, 0x02020202)
    }

    #[test]
    fn test_single_packet_flow() {
        let mut analyzer = TimeAnalyzer::new();
        analyzer.add(key(), Packet::at(100.0));

        let bursts = &analyzer.flows()[&key()];
        assert_eq!(bursts.len(), 1);
        assert_eq!(bursts[0].len(), 1);
        assert_eq!(bursts[0].start_time, 100.0);
        assert_eq!(bursts[0].end_time, 100.0);

        assert_eq!(analyzer.on_durations(), vec![0.0]);
        assert!(analyzer.off_durations().is_empty());

        // No on-duration reaches the timeout, so the fit degenerates.
        let (a_on, a_off) = analyzer.pareto_fit();
        assert!(!a_on.is_finite());
        assert!(!a_off.is_finite());
    }

    #[test]
    fn test_two_burst_flow() {
        let mut analyzer = TimeAnalyzer::with_timeout(0.01);
        for t in [0.000, 0.005, 0.020, 0.025] {
            analyzer.add(key(), Packet::at(t));
        }

        let bursts = &analyzer.flows()[&key()];
        assert_eq!(bursts.len(), 2);
        assert_eq!((bursts[0].start_time, bursts[0].end_time), (0.000, 0.005));
        assert_eq!((bursts[1].start_time, bursts[1].end_time), (0.020, 0.025));
        assert_eq!(bursts[0].len(), 2);
        assert_eq!(bursts[1].len(), 2);

        assert_eq!(analyzer.on_durations(), vec![0.005, 0.005]);
        let off = analyzer.off_durations();
        assert_eq!(off.len(), 1);
        assert!((off[0] - 0.015).abs() < 1e-12);
    }

    #[test]
    fn test_gap_exactly_at_timeout_splits() {
        let mut analyzer = TimeAnalyzer::with_timeout(0.01);
        analyzer.add(key(), Packet::at(0.0));
        analyzer.add(key(), Packet::at(0.01));
        assert_eq!(analyzer.flows()[&key()].len(), 2);
    }

    #[test]
    fn test_flows_kept_separate() {
        let mut analyzer = TimeAnalyzer::new();
        analyzer.add(FlowKey::new(1, 2), Packet::at(0.0));
        analyzer.add(FlowKey::new(3, 4), Packet::at(0.001));
        analyzer.add(FlowKey::new(1, 2), Packet::at(0.002));

        assert_eq!(analyzer.n_flows(), 2);
        assert_eq!(analyzer.total_packets(), 3);
        assert_eq!(analyzer.flows()[&FlowKey::new(1, 2)][0].len(), 2);
    }

    #[test]
    fn test_burst_separation_invariant() {
        let mut analyzer = TimeAnalyzer::with_timeout(0.01);
        let times = [0.0, 0.004, 0.02, 0.021, 0.05, 0.2, 0.201, 0.202];
        for t in times {
            analyzer.add(key(), Packet::at(t));
        }
        for bursts in analyzer.flows().values() {
            for pair in bursts.windows(2) {
                assert!(pair[1].start_time - pair[0].end_time >= 0.01);
            }
        }
    }

    #[test]
    fn test_pareto_fit_known_mean() {
        // All qualifying samples at x = m·e give mean(ln(x/m)) = 1, α = 1.
        // Each burst is built from sub-timeout steps so it stays one burst.
        let mut analyzer = TimeAnalyzer::with_timeout(0.01);
        let duration = 0.01 * std::f64::consts::E;
        let mut t = 0.0;
        for _ in 0..5 {
            for i in 0..=6 {
                analyzer.add(key(), Packet::at(t + i as f64 * duration / 6.0));
            }
            t += 10.0;
        }
        let (a_on, _) = analyzer.pareto_fit();
        assert!((a_on - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_span() {
        let mut analyzer = TimeAnalyzer::new();
        assert!(analyzer.time_span().is_none());
        analyzer.add(FlowKey::new(1, 2), Packet::at(5.0));
        analyzer.add(FlowKey::new(3, 4), Packet::at(2.0));
        assert_eq!(analyzer.time_span(), Some((2.0, 5.0)));
    }
}
