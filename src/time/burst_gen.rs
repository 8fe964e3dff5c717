//! Pareto on/off renewal schedule generation
//!
//! Produces per-window burst schedules that are all windows of one shared,
//! continuous on/off renewal process: on- and off-periods are Pareto
//! distributed, a period crossing a window boundary spills into the next
//! window, and each window distributes an exact packet budget over its
//! bursts by duration-weighted sampling.

use rand::distr::weighted::WeightedIndex;
use rand::Rng;
use rand_distr::{Distribution, Pareto};

use crate::config::TimeParameters;

/// One scheduled burst within a window, relative to the window start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstTimes {
    pub start_time: f64,
    pub end_time: f64,
    /// Packets allotted to this burst
    pub pkts: u64,
}

impl BurstTimes {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Generates successive `total_duration`-long windows of a Pareto on/off
/// renewal process.
pub struct BurstGenerator {
    on_dist: Pareto<f64>,
    off_dist: Pareto<f64>,
    total_duration: f64,
    first_time: bool,
    start_on: bool,
    start_offset: f64,
}

impl BurstGenerator {
    /// Build a generator for the given renewal parameters.
    ///
    /// Panics when any shape or position parameter is non-positive or the
    /// off-position does not fit inside the window; these are construction
    /// contract violations, not runtime conditions.
    pub fn new(params: &TimeParameters) -> Self {
        assert!(params.a_on > 0.0, "on shape must be positive");
        assert!(params.m_on > 0.0, "on position must be positive");
        assert!(params.a_off > 0.0, "off shape must be positive");
        assert!(params.m_off > 0.0, "off position must be positive");
        assert!(
            params.m_off < params.total_duration,
            "off position {} must be below the window length {}",
            params.m_off,
            params.total_duration
        );

        Self {
            on_dist: Pareto::new(params.m_on, params.a_on).expect("validated parameters"),
            off_dist: Pareto::new(params.m_off, params.a_off).expect("validated parameters"),
            total_duration: params.total_duration,
            first_time: true,
            start_on: false,
            start_offset: 0.0,
        }
    }

    /// Produce the next window's bursts with exactly `num_pkts` packets.
    ///
    /// Timestamps are relative to the window start and lie within
    /// `[0, total_duration]`; bursts are time-ordered, every returned burst
    /// carries at least one packet, and the counts sum to `num_pkts`.
    pub fn next<R: Rng>(&mut self, rng: &mut R, num_pkts: u64) -> Vec<BurstTimes> {
        if self.first_time {
            let off: f64 = self.off_dist.sample(rng);
            self.start_offset = off % self.total_duration;
            self.first_time = false;
        }

        let mut bursts = Vec::new();
        let mut resume = self.start_on;
        let mut cur = if self.start_on { 0.0 } else { self.start_offset };
        loop {
            // A burst clipped by the previous window boundary resumes with
            // its remaining on-time instead of a fresh draw.
            let on: f64 = if resume {
                resume = false;
                self.start_offset
            } else {
                self.on_dist.sample(rng)
            };
            let off: f64 = self.off_dist.sample(rng);

            if cur + on > self.total_duration {
                bursts.push(BurstTimes {
                    start_time: cur,
                    end_time: self.total_duration,
                    pkts: 0,
                });
                self.start_on = true;
                self.start_offset = (cur + on) % self.total_duration;
                break;
            }

            bursts.push(BurstTimes {
                start_time: cur,
                end_time: cur + on,
                pkts: 0,
            });
            cur += on + off;
            if cur >= self.total_duration {
                self.start_on = false;
                self.start_offset = cur % self.total_duration;
                break;
            }
        }

        self.distribute(rng, &mut bursts, num_pkts);
        bursts.retain(|b| b.pkts > 0);
        bursts
    }

    /// Spread `num_pkts` over the window's bursts, one packet at a time,
    /// picking each burst with probability proportional to its duration.
    fn distribute<R: Rng>(&self, rng: &mut R, bursts: &mut [BurstTimes], num_pkts: u64) {
        let weights: Vec<f64> = bursts.iter().map(|b| b.duration()).collect();
        match WeightedIndex::new(&weights) {
            Ok(by_duration) => {
                for _ in 0..num_pkts {
                    bursts[by_duration.sample(rng)].pkts += 1;
                }
            }
            // Only reachable when the window holds a single zero-length
            // resumed burst; everything lands there.
            Err(_) => bursts[0].pkts = num_pkts,
        }
    }
}
