//! Block-access workloads for ARC benchmarks.
//!
//! Every stream is seeded, so two runs with the same [`WorkloadSpec`] replay
//! the same blocks in the same order.

use arcsim::traits::BlockCache;
use arcsim::types::{BlockId, OpKind};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy)]
pub enum Workload {
    /// Uniform random blocks in `[0, universe)`.
    Uniform,
    /// Hot/cold split with a configurable hot fraction and hot access probability.
    Hotset { hot_fraction: f64, hot_prob: f64 },
    /// Sequential scan in `[0, universe)`.
    Scan,
    /// Hotset traffic interrupted by a one-pass scan every `period` accesses.
    ScanPollution { period: u64, scan_len: u64 },
    /// Zipfian distribution; `theta` 0.0 = uniform, 0.99 = YCSB default skew.
    Zipfian { theta: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct WorkloadSpec {
    pub universe: u64,
    pub workload: Workload,
    /// Share of accesses issued as reads.
    pub read_fraction: f64,
    pub seed: u64,
}

impl WorkloadSpec {
    pub fn generator(self) -> WorkloadGenerator {
        WorkloadGenerator::new(self)
    }

    /// Materializes `len` accesses up front so generation stays out of timings.
    pub fn trace(self, len: usize) -> Vec<(BlockId, OpKind)> {
        let mut generator = self.generator();
        (0..len).map(|_| generator.next_access()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    spec: WorkloadSpec,
    rng: SmallRng,
    issued: u64,
    scan_pos: u64,
    zipfian: Option<ZipfianState>,
}

impl WorkloadGenerator {
    fn new(spec: WorkloadSpec) -> Self {
        let spec = WorkloadSpec {
            universe: spec.universe.max(1),
            ..spec
        };
        let zipfian = match spec.workload {
            Workload::Zipfian { theta } => Some(ZipfianState::new(spec.universe, theta)),
            _ => None,
        };
        Self {
            spec,
            rng: SmallRng::seed_from_u64(spec.seed),
            issued: 0,
            scan_pos: 0,
            zipfian,
        }
    }

    pub fn next_access(&mut self) -> (BlockId, OpKind) {
        let block = BlockId::new(self.next_block());
        let op = if self.rng.gen_bool(self.spec.read_fraction.clamp(0.0, 1.0)) {
            OpKind::Read
        } else {
            OpKind::Write
        };
        self.issued += 1;
        (block, op)
    }

    fn next_block(&mut self) -> u64 {
        let universe = self.spec.universe;
        match self.spec.workload {
            Workload::Uniform => self.rng.gen_range(0..universe),
            Workload::Hotset {
                hot_fraction,
                hot_prob,
            } => self.hotset(hot_fraction, hot_prob),
            Workload::Scan => self.scan(),
            Workload::ScanPollution { period, scan_len } => {
                if self.issued % period.max(1) < scan_len {
                    // Scan blocks live above the hotset universe.
                    universe + self.scan()
                } else {
                    self.hotset(0.1, 0.9)
                }
            },
            Workload::Zipfian { .. } => {
                let u: f64 = self.rng.r#gen();
                self.zipfian.as_ref().map_or(0, |zipf| zipf.sample(u))
            },
        }
    }

    fn hotset(&mut self, hot_fraction: f64, hot_prob: f64) -> u64 {
        let universe = self.spec.universe;
        let hot_size = ((universe as f64) * hot_fraction.clamp(0.0, 1.0)).round() as u64;
        let hot_size = hot_size.clamp(1, universe);
        if self.rng.gen_bool(hot_prob.clamp(0.0, 1.0)) || hot_size == universe {
            self.rng.gen_range(0..hot_size)
        } else {
            self.rng.gen_range(hot_size..universe)
        }
    }

    fn scan(&mut self) -> u64 {
        let block = self.scan_pos;
        self.scan_pos = (self.scan_pos + 1) % self.spec.universe;
        block
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HitRate {
    pub hits: u64,
    pub misses: u64,
}

impl HitRate {
    pub fn hit_rate(self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Runs a trace and counts resident hits; ghost hits score as misses.
pub fn run_hit_rate<C: BlockCache>(cache: &mut C, trace: &[(BlockId, OpKind)]) -> HitRate {
    let mut rate = HitRate::default();
    for &(block, op) in trace {
        match cache.access(block, op) {
            Ok(hit) if hit.is_resident_hit() => rate.hits += 1,
            _ => rate.misses += 1,
        }
    }
    rate
}

/// YCSB-style Zipfian sampler over `[0, n)` using inverse CDF.
#[derive(Debug, Clone)]
struct ZipfianState {
    n: u64,
    theta: f64,
    zeta_n: f64,
    alpha: f64,
    eta: f64,
}

impl ZipfianState {
    fn new(n: u64, theta: f64) -> Self {
        let theta = theta.clamp(0.0, 0.9999);
        let zeta_2 = Self::zeta(2, theta);
        let zeta_n = Self::zeta(n, theta);
        let alpha = 1.0 / (1.0 - theta);
        let eta = (1.0 - (2.0 / n as f64).powf(1.0 - theta)) / (1.0 - zeta_2 / zeta_n);
        Self {
            n,
            theta,
            zeta_n,
            alpha,
            eta,
        }
    }

    fn zeta(n: u64, theta: f64) -> f64 {
        (1..=n).map(|i| 1.0 / (i as f64).powf(theta)).sum()
    }

    fn sample(&self, u: f64) -> u64 {
        let uz = u * self.zeta_n;
        if uz < 1.0 {
            return 0;
        }
        if uz < 1.0 + 0.5_f64.powf(self.theta) {
            return 1;
        }
        let spread = (self.n as f64) * (self.eta * u - self.eta + 1.0).powf(self.alpha);
        (spread as u64).min(self.n - 1)
    }
}
