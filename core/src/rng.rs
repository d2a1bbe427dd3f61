//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through a RandomSource injected into the
//! engine at construction. This means:
//!   - Two engines built with the same seed replay identically.
//!   - Tests can script exact draw sequences with FixedSource.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use std::collections::VecDeque;

/// The single randomness capability the simulation needs: uniform draws.
/// Every stochastic formula (consumption variance, emergency events,
/// need surges, population drift, road flips) is expressed through it.
pub trait RandomSource: Send {
    /// Draw a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64;

    /// Draw uniformly from [lo, hi).
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Bernoulli trial: returns true with probability p.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Production source: PCG stream seeded from a single master seed.
pub struct PcgSource {
    inner: Pcg64Mcg,
}

impl PcgSource {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }
}

impl RandomSource for PcgSource {
    fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Scripted source for tests and replay tooling: returns the queued unit
/// draws in order, then falls back to 0.5 (the midpoint of every uniform
/// range, i.e. "no variance, no event") once exhausted.
pub struct FixedSource {
    draws: VecDeque<f64>,
}

impl FixedSource {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    /// A source that always answers 0.5.
    pub fn midpoint() -> Self {
        Self::new([])
    }
}

impl RandomSource for FixedSource {
    fn next_f64(&mut self) -> f64 {
        self.draws.pop_front().unwrap_or(0.5)
    }
}
