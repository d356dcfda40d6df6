//! Deterministic replicate-level RNG and seed derivation.
//!
//! # Determinism strategy
//!
//! Every replicate owns one `SimRng`.  Replicate seeds are derived from the
//! master seed by:
//!
//!   seed = master_seed XOR ((replicate + 1) * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive replicate indices uniformly across the seed
//! space.  This means:
//!
//! - Replicates never share RNG state, so they can run on any worker.
//! - Adding replicates at the end of a batch does not disturb the seeds of
//!   existing ones.
//! - A `SeedTable` can also be supplied explicitly to reproduce a past batch.

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::distributions::{Distribution, Standard};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Draws for one replicate: travel times, sensor error and any other
/// stochastic choice made while the program runs.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        Standard: Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Uniform draw from `range` (half-open or inclusive).
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}

// ── SeedTable ─────────────────────────────────────────────────────────────────

/// Per-replicate seeds for a batch of independent runs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeedTable {
    seeds: Vec<u64>,
}

impl SeedTable {
    /// Derive `count` seeds from `master_seed`.
    pub fn derive(master_seed: u64, count: usize) -> Self {
        let seeds = (0..count as u64)
            .map(|i| master_seed ^ (i + 1).wrapping_mul(MIXING_CONSTANT))
            .collect();
        Self { seeds }
    }

    /// Use an explicit, pre-generated list (e.g. read back from a previous
    /// batch) for exact reproduction.
    pub fn from_seeds(seeds: Vec<u64>) -> Self {
        Self { seeds }
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Seed for replicate `index`, or `None` if out of range.
    pub fn seed(&self, index: usize) -> Option<u64> {
        self.seeds.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.seeds.iter().copied()
    }
}
