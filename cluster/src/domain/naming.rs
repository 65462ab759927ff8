//! Random app names.
//!
//! Each generator owns its RNG. There is no process-wide randomness, so two
//! clusters in parallel tests never share a sequence, and a seeded generator
//! reproduces the same names run after run.

use std::path::Path;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Length of the random suffix appended to every app name.
pub const SUFFIX_LEN: usize = 20;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

#[derive(Debug)]
pub struct NameGenerator {
    seed: u64,
    rng: SmallRng,
}

impl NameGenerator {
    /// Create a generator whose sequence is fully determined by `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Create a generator with a fresh random seed.
    ///
    /// The seed is available through [`NameGenerator::seed`] so a failing
    /// run can be replayed.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// `n` lowercase ASCII letters.
    pub fn suffix(&mut self, n: usize) -> String {
        (0..n)
            .map(|_| char::from(LETTERS[self.rng.gen_range(0..LETTERS.len())]))
            .collect()
    }

    /// `<basename of fixture>-<SUFFIX_LEN letters>`.
    pub fn app_name(&mut self, fixture: &Path) -> String {
        let base = fixture
            .file_name()
            .map_or_else(|| "app".to_string(), |b| b.to_string_lossy().into_owned());
        format!("{base}-{}", self.suffix(SUFFIX_LEN))
    }
}
