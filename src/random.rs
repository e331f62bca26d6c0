// The single source of randomness for one generation session
//
// Everything random in the pipeline (grid jitter, optional corner shuffling,
// per-triangle colours) draws from one `RandomSource`. Giving it a seed makes
// a whole piece reproducible.

use crate::geometry::Color;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Uniform integer sampling backed by `StdRng`
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Seed from the operating system's entropy source
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic source: the same seed always yields the same art
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when a seed is given, entropy otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Uniform integer in the closed range `[min, max]`
    ///
    /// A reversed range collapses to `min`, so callers clamping both ends of
    /// a window never have to special-case an empty one.
    pub fn int_in(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// Random RGB colour, each channel uniform in `[0, 255]`
    pub fn color(&mut self) -> Color {
        Color::rgb(
            self.int_in(0, 255) as u8,
            self.int_in(0, 255) as u8,
            self.int_in(0, 255) as u8,
        )
    }

    /// Shuffle a slice in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}
