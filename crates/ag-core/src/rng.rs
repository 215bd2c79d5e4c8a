//! Deterministic run-level RNG.
//!
//! Randomness only enters a run at setup time (e.g. jittering initial cohort
//! weights).  Every draw comes from one `SimRng` seeded by `SimConfig::seed`,
//! consumed in tree pre-order, so the same seed and the same tree always
//! produce identical populations.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Simulation-level RNG for setup-time sampling.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// `value` shifted uniformly within `±spread`.  A non-positive or
    /// non-finite spread returns `value` untouched.
    pub fn jitter(&mut self, value: f64, spread: f64) -> f64 {
        if !(spread.is_finite() && spread > 0.0) {
            return value;
        }
        value + self.0.gen_range(-spread..=spread)
    }
}
