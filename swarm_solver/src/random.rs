use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rand::rngs::StdRng;
use rand_core::{RngCore, SeedableRng};

/// Source of uniformly distributed doubles.
///
/// Every particle owns one of these, and the swarm owns one more for
/// swarm-level draws. Implementations are stateful and seeded once.
pub trait UniformRandom {
    /// A draw from `[0, 1)`.
    fn next(&mut self) -> f64;

    /// A draw from the half-open range between `lo` and `hi`.
    ///
    /// Computed as `lo + next() * (hi - lo)`, so `lo > hi` is allowed and
    /// yields values in `(hi, lo]`.
    fn between(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next() * (hi - lo)
    }
}

/// `UniformRandom` backed by a seeded `StdRng`.
#[derive(Clone, Debug)]
pub struct SeededUniform {
    rng: StdRng,
}

impl SeededUniform {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeds from the wall clock. Two generators created in the same
    /// nanosecond will share a stream, so prefer [`SeededUniform::from_seed`]
    /// whenever reproducibility matters.
    pub fn from_time() -> Self {
        Self::from_seed(time_seed())
    }

    /// Draws a fresh seed for a child generator.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

impl UniformRandom for SeededUniform {
    fn next(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = SeededUniform::from_seed(7);
        let mut b = SeededUniform::from_seed(7);
        for _ in 0..100 {
            assert_eq!(a.next().to_bits(), b.next().to_bits());
        }
    }

    #[test]
    fn test_next_in_unit_interval() {
        let mut rng = SeededUniform::from_seed(1);
        for _ in 0..10_000 {
            let x = rng.next();
            assert!((0.0..1.0).contains(&x), "draw {} outside [0, 1)", x);
        }
    }

    proptest! {
        #[test]
        fn prop_between_stays_in_range(
            seed in any::<u64>(),
            lo in -1.0e6_f64..1.0e6,
            width in 0.0_f64..1.0e6,
        ) {
            let hi = lo + width;
            let mut rng = SeededUniform::from_seed(seed);
            for _ in 0..32 {
                let x = rng.between(lo, hi);
                let slack = 1e-9 * (1.0 + lo.abs() + hi.abs());
                prop_assert!(
                    x >= lo - slack && x <= hi + slack,
                    "x={} outside [{}, {}]",
                    x,
                    lo,
                    hi
                );
            }
        }

        #[test]
        fn prop_between_symmetric_range_covers_negative_side(seed in any::<u64>()) {
            let mut rng = SeededUniform::from_seed(seed);
            let draws: Vec<f64> = (0..256).map(|_| rng.between(-10.0, 10.0)).collect();
            prop_assert!(draws.iter().any(|&x| x < 0.0));
            prop_assert!(draws.iter().all(|&x| (-10.0..=10.0).contains(&x)));
        }
    }
}
