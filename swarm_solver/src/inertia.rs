use std::fmt::Debug;
use std::sync::Arc;

use crate::random::UniformRandom;

/// Per-particle scalar driven by the logistic map, used by chaotic inertia.
///
/// Starts uninitialized and is seeded from the particle's RNG on first use.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChaosState(Option<f64>);

impl ChaosState {
    pub fn value(&self) -> Option<f64> {
        self.0
    }

    /// Advances the logistic map `k' = 4k(1-k)` and stores the result.
    pub fn advance(&mut self, rng: &mut dyn UniformRandom) -> f64 {
        let k = match self.0 {
            Some(k) => k,
            None => rng.next(),
        };
        let next = 4.0 * k * (1.0 - k);
        self.0 = Some(next);
        next
    }
}

/// Everything an inertia strategy may look at when computing `w`.
pub struct InertiaContext<'a> {
    /// Configured iteration budget.
    pub iterations: u64,
    /// Current swarm epoch.
    pub epoch: u64,
    pub chaos: &'a mut ChaosState,
    pub rng: &'a mut dyn UniformRandom,
}

/// A strategy computing the inertia weight for one velocity update.
pub trait InertiaWeight: Debug + Send + Sync {
    fn weight(&self, ctx: &mut InertiaContext<'_>) -> f64;
}

/// Inertia-weight strategy, chosen once when the swarm parameters are built.
#[derive(Clone, Debug)]
pub enum Inertia {
    /// Always the given weight.
    Constant(f64),
    /// Decays linearly from `max` at epoch 0 to `min` at the last epoch.
    Linear { min: f64, max: f64 },
    /// Linear decay from `max - min` to zero, plus `min` scaled by a
    /// logistic-map term carried per particle.
    Chaotic { min: f64, max: f64 },
    Custom(Arc<dyn InertiaWeight>),
}

impl Default for Inertia {
    fn default() -> Self {
        Inertia::Constant(1.0)
    }
}

impl InertiaWeight for Inertia {
    fn weight(&self, ctx: &mut InertiaContext<'_>) -> f64 {
        let iterations = ctx.iterations as f64;
        let epoch = ctx.epoch as f64;
        match self {
            Inertia::Constant(c) => *c,
            Inertia::Linear { min, max } => max - ((max - min) / iterations) * epoch,
            Inertia::Chaotic { min, max } => {
                let k = ctx.chaos.advance(&mut *ctx.rng);
                ((max - min) * (iterations - epoch) / iterations) + min * k
            }
            Inertia::Custom(strategy) => strategy.weight(ctx),
        }
    }
}
