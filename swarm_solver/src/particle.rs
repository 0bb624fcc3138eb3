use std::ops::AddAssign;

use nalgebra::DVector;
use tracing::trace;

use crate::fitness::{FitnessFunction, evaluate};
use crate::inertia::{ChaosState, InertiaContext, InertiaWeight};
use crate::params::SwarmParams;
use crate::random::UniformRandom;
use crate::rounding::round_half_up;

/// The swarm as seen from one of its particles.
pub trait SwarmFeedback {
    /// Current swarm epoch.
    fn epoch(&self) -> u64;

    /// Swarm-wide best position, read at call time.
    fn global_best_position(&self) -> &DVector<f64>;

    /// Reports a personal-best improvement.
    fn update(&mut self, position: &DVector<f64>, fitness: f64);
}

/// How often each dissipative scatter fired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScatterCounts {
    pub velocity: u64,
    pub location: u64,
}

impl ScatterCounts {
    pub fn total(&self) -> u64 {
        self.velocity + self.location
    }
}

impl AddAssign for ScatterCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.velocity += rhs.velocity;
        self.location += rhs.location;
    }
}

/// A candidate solution with its own velocity, personal-best memory and RNG.
#[derive(Clone, Debug)]
pub struct Particle<R> {
    x: DVector<f64>,
    p: DVector<f64>,
    v: DVector<f64>,
    best: Option<f64>,
    // Bounds are copied out of the params so a particle never observes
    // later changes to them.
    vmax: DVector<f64>,
    max: DVector<f64>,
    min: DVector<f64>,
    rng: R,
    chaos: ChaosState,
    scatter: ScatterCounts,
}

impl<R: UniformRandom> Particle<R> {
    /// Creates a particle at the origin with no personal best. Call
    /// [`Particle::randomize`] before stepping it.
    pub fn new(params: &SwarmParams, rng: R) -> Self {
        let dims = params.dims();
        Self {
            x: DVector::zeros(dims),
            p: DVector::zeros(dims),
            v: DVector::zeros(dims),
            best: None,
            vmax: params.vmax().clone(),
            max: params.max().clone(),
            min: params.min().clone(),
            rng,
            chaos: ChaosState::default(),
            scatter: ScatterCounts::default(),
        }
    }

    pub fn position(&self) -> &DVector<f64> {
        &self.x
    }

    pub fn velocity(&self) -> &DVector<f64> {
        &self.v
    }

    pub fn best_position(&self) -> &DVector<f64> {
        &self.p
    }

    /// Personal-best fitness, `None` until the first evaluation.
    pub fn best_fitness(&self) -> Option<f64> {
        self.best
    }

    pub fn vmax(&self) -> &DVector<f64> {
        &self.vmax
    }

    pub fn chaos(&self) -> ChaosState {
        self.chaos
    }

    pub fn scatter_counts(&self) -> ScatterCounts {
        self.scatter
    }

    /// Places the particle uniformly inside the bounds with a random
    /// velocity in `[-vmax, vmax]`, evaluates it and reports the result as
    /// its personal best.
    pub fn randomize<F, S>(&mut self, fitness: &F, swarm: &mut S)
    where
        F: FitnessFunction + ?Sized,
        S: SwarmFeedback + ?Sized,
    {
        for i in 0..self.x.len() {
            self.x[i] = self.rng.between(self.min[i], self.max[i]);
            self.p[i] = self.x[i];
            self.v[i] = 2.0 * self.vmax[i] * (self.rng.next() - 0.5);
        }
        let best = evaluate(fitness, &self.p);
        self.best = Some(best);
        swarm.update(&self.x, best);
    }

    /// Advances the particle one step and reports a personal-best
    /// improvement to the swarm.
    pub fn epoch<F, S>(&mut self, params: &SwarmParams, fitness: &F, swarm: &mut S)
    where
        F: FitnessFunction + ?Sized,
        S: SwarmFeedback + ?Sized,
    {
        for i in 0..self.x.len() {
            let rp = self.rng.next();
            let rg = self.rng.next();

            let w = params.inertia().weight(&mut InertiaContext {
                iterations: params.iterations(),
                epoch: swarm.epoch(),
                chaos: &mut self.chaos,
                rng: &mut self.rng,
            });

            // g is read per dimension; earlier particles in this sweep may
            // already have moved it.
            let g = swarm.global_best_position()[i];
            let x = self.x[i];
            let vmax = self.vmax[i];

            let mut v = w * self.v[i]
                + params.c1() * rp * (self.p[i] - x)
                + params.c2() * rg * (g - x);
            v = v.clamp(-vmax, vmax);

            if let Some(cv) = params.cv() {
                if self.rng.next() < cv {
                    v = self.rng.next() * vmax;
                    self.scatter.velocity += 1;
                    trace!(dim = i, v, "velocity scatter");
                }
            }

            let mut next_x = x + v;
            if let Some(cl) = params.cl() {
                if self.rng.next() < cl {
                    next_x = self.rng.between(-self.max[i], self.max[i]);
                    self.scatter.location += 1;
                    trace!(dim = i, x = next_x, "location scatter");
                }
            }

            if let Some(digits) = params.precision() {
                next_x = round_half_up(next_x, digits);
            }

            self.x[i] = next_x;
            self.v[i] = v;
        }

        let fit = evaluate(fitness, &self.x);
        if self.best.is_none_or(|best| fit < best) {
            self.p.copy_from(&self.x);
            self.best = Some(fit);
            swarm.update(&self.x, fit);
        }
    }
}
