use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use nalgebra::DVector;
use tracing::{debug, info, trace};

use crate::error::SwarmError;
use crate::fitness::FitnessFunction;
use crate::listener::SwarmListener;
use crate::params::{StagnationPolicy, SwarmParams};
use crate::particle::{Particle, ScatterCounts, SwarmFeedback};
use crate::random::{SeededUniform, UniformRandom};

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    /// The global best reached the configured target.
    Target,
    /// Too many epochs passed without a global improvement.
    Stagnation,
    /// The iteration budget ran out.
    Iterations,
    /// The cancel flag was raised between sweeps.
    Cancelled,
    /// Still running.
    Unknown,
}

/// Final state of a run, as also reported to the listener.
#[derive(Clone, Debug, PartialEq)]
pub struct SwarmOutcome {
    pub epoch: u64,
    pub best_fitness: f64,
    pub best_position: DVector<f64>,
    pub reason: TerminationReason,
}

/// Global-best state shared by all particles of one swarm.
struct SwarmBoard<L> {
    g: DVector<f64>,
    gbest: f64,
    epoch: u64,
    stagnation: u64,
    improved: bool,
    listener: L,
}

impl<L: SwarmListener> SwarmFeedback for SwarmBoard<L> {
    fn epoch(&self) -> u64 {
        self.epoch
    }

    fn global_best_position(&self) -> &DVector<f64> {
        &self.g
    }

    fn update(&mut self, position: &DVector<f64>, fitness: f64) {
        self.listener.local_best(self.epoch, fitness, position);
        if fitness < self.gbest {
            self.g.copy_from(position);
            self.gbest = fitness;
            self.improved = true;
            trace!(epoch = self.epoch, fitness, "new global best");
            self.listener.global_best(self.epoch, fitness, &self.g);
        }
    }
}

/// A particle population plus its global best and the search loop.
///
/// A swarm is good for exactly one run: [`Swarm::solve`] consumes it.
pub struct Swarm<F, L, R = SeededUniform> {
    params: SwarmParams,
    fitness: F,
    board: SwarmBoard<L>,
    particles: Vec<Particle<R>>,
    rng: R,
    reason: TerminationReason,
    cancel: Option<Arc<AtomicBool>>,
}

impl<F, L> Swarm<F, L, SeededUniform>
where
    F: FitnessFunction,
    L: SwarmListener,
{
    /// Builds and randomizes a swarm seeded from the clock.
    pub fn new(params: SwarmParams, listener: L, fitness: F) -> Result<Self, SwarmError> {
        Self::from_master(params, listener, fitness, SeededUniform::from_time())
    }

    /// Builds and randomizes a swarm whose every RNG derives from `seed`.
    pub fn with_seed(
        params: SwarmParams,
        listener: L,
        fitness: F,
        seed: u64,
    ) -> Result<Self, SwarmError> {
        Self::from_master(params, listener, fitness, SeededUniform::from_seed(seed))
    }

    /// Seeds one generator per particle from `master`, which then serves as
    /// the swarm-level generator.
    fn from_master(
        params: SwarmParams,
        listener: L,
        fitness: F,
        mut master: SeededUniform,
    ) -> Result<Self, SwarmError> {
        let particle_rngs = (0..params.particles())
            .map(|_| SeededUniform::from_seed(master.next_seed()))
            .collect();
        Self::with_rngs(params, listener, fitness, particle_rngs, master)
    }
}

impl<F, L, R> Swarm<F, L, R>
where
    F: FitnessFunction,
    L: SwarmListener,
    R: UniformRandom,
{
    /// Builds and randomizes a swarm from caller-supplied generators: one per
    /// particle, in population order, plus one for swarm-level draws.
    pub fn with_rngs(
        params: SwarmParams,
        listener: L,
        fitness: F,
        particle_rngs: Vec<R>,
        swarm_rng: R,
    ) -> Result<Self, SwarmError> {
        if particle_rngs.len() != params.particles() {
            return Err(SwarmError::RngCountMismatch {
                expected: params.particles(),
                got: particle_rngs.len(),
            });
        }

        let mut board = SwarmBoard {
            g: DVector::zeros(params.dims()),
            gbest: f64::MAX,
            epoch: 0,
            stagnation: 0,
            improved: false,
            listener,
        };

        let mut particles: Vec<Particle<R>> = particle_rngs
            .into_iter()
            .map(|rng| Particle::new(&params, rng))
            .collect();
        for particle in particles.iter_mut() {
            particle.randomize(&fitness, &mut board);
        }
        // The initial evaluation is not a counted epoch.
        board.improved = false;

        debug!(
            dims = params.dims(),
            particles = params.particles(),
            fitness = %tynm::type_name::<F>(),
            gbest = board.gbest,
            "swarm initialized"
        );

        Ok(Self {
            params,
            fitness,
            board,
            particles,
            rng: swarm_rng,
            reason: TerminationReason::Unknown,
            cancel: None,
        })
    }

    /// Checks `flag` before every sweep of [`Swarm::solve`]; once it is set
    /// the run ends with [`TerminationReason::Cancelled`].
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn params(&self) -> &SwarmParams {
        &self.params
    }

    pub fn particles(&self) -> &[Particle<R>] {
        &self.particles
    }

    /// Completed sweeps.
    pub fn epoch(&self) -> u64 {
        self.board.epoch
    }

    /// Sweeps since the last global improvement.
    pub fn stagnation(&self) -> u64 {
        self.board.stagnation
    }

    pub fn best_fitness(&self) -> f64 {
        self.board.gbest
    }

    pub fn best_position(&self) -> &DVector<f64> {
        &self.board.g
    }

    pub fn reason(&self) -> TerminationReason {
        self.reason
    }

    pub fn is_terminated(&self) -> bool {
        self.reason != TerminationReason::Unknown
    }

    pub fn scatter_counts(&self) -> ScatterCounts {
        let mut counts = ScatterCounts::default();
        for particle in &self.particles {
            counts += particle.scatter_counts();
        }
        counts
    }

    /// Steps every particle once, in population order, then updates the
    /// counters and evaluates the stopping conditions.
    ///
    /// Returns the termination reason once the run has ended.
    pub fn sweep(&mut self) -> Option<TerminationReason> {
        if self.is_terminated() {
            return Some(self.reason);
        }

        for particle in self.particles.iter_mut() {
            particle.epoch(&self.params, &self.fitness, &mut self.board);
        }

        if !self.board.improved {
            self.board.stagnation += 1;
        }
        self.board.epoch += 1;
        self.board.improved = false;

        match self.stop_condition() {
            Some(TerminationReason::Stagnation) => match self.params.stagnation_policy() {
                StagnationPolicy::Terminate => self.terminate(TerminationReason::Stagnation),
                StagnationPolicy::Rerandomize { probability } => {
                    self.rerandomize(probability);
                    None
                }
            },
            Some(reason) => self.terminate(reason),
            None => None,
        }
    }

    /// Runs sweeps until a stopping condition fires, reports the result to the
    /// listener and returns it.
    pub fn solve(mut self) -> SwarmOutcome {
        loop {
            if self
                .cancel
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
            {
                self.terminate(TerminationReason::Cancelled);
                break;
            }
            if self.sweep().is_some() {
                break;
            }
        }

        info!(
            epoch = self.board.epoch,
            gbest = self.board.gbest,
            reason = ?self.reason,
            "swarm finished"
        );
        self.board.listener.results(
            self.board.epoch,
            self.board.gbest,
            &self.board.g,
            self.reason,
        );

        SwarmOutcome {
            epoch: self.board.epoch,
            best_fitness: self.board.gbest,
            best_position: self.board.g,
            reason: self.reason,
        }
    }

    /// First matching condition wins: target, then iterations, then stagnation.
    fn stop_condition(&self) -> Option<TerminationReason> {
        if self.board.gbest <= self.params.target() {
            Some(TerminationReason::Target)
        } else if self.board.epoch >= self.params.iterations() {
            Some(TerminationReason::Iterations)
        } else if self.board.stagnation >= self.params.stagnation() {
            Some(TerminationReason::Stagnation)
        } else {
            None
        }
    }

    fn terminate(&mut self, reason: TerminationReason) -> Option<TerminationReason> {
        debug!(epoch = self.board.epoch, ?reason, "termination condition met");
        self.reason = reason;
        Some(reason)
    }

    fn rerandomize(&mut self, probability: f64) {
        let mut count = 0usize;
        for particle in self.particles.iter_mut() {
            if self.rng.next() < probability {
                particle.randomize(&self.fitness, &mut self.board);
                count += 1;
            }
        }
        debug!(epoch = self.board.epoch, count, "stagnated; re-randomized particles");
        self.board.stagnation = 0;
        self.board.improved = false;
    }
}
