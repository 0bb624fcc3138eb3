use std::{cell::RefCell, rc::Rc};

use nalgebra::DVector;

use crate::swarm::TerminationReason;

/// Hooks invoked by a running swarm. Every hook is a no-op by default.
pub trait SwarmListener {
    /// Called exactly once, when the run terminates.
    fn results(
        &mut self,
        _epoch: u64,
        _best_fitness: f64,
        _best_position: &DVector<f64>,
        _reason: TerminationReason,
    ) {
    }

    /// Called whenever any particle improves its own best.
    fn local_best(&mut self, _epoch: u64, _fitness: f64, _position: &DVector<f64>) {}

    /// Called whenever the swarm-wide best improves.
    fn global_best(&mut self, _epoch: u64, _fitness: f64, _position: &DVector<f64>) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopListener;

impl SwarmListener for NoopListener {}

/// Prints the final result as text lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleListener;

impl SwarmListener for ConsoleListener {
    fn results(
        &mut self,
        epoch: u64,
        best_fitness: f64,
        best_position: &DVector<f64>,
        reason: TerminationReason,
    ) {
        println!("\n------- swarm results -------");
        println!("Best fitness: {:.6e}", best_fitness);
        for (i, x) in best_position.iter().enumerate() {
            println!("  x[{}] = {}", i, x);
        }
        println!("Epoch: {}", epoch);
        println!("Termination reason: {:?}", reason);
    }
}

/// Everything a [`HistoryListener`] has observed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunHistory {
    /// `(epoch, fitness)` of every global-best improvement, in order.
    pub global_bests: Vec<(u64, f64)>,
    /// Number of personal-best improvements reported.
    pub local_bests: usize,
    /// Set once the run reports its results.
    pub results: Option<(u64, f64, Vec<f64>, TerminationReason)>,
    /// Number of times `results` was invoked.
    pub results_calls: usize,
}

/// Records listener events behind a shared handle, so a clone kept by the
/// caller can read them after the swarm has been consumed.
#[derive(Clone, Debug, Default)]
pub struct HistoryListener {
    history: Rc<RefCell<RunHistory>>,
}

impl HistoryListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> RunHistory {
        self.history.borrow().clone()
    }

    pub fn global_best_history(&self) -> Vec<f64> {
        self.history
            .borrow()
            .global_bests
            .iter()
            .map(|&(_, fitness)| fitness)
            .collect()
    }
}

impl SwarmListener for HistoryListener {
    fn results(
        &mut self,
        epoch: u64,
        best_fitness: f64,
        best_position: &DVector<f64>,
        reason: TerminationReason,
    ) {
        let mut history = self.history.borrow_mut();
        history.results = Some((
            epoch,
            best_fitness,
            best_position.as_slice().to_vec(),
            reason,
        ));
        history.results_calls += 1;
    }

    fn local_best(&mut self, _epoch: u64, _fitness: f64, _position: &DVector<f64>) {
        self.history.borrow_mut().local_bests += 1;
    }

    fn global_best(&mut self, epoch: u64, fitness: f64, _position: &DVector<f64>) {
        self.history.borrow_mut().global_bests.push((epoch, fitness));
    }
}
