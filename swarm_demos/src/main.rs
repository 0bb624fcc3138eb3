use anyhow::Result;
use swarm_demos::prelude::*;
use swarm_solver::prelude::{nalgebra::DVector, *};
use tracing::info;

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    info!("sphere on an integer grid");
    let outcome = Swarm::new(sphere_params()?, ConsoleListener, Infallible(sphere))?.solve();
    info!(reason = ?outcome.reason, "sphere done");

    info!("booth");
    Swarm::new(booth_params()?, ConsoleListener, Infallible(booth))?.solve();

    info!("rastrigin, 4 dims, with dissipative scatter");
    Swarm::new(rastrigin_params(4)?, ConsoleListener, Infallible(rastrigin))?.solve();

    info!("rosenbrock, 3 dims, re-randomizing on stagnation");
    let history = HistoryListener::new();
    let outcome = Swarm::new(rosenbrock_params(3)?, history.clone(), Infallible(rosenbrock))?
        .solve();
    println!(
        "Rosenbrock: best {:.6e} at {:?} after {} epochs ({:?}), {} global improvements",
        outcome.best_fitness,
        outcome.best_position.as_slice(),
        outcome.epoch,
        outcome.reason,
        history.global_best_history().len()
    );

    info!("table lookup with out-of-range points");
    let lookup = LookupCost::bowl(32, 7, 21);
    let cost = |p: &DVector<f64>| lookup.cost(p);
    Swarm::new(lookup_params(&lookup)?, ConsoleListener, cost)?.solve();

    Ok(())
}
