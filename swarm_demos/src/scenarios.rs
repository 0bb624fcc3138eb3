use swarm_solver::prelude::*;

use crate::functions::LookupCost;

/// Integer-grid sphere search over `[-500, 500]²`.
pub fn sphere_params() -> Result<SwarmParams, ConfigError> {
    SwarmParams::builder(2)
        .max(vec![500.0, 500.0])
        .min(vec![-500.0, -500.0])
        .c1(2.0)
        .c2(2.0)
        .precision(0)
        .target(0.0)
        .particles(40)
        .iterations(5_000)
        .stagnation(5_000)
        .inertia(Inertia::Linear { min: 0.4, max: 0.9 })
        .build()
}

pub fn booth_params() -> Result<SwarmParams, ConfigError> {
    SwarmParams::builder(2)
        .uniform_bounds(-10.0, 10.0)
        .c1(1.49445)
        .c2(1.49445)
        .particles(30)
        .iterations(1_000)
        .stagnation(200)
        .inertia(Inertia::Constant(0.729))
        .build()
}

/// Rastrigin with dissipative scatter enabled to escape local minima.
pub fn rastrigin_params(dims: usize) -> Result<SwarmParams, ConfigError> {
    SwarmParams::builder(dims)
        .uniform_bounds(-5.12, 5.12)
        .c1(1.49445)
        .c2(1.49445)
        .cv(0.01)
        .cl(0.01)
        .particles(60)
        .iterations(3_000)
        .stagnation(500)
        .inertia(Inertia::Chaotic { min: 0.4, max: 0.9 })
        .build()
}

pub fn rosenbrock_params(dims: usize) -> Result<SwarmParams, ConfigError> {
    SwarmParams::builder(dims)
        .uniform_bounds(-5.0, 10.0)
        .c1(1.49445)
        .c2(1.49445)
        .particles(50)
        .iterations(5_000)
        .stagnation(1_000)
        .target(1.0e-10)
        .inertia(Inertia::Linear { min: 0.4, max: 0.9 })
        .stagnation_policy(StagnationPolicy::Rerandomize { probability: 0.3 })
        .build()
}

/// Search over a table whose edges are a domain error for the cost function.
pub fn lookup_params(lookup: &LookupCost) -> Result<SwarmParams, ConfigError> {
    let hi = lookup.table.len() as f64 - 1.0;
    SwarmParams::builder(2)
        .uniform_bounds(0.0, hi)
        .precision(0)
        .particles(20)
        .iterations(500)
        .stagnation(100)
        .inertia(Inertia::Linear { min: 0.4, max: 0.9 })
        .build()
}
