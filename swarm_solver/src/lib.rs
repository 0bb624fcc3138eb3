pub mod error;
pub mod fitness;
pub mod inertia;
pub mod listener;
pub mod params;
pub mod particle;
pub mod random;
pub mod rounding;
pub mod swarm;


pub mod prelude {
    pub use crate::{
        error::*,
        fitness::*,
        inertia::*,
        listener::*,
        params::*,
        particle::*,
        random::*,
        rounding::round_half_up,
        swarm::*,
    };

    pub use argmin;
    pub use nalgebra;
}

#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr) => {{
        let eps = 1.0e-6;
        let (a, b) = (&$a, &$b);
        assert!(
            (*a - *b).abs() < eps,
            "assertion failed: `(left !== right)` \
             (left: `{:?}`, right: `{:?}`, expect diff: `{:?}`, real diff: `{:?}`)",
            *a,
            *b,
            eps,
            (*a - *b).abs()
        );
    }};
    ($a:expr, $b:expr, $eps:expr) => {{
        let (a, b) = (&$a, &$b);
        let eps = $eps;
        assert!(
            (*a - *b).abs() < eps,
            "assertion failed: `(left !== right)` \
             (left: `{:?}`, right: `{:?}`, expect diff: `{:?}`, real diff: `{:?}`)",
            *a,
            *b,
            eps,
            (*a - *b).abs()
        );
    }};
}
