use anyhow::bail;
use swarm_solver::prelude::{argmin::core::Error as ArgminError, nalgebra::DVector};

/// `f(x) = Σ xᵢ²`, minimum 0 at the origin.
pub fn sphere(x: &DVector<f64>) -> f64 {
    x.iter().map(|xi| xi * xi).sum()
}

/// Booth's function, minimum 0 at (1, 3).
pub fn booth(p: &DVector<f64>) -> f64 {
    let (x, y) = (p[0], p[1]);
    (x + 2.0 * y - 7.0).powi(2) + (2.0 * x + y - 5.0).powi(2)
}

/// Rastrigin's function, minimum 0 at the origin; many local minima.
pub fn rastrigin(x: &DVector<f64>) -> f64 {
    let a = 10.0;
    a * x.len() as f64
        + x.iter()
            .map(|xi| xi * xi - a * (2.0 * std::f64::consts::PI * xi).cos())
            .sum::<f64>()
}

/// Rosenbrock's valley, minimum 0 at (1, ..., 1).
pub fn rosenbrock(x: &DVector<f64>) -> f64 {
    x.as_slice()
        .windows(2)
        .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
        .sum()
}

/// A cost read out of a table indexed by the rounded coordinates.
///
/// Points that land outside the table are a domain error.
#[derive(Clone, Debug)]
pub struct LookupCost {
    pub table: Vec<Vec<f64>>,
}

impl LookupCost {
    /// Bowl-shaped table with its minimum at `(row, col)`.
    pub fn bowl(size: usize, row: usize, col: usize) -> Self {
        let table = (0..size)
            .map(|r| {
                (0..size)
                    .map(|c| {
                        let dr = r as f64 - row as f64;
                        let dc = c as f64 - col as f64;
                        dr * dr + dc * dc
                    })
                    .collect()
            })
            .collect();
        Self { table }
    }

    pub fn cost(&self, p: &DVector<f64>) -> Result<f64, ArgminError> {
        let (r, c) = (p[0].round(), p[1].round());
        if r < 0.0 || c < 0.0 {
            bail!("negative table index ({}, {})", r, c);
        }
        match self
            .table
            .get(r as usize)
            .and_then(|row| row.get(c as usize))
        {
            Some(&cost) => Ok(cost),
            None => bail!("table index ({}, {}) out of range", r, c),
        }
    }
}
