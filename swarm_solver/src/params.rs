use nalgebra::DVector;

use crate::error::ConfigError;
use crate::inertia::Inertia;
use crate::rounding::MAX_PRECISION;

/// What the swarm does once `stagnation` epochs pass without a global
/// improvement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum StagnationPolicy {
    /// Stop the run with reason `Stagnation`.
    #[default]
    Terminate,
    /// Re-randomize each particle with the given probability, reset the
    /// stagnation counter and keep searching.
    Rerandomize { probability: f64 },
}

/// Read-only search configuration.
///
/// Built once through [`SwarmParams::builder`], which validates every field
/// and resolves the `-1` sentinels of the configuration surface:
/// - `vmax[i] == -1` becomes `|max[i]| + |min[i]|`
/// - `cv == -1` / `cl == -1` disable the corresponding scatter
/// - `precision == -1` disables rounding
#[derive(Clone, Debug)]
pub struct SwarmParams {
    dims: usize,
    max: DVector<f64>,
    min: DVector<f64>,
    vmax: DVector<f64>,
    c1: f64,
    c2: f64,
    cv: Option<f64>,
    cl: Option<f64>,
    precision: Option<u32>,
    particles: usize,
    stagnation: u64,
    target: f64,
    iterations: u64,
    inertia: Inertia,
    stagnation_policy: StagnationPolicy,
}

impl SwarmParams {
    pub fn builder(dims: usize) -> SwarmParamsBuilder {
        SwarmParamsBuilder::new(dims)
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn max(&self) -> &DVector<f64> {
        &self.max
    }

    pub fn min(&self) -> &DVector<f64> {
        &self.min
    }

    /// Resolved per-dimension velocity caps.
    pub fn vmax(&self) -> &DVector<f64> {
        &self.vmax
    }

    pub fn c1(&self) -> f64 {
        self.c1
    }

    pub fn c2(&self) -> f64 {
        self.c2
    }

    /// Velocity scatter probability, `None` when disabled.
    pub fn cv(&self) -> Option<f64> {
        self.cv
    }

    /// Location scatter probability, `None` when disabled.
    pub fn cl(&self) -> Option<f64> {
        self.cl
    }

    /// Decimal digits positions are rounded to, `None` for unbounded.
    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    pub fn particles(&self) -> usize {
        self.particles
    }

    pub fn stagnation(&self) -> u64 {
        self.stagnation
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn inertia(&self) -> &Inertia {
        &self.inertia
    }

    pub fn stagnation_policy(&self) -> StagnationPolicy {
        self.stagnation_policy
    }
}

/// Builder for [`SwarmParams`]. Setters take the raw configuration values,
/// sentinels included; nothing is checked until [`SwarmParamsBuilder::build`].
#[derive(Clone, Debug)]
pub struct SwarmParamsBuilder {
    dims: usize,
    max: Vec<f64>,
    min: Vec<f64>,
    vmax: Option<Vec<f64>>,
    c1: f64,
    c2: f64,
    cv: f64,
    cl: f64,
    precision: i32,
    particles: usize,
    stagnation: u64,
    target: f64,
    iterations: u64,
    inertia: Inertia,
    stagnation_policy: StagnationPolicy,
}

impl SwarmParamsBuilder {
    fn new(dims: usize) -> Self {
        Self {
            dims,
            max: Vec::new(),
            min: Vec::new(),
            vmax: None,
            c1: 2.0,
            c2: 2.0,
            cv: -1.0,
            cl: -1.0,
            precision: -1,
            particles: 40,
            stagnation: 100,
            target: 0.0,
            iterations: 1000,
            inertia: Inertia::default(),
            stagnation_policy: StagnationPolicy::Terminate,
        }
    }

    pub fn max(mut self, max: Vec<f64>) -> Self {
        self.max = max;
        self
    }

    pub fn min(mut self, min: Vec<f64>) -> Self {
        self.min = min;
        self
    }

    /// Sets `[lo, hi]` as the bounds of every dimension.
    pub fn uniform_bounds(mut self, lo: f64, hi: f64) -> Self {
        self.min = vec![lo; self.dims];
        self.max = vec![hi; self.dims];
        self
    }

    /// Per-dimension velocity caps; `-1` entries are derived from the bounds.
    pub fn vmax(mut self, vmax: Vec<f64>) -> Self {
        self.vmax = Some(vmax);
        self
    }

    pub fn c1(mut self, c1: f64) -> Self {
        self.c1 = c1;
        self
    }

    pub fn c2(mut self, c2: f64) -> Self {
        self.c2 = c2;
        self
    }

    /// Velocity scatter probability, `-1` to disable.
    pub fn cv(mut self, cv: f64) -> Self {
        self.cv = cv;
        self
    }

    /// Location scatter probability, `-1` to disable.
    pub fn cl(mut self, cl: f64) -> Self {
        self.cl = cl;
        self
    }

    /// Decimal digits to round positions to, `-1` for unbounded.
    pub fn precision(mut self, precision: i32) -> Self {
        self.precision = precision;
        self
    }

    pub fn particles(mut self, particles: usize) -> Self {
        self.particles = particles;
        self
    }

    pub fn stagnation(mut self, stagnation: u64) -> Self {
        self.stagnation = stagnation;
        self
    }

    pub fn target(mut self, target: f64) -> Self {
        self.target = target;
        self
    }

    pub fn iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn inertia(mut self, inertia: Inertia) -> Self {
        self.inertia = inertia;
        self
    }

    pub fn stagnation_policy(mut self, policy: StagnationPolicy) -> Self {
        self.stagnation_policy = policy;
        self
    }

    pub fn build(self) -> Result<SwarmParams, ConfigError> {
        let dims = self.dims;
        if dims == 0 {
            return Err(ConfigError::ZeroDims { dims });
        }
        check_len("max", &self.max, dims)?;
        check_len("min", &self.min, dims)?;

        for (i, (&hi, &lo)) in self.max.iter().zip(&self.min).enumerate() {
            check_finite("max", hi)?;
            check_finite("min", lo)?;
            if hi < lo {
                return Err(ConfigError::InvertedBounds {
                    dim: i,
                    max: hi,
                    min: lo,
                });
            }
        }

        let raw_vmax = self.vmax.unwrap_or_else(|| vec![-1.0; dims]);
        check_len("vmax", &raw_vmax, dims)?;
        let vmax = raw_vmax
            .iter()
            .enumerate()
            .map(|(i, &cap)| {
                if cap == -1.0 {
                    Ok(self.max[i].abs() + self.min[i].abs())
                } else if cap.is_finite() && cap >= 0.0 {
                    Ok(cap)
                } else {
                    Err(ConfigError::InvalidVelocityCap { dim: i, value: cap })
                }
            })
            .collect::<Result<Vec<f64>, ConfigError>>()?;

        check_finite("c1", self.c1)?;
        check_finite("c2", self.c2)?;
        check_finite("target", self.target)?;
        let cv = optional_probability("cv", self.cv)?;
        let cl = optional_probability("cl", self.cl)?;

        let precision = if self.precision < 0 {
            None
        } else if self.precision as u32 > MAX_PRECISION {
            return Err(ConfigError::PrecisionTooLarge {
                digits: self.precision,
                max: MAX_PRECISION,
            });
        } else {
            Some(self.precision as u32)
        };

        if self.particles == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.stagnation == 0 {
            return Err(ConfigError::ZeroStagnation);
        }

        match &self.inertia {
            Inertia::Constant(c) => check_finite("inertia", *c)?,
            Inertia::Linear { min, max } | Inertia::Chaotic { min, max } => {
                check_finite("inertia.min", *min)?;
                check_finite("inertia.max", *max)?;
                if min > max {
                    return Err(ConfigError::InvertedInertia {
                        min: *min,
                        max: *max,
                    });
                }
            }
            Inertia::Custom(_) => {}
        }

        if let StagnationPolicy::Rerandomize { probability } = self.stagnation_policy {
            if !(0.0..=1.0).contains(&probability) {
                return Err(ConfigError::InvalidProbability {
                    field: "rerandomize probability",
                    value: probability,
                });
            }
        }

        Ok(SwarmParams {
            dims,
            max: DVector::from_vec(self.max),
            min: DVector::from_vec(self.min),
            vmax: DVector::from_vec(vmax),
            c1: self.c1,
            c2: self.c2,
            cv,
            cl,
            precision,
            particles: self.particles,
            stagnation: self.stagnation,
            target: self.target,
            iterations: self.iterations,
            inertia: self.inertia,
            stagnation_policy: self.stagnation_policy,
        })
    }
}

fn check_len(field: &'static str, values: &[f64], dims: usize) -> Result<(), ConfigError> {
    if values.len() != dims {
        return Err(ConfigError::LengthMismatch {
            field,
            len: values.len(),
            dims,
        });
    }
    Ok(())
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field, value });
    }
    Ok(())
}

/// Any negative value disables; otherwise the value must be a probability.
fn optional_probability(field: &'static str, value: f64) -> Result<Option<f64>, ConfigError> {
    if value.is_nan() || value > 1.0 {
        return Err(ConfigError::InvalidProbability { field, value });
    }
    Ok((value >= 0.0).then_some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn square_builder() -> SwarmParamsBuilder {
        SwarmParams::builder(2).uniform_bounds(-500.0, 500.0)
    }

    #[test]
    fn test_defaults_resolve_sentinels() {
        let params = square_builder().build().unwrap();
        assert_eq!(params.vmax().as_slice(), &[1000.0, 1000.0]);
        assert_eq!(params.cv(), None);
        assert_eq!(params.cl(), None);
        assert_eq!(params.precision(), None);
        assert_eq!(params.c1(), 2.0);
        assert_eq!(params.stagnation_policy(), StagnationPolicy::Terminate);
    }

    #[test]
    fn test_mixed_vmax_resolution() {
        let params = SwarmParams::builder(2)
            .min(vec![-3.0, 1.0])
            .max(vec![2.0, 4.0])
            .vmax(vec![-1.0, 0.5])
            .build()
            .unwrap();
        assert_eq!(params.vmax().as_slice(), &[5.0, 0.5]);
    }

    #[test]
    fn test_enabled_options() {
        let params = square_builder()
            .cv(0.1)
            .cl(0.0)
            .precision(3)
            .build()
            .unwrap();
        assert_eq!(params.cv(), Some(0.1));
        assert_eq!(params.cl(), Some(0.0));
        assert_eq!(params.precision(), Some(3));
    }

    #[test_case(SwarmParams::builder(0), ConfigError::ZeroDims { dims: 0 }; "zero dims")]
    #[test_case(
        SwarmParams::builder(2).max(vec![1.0]).min(vec![0.0, 0.0]),
        ConfigError::LengthMismatch { field: "max", len: 1, dims: 2 };
        "short max"
    )]
    #[test_case(
        SwarmParams::builder(1).max(vec![0.0]).min(vec![1.0]),
        ConfigError::InvertedBounds { dim: 0, max: 0.0, min: 1.0 };
        "inverted bounds"
    )]
    #[test_case(
        SwarmParams::builder(1).uniform_bounds(0.0, 1.0).vmax(vec![-2.0]),
        ConfigError::InvalidVelocityCap { dim: 0, value: -2.0 };
        "bad vmax"
    )]
    #[test_case(
        SwarmParams::builder(1).uniform_bounds(0.0, 1.0).cv(1.5),
        ConfigError::InvalidProbability { field: "cv", value: 1.5 };
        "cv above one"
    )]
    #[test_case(
        SwarmParams::builder(1).uniform_bounds(0.0, 1.0).particles(0),
        ConfigError::EmptyPopulation;
        "no particles"
    )]
    #[test_case(
        SwarmParams::builder(1).uniform_bounds(0.0, 1.0).iterations(0),
        ConfigError::ZeroIterations;
        "no iterations"
    )]
    #[test_case(
        SwarmParams::builder(1).uniform_bounds(0.0, 1.0).precision(16),
        ConfigError::PrecisionTooLarge { digits: 16, max: MAX_PRECISION };
        "too precise"
    )]
    #[test_case(
        SwarmParams::builder(1).uniform_bounds(0.0, 1.0).inertia(Inertia::Linear { min: 0.9, max: 0.4 }),
        ConfigError::InvertedInertia { min: 0.9, max: 0.4 };
        "inverted inertia"
    )]
    #[test_case(
        SwarmParams::builder(1)
            .uniform_bounds(0.0, 1.0)
            .stagnation_policy(StagnationPolicy::Rerandomize { probability: 2.0 }),
        ConfigError::InvalidProbability { field: "rerandomize probability", value: 2.0 };
        "bad rerandomize probability"
    )]
    fn test_rejects_inconsistent_config(builder: SwarmParamsBuilder, expected: ConfigError) {
        assert_eq!(builder.build().unwrap_err(), expected);
    }

    #[test]
    fn test_rejects_non_finite_bound() {
        let err = SwarmParams::builder(1)
            .max(vec![f64::INFINITY])
            .min(vec![0.0])
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::NonFinite { field: "max", .. }));
    }
}
