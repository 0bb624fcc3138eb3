use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Dimensionality must be positive, got {dims}")]
    ZeroDims { dims: usize },

    #[error("Length of `{field}` ({len}) does not match dims ({dims})")]
    LengthMismatch {
        field: &'static str,
        len: usize,
        dims: usize,
    },

    #[error("Bounds for dimension {dim} are inverted; max={max} < min={min}")]
    InvertedBounds { dim: usize, max: f64, min: f64 },

    #[error("`{field}` must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("Velocity cap for dimension {dim} must be -1 (derived) or non-negative, got {value}")]
    InvalidVelocityCap { dim: usize, value: f64 },

    #[error("Probability `{field}` must lie in [0, 1] (or be -1 to disable), got {value}")]
    InvalidProbability { field: &'static str, value: f64 },

    #[error("Population must contain at least one particle")]
    EmptyPopulation,

    #[error("Iteration budget must be at least 1")]
    ZeroIterations,

    #[error("Stagnation threshold must be at least 1")]
    ZeroStagnation,

    #[error("Precision of {digits} decimal digits exceeds the maximum of {max}")]
    PrecisionTooLarge { digits: i32, max: u32 },

    #[error("Inertia bounds are inverted; min={min} > max={max}")]
    InvertedInertia { min: f64, max: f64 },
}

#[derive(Error, Debug)]
pub enum SwarmError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Expected {expected} particle RNGs, got {got}")]
    RngCountMismatch { expected: usize, got: usize },
}
