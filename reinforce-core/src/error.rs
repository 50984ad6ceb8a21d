//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReinforceError {
    /// Dimensions of weights, states or hidden activations are inconsistent.
    #[error("Shape mismatch in {op}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Operation which detected the mismatch.
        op: &'static str,
        /// Expected shape.
        expected: Vec<usize>,
        /// Given shape.
        actual: Vec<usize>,
    },

    /// Raw action scores do not define a distribution (zero or non-finite sum).
    #[error("Degenerate action distribution: raw scores sum to {0}")]
    DegenerateDistribution(f64),

    /// Discounted returns of a trajectory have zero variance.
    #[error("Degenerate returns: {len} discounted returns with zero variance")]
    DegenerateReturns {
        /// Length of the trajectory.
        len: usize,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Neither the trainer nor the environment specifies a step cap.
    #[error("Maximum episode length is given neither by the trainer config nor by the environment")]
    MissingEpisodeCap,

    /// A staged weight update contains a non-finite value.
    #[error("Non-finite value in staged update of {0}")]
    NonFiniteUpdate(&'static str),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
