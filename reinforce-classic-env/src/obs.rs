//! Observation of classic-control environments.
use reinforce_core::Obs;

/// A real-valued state vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassicObs(pub Vec<f64>);

impl Obs for ClassicObs {
    fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for ClassicObs {
    fn from(v: Vec<f64>) -> Self {
        Self(v)
    }
}
