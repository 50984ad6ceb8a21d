//! Action of classic-control environments.
use reinforce_core::Act;

/// A discrete action given by its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassicAct(pub usize);

impl ClassicAct {
    /// Constructs an action.
    pub fn new(act: usize) -> Self {
        Self(act)
    }
}

impl Act for ClassicAct {}

impl From<usize> for ClassicAct {
    fn from(act: usize) -> Self {
        Self(act)
    }
}
