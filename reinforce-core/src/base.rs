//! Core functionalities.
mod agent;
mod env;
mod policy;
mod step;
pub use agent::{Agent, EpisodeSummary};
pub use env::Env;
pub use policy::Policy;
use std::fmt::Debug;
pub use step::{Info, Step};

/// An observation of an environment.
///
/// Observations are exposed to agents as a flat vector of real features,
/// whose length equals [`Env::obs_dim`].
pub trait Obs: Clone + Debug {
    /// Returns the features of the observation.
    fn as_slice(&self) -> &[f64];

    /// Returns the number of features.
    fn len(&self) -> usize {
        self.as_slice().len()
    }
}

/// A discrete action of an environment.
///
/// Actions are built from indices in `[0, n_actions)`; continuous action
/// spaces are not supported.
pub trait Act: Clone + Debug + From<usize> {}
