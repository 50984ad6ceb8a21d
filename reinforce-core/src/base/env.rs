//! Environment.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents an environment, typically an MDP with a discrete action space.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performes an environment step.
    ///
    /// Errors, e.g., an invalid action, are returned to the caller as they are.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// Draws the current state of the environment.
    ///
    /// Rendering is best-effort. Callers log failures and go on.
    fn render(&mut self) -> Result<()> {
        Ok(())
    }

    /// The number of discrete actions.
    fn n_actions(&self) -> usize;

    /// The dimension of observations.
    fn obs_dim(&self) -> usize;

    /// Step cap of an episode, if the environment has one.
    fn max_episode_steps(&self) -> Option<usize> {
        None
    }
}
