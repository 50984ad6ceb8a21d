//! Agent.
use super::{Env, Policy};
use crate::record::Record;
use anyhow::Result;

/// Reward sum and length of a finished episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    /// Sum of rewards over the episode.
    pub reward: f64,

    /// The number of steps in the episode.
    pub length: usize,
}

/// Represents a trainable policy on an environment.
///
/// Training is episodic: an episode is first collected with
/// [`Agent::sample_episode`], then folded into a gradient accumulator with
/// [`Agent::accumulate`]. [`Agent::opt_with_record`] commits the accumulated
/// gradient as one weight update. The split lets the caller drop a collected
/// episode without touching the agent's learning state.
pub trait Agent<E: Env>: Policy<E> {
    /// A collected episode.
    type Episode;

    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Runs one episode on `env`, stopping at termination or after `max_steps` steps.
    ///
    /// If `render` is `true`, [`Env::render`] is called after every step.
    fn sample_episode(&mut self, env: &mut E, max_steps: usize, render: bool)
        -> Result<Self::Episode>;

    /// Adds the gradient contribution of a collected episode to the accumulator.
    fn accumulate(&mut self, episode: Self::Episode) -> Result<EpisodeSummary>;

    /// Applies the accumulated gradient to the weights, resets the accumulator
    /// and returns some information.
    fn opt_with_record(&mut self) -> Result<Record>;
}
