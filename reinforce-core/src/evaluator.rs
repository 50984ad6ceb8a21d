//! Evaluate [`Agent`].
use crate::{record::Record, Agent, Env};
use anyhow::Result;
mod default_evaluator;
pub use default_evaluator::DefaultEvaluator;

/// Evaluate [`Agent`].
pub trait Evaluator<E: Env> {
    /// Evaluates `agent` and returns the result as a [`Record`].
    ///
    /// The training/evaluation mode of `agent` is the same before and after the call.
    fn evaluate<A: Agent<E>>(&mut self, agent: &mut A) -> Result<Record>;
}
