//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{
    error::ReinforceError,
    record::{NullRecorder, Record, RecordValue},
    util::eval_with_recorder,
    Agent, Env,
};
use anyhow::Result;
use chrono::Local;
use log::info;

/// Runs a fixed number of episodes with the agent in evaluation mode.
///
/// The returned record holds the mean and the population standard deviation
/// of the episode returns as `eval_reward` and `eval_reward_std`, the returns
/// themselves as `eval_returns` and the end of the evaluation as `eval_time`.
///
/// ```ignore
/// let mut evaluator = DefaultEvaluator::<CartPole>::new(&config, 42, 10)?;
/// let record = evaluator.evaluate(&mut agent)?;
/// println!("Average return: {}", record.get_scalar("eval_reward")?);
/// ```
pub struct DefaultEvaluator<E: Env> {
    n_episodes: usize,
    max_steps: usize,
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<A: Agent<E>>(&mut self, agent: &mut A) -> Result<Record> {
        let was_train = agent.is_train();
        agent.eval();
        let rs = eval_with_recorder(
            &mut self.env,
            agent,
            self.n_episodes,
            self.max_steps,
            &mut NullRecorder::new(),
        );
        if was_train {
            agent.train();
        }
        let rs = rs?;

        let n = rs.len().max(1) as f64;
        let mean = rs.iter().sum::<f64>() / n;
        let std = (rs.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / n).sqrt();
        info!(
            "Evaluation over {} episodes: mean reward {:.2} (std {:.2})",
            rs.len(),
            mean,
            std
        );

        Ok(Record::from_slice(&[
            ("eval_reward", RecordValue::Scalar(mean as f32)),
            ("eval_reward_std", RecordValue::Scalar(std as f32)),
            (
                "eval_returns",
                RecordValue::Array1(rs.iter().map(|&r| r as f32).collect()),
            ),
            ("eval_time", RecordValue::DateTime(Local::now())),
        ]))
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs an evaluator with its own environment.
    ///
    /// Episodes are capped at the environment's step cap.
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        let env = E::build(config, seed)?;
        let max_steps = env
            .max_episode_steps()
            .ok_or(ReinforceError::MissingEpisodeCap)?;
        Ok(Self {
            n_episodes,
            max_steps,
            env,
        })
    }

    /// Overrides the step cap of evaluation episodes.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }
}
