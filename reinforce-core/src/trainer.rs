//! Train [`Agent`].
mod config;
mod stats;
use crate::{
    error::ReinforceError,
    record::{Record, RecordValue::Scalar},
    report::{IterationStats, Reporter},
    Agent, CancelToken, Env, EpisodeSummary,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::{debug, info};
pub use stats::EpisodeStats;

/// State of the training loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Episodes are collected and their gradients accumulated.
    Collecting,

    /// A batch is complete and the next step applies the weight update.
    Updating,
}

/// Outcome of [`Trainer::train_step`].
#[derive(Debug)]
pub enum TrainStep {
    /// An episode was collected and folded into the gradient accumulator.
    Collected(EpisodeSummary),

    /// A weight update was committed.
    Updated(Record),

    /// Cancellation was observed; nothing was changed.
    Cancelled,
}

/// Result of [`Trainer::train`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    /// The number of episodes folded into gradients.
    pub episodes: usize,

    /// The number of committed weight updates.
    pub iterations: usize,

    /// Mean episode reward of the last complete batch.
    pub last_mean_reward: Option<f64>,

    /// `true` if training ended by cancellation.
    pub cancelled: bool,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the episode-batched training loop.
///
/// # Training loop
///
/// 0. Given an agent implementing [`Agent`], an environment and a [`Reporter`].
/// 1. In [`Phase::Collecting`]:
///     1. Stop if cancellation is requested.
///     2. Run one episode with [`Agent::sample_episode`].
///     3. Stop if cancellation is requested; the collected episode is dropped.
///     4. Fold the episode into the agent's gradient accumulator with
///        [`Agent::accumulate`] and store its reward sum and length in the
///        ring buffers at slot `episode mod batch_size`.
///     5. `episode += 1`. If `episode % batch_size == 0`, move to
///        [`Phase::Updating`].
/// 2. In [`Phase::Updating`]:
///     1. Stop if cancellation is requested.
///     2. Commit the update with [`Agent::opt_with_record`], `iteration += 1`.
///     3. Report the batch statistics with [`Reporter::report_iteration`].
///     4. If `iteration % report_interval == 0`, report the history of mean
///        batch rewards with [`Reporter::report_progress`].
///     5. Move to [`Phase::Collecting`].
/// 3. Back to step 1, unless `max_iterations` updates have been committed.
///
/// ```mermaid
/// stateDiagram-v2
///     [*] --> Collecting
///     Collecting --> Collecting: episode % batch_size != 0
///     Collecting --> Updating: episode % batch_size == 0
///     Updating --> Collecting: weights committed
///     Collecting --> [*]: cancelled
///     Updating --> [*]: cancelled
/// ```
///
/// Cancellation is observed between these steps only. A weight update is
/// never interrupted, so after a cancelled run the agent holds the weights of
/// its last committed batch.
pub struct Trainer {
    config: TrainerConfig,
    cancel: CancelToken,
    stats: EpisodeStats,
    mean_rewards: Vec<f64>,
    episode: usize,
    iteration: usize,
    phase: Phase,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            stats: EpisodeStats::new(config.batch_size),
            config,
            cancel: CancelToken::new(),
            mean_rewards: vec![],
            episode: 0,
            iteration: 0,
            phase: Phase::Collecting,
        })
    }

    /// Replaces the cancellation token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns a handle to the cancellation token.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The number of episodes folded into gradients so far.
    pub fn episode(&self) -> usize {
        self.episode
    }

    /// The number of committed weight updates so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// The current state of the loop.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Mean episode reward of every committed batch.
    pub fn mean_rewards(&self) -> &[f64] {
        &self.mean_rewards
    }

    /// Step cap of episodes on `env`.
    pub fn max_steps<E: Env>(&self, env: &E) -> Result<usize, ReinforceError> {
        self.config
            .max_episode_length
            .or_else(|| env.max_episode_steps())
            .ok_or(ReinforceError::MissingEpisodeCap)
    }

    /// Performs one step of the loop, see [`Trainer`].
    pub fn train_step<E, A, R>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        reporter: &mut R,
        max_steps: usize,
    ) -> Result<TrainStep>
    where
        E: Env,
        A: Agent<E>,
        R: Reporter + ?Sized,
    {
        if self.cancel.is_cancelled() {
            return Ok(TrainStep::Cancelled);
        }

        match self.phase {
            Phase::Collecting => {
                let episode = agent.sample_episode(env, max_steps, self.config.render)?;
                if self.cancel.is_cancelled() {
                    return Ok(TrainStep::Cancelled);
                }

                let summary = agent.accumulate(episode)?;
                self.stats.put(self.episode, summary.reward, summary.length);
                self.episode += 1;
                debug!(
                    "Episode {}: reward {}, length {}",
                    self.episode, summary.reward, summary.length
                );

                if self.episode % self.config.batch_size == 0 {
                    self.phase = Phase::Updating;
                }
                Ok(TrainStep::Collected(summary))
            }
            Phase::Updating => {
                let record = self.update::<E, A, R>(agent, reporter)?;
                self.phase = Phase::Collecting;
                Ok(TrainStep::Updated(record))
            }
        }
    }

    fn update<E, A, R>(&mut self, agent: &mut A, reporter: &mut R) -> Result<Record>
    where
        E: Env,
        A: Agent<E>,
        R: Reporter + ?Sized,
    {
        let mut record = agent.opt_with_record()?;
        self.iteration += 1;

        let mean_reward = self.stats.mean_reward();
        record.merge_inplace(Record::from_slice(&[
            ("iteration", Scalar(self.iteration as f32)),
            ("episode", Scalar(self.episode as f32)),
            ("mean_reward", Scalar(mean_reward as f32)),
        ]));

        reporter.report_iteration(&IterationStats {
            iteration: self.iteration,
            episode: self.episode,
            episode_rewards: self.stats.rewards(),
            episode_lengths: self.stats.lengths(),
            record: &record,
        })?;

        self.mean_rewards.push(mean_reward);
        if self.iteration % self.config.report_interval == 0 {
            reporter.report_progress(&self.mean_rewards)?;
        }

        Ok(record)
    }

    /// Trains the agent until `max_iterations` updates are committed or the
    /// cancellation token is triggered.
    ///
    /// Without `max_iterations` the loop only ends by cancellation or by an error.
    pub fn train<E, A, R>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        reporter: &mut R,
    ) -> Result<TrainingSummary>
    where
        E: Env,
        A: Agent<E>,
        R: Reporter + ?Sized,
    {
        let max_steps = self.max_steps(env)?;
        agent.train();
        info!(
            "Start training: batch_size = {}, max_steps = {}",
            self.config.batch_size, max_steps
        );

        let mut cancelled = false;
        loop {
            if let Some(max_iterations) = self.config.max_iterations {
                if self.iteration >= max_iterations {
                    break;
                }
            }

            if let TrainStep::Cancelled = self.train_step(env, agent, reporter, max_steps)? {
                info!(
                    "Training cancelled after {} episodes, {} iterations",
                    self.episode, self.iteration
                );
                cancelled = true;
                break;
            }
        }

        Ok(TrainingSummary {
            episodes: self.episode,
            iterations: self.iteration,
            last_mean_reward: self.mean_rewards.last().copied(),
            cancelled,
        })
    }
}
