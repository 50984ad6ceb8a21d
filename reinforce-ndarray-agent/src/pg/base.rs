//! REINFORCE agent.
use super::{
    config::PgConfig,
    gradient::build_gradient,
    network::{Gradients, PolicyNetwork},
    rmsprop::RmsProp,
    sampler::{greedy, sample},
    trajectory::{collect, Trajectory},
};
use anyhow::Result;
use log::{debug, info};
use ndarray::ArrayView1;
use rand::{rngs::SmallRng, SeedableRng};
use reinforce_core::{
    error::ReinforceError,
    record::{Record, RecordValue},
    Agent, Env, EpisodeSummary, Obs, Policy,
};
use std::marker::PhantomData;

/// REINFORCE agent with RMSProp.
///
/// Each call of [`Agent::accumulate`] adds the gradient of one episode to a
/// buffer. [`Agent::opt_with_record`] applies the summed gradient and clears
/// the buffer, so the caller decides how many episodes form a batch.
///
/// In training mode actions are drawn from the renormalized output scores,
/// in evaluation mode the most probable action is taken.
pub struct Pg<E: Env> {
    config: PgConfig,
    network: PolicyNetwork,
    optimizer: RmsProp,
    grad_buffer: Gradients,
    n_accumulated: usize,
    n_opts: usize,
    train: bool,
    rng: SmallRng,
    phantom: PhantomData<E>,
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

impl<E: Env> Pg<E> {
    /// Constructs an agent for observations of `obs_dim` features and `n_actions` actions.
    pub fn build(config: PgConfig, obs_dim: usize, n_actions: usize) -> Result<Self> {
        config.validate()?;
        let mut rng = seeded_rng(config.seed);
        let network = PolicyNetwork::new(obs_dim, config.n_hidden_units, n_actions, &mut rng);
        info!(
            "Build REINFORCE agent: obs_dim = {}, n_hidden_units = {}, n_actions = {}",
            obs_dim, config.n_hidden_units, n_actions
        );
        Ok(Self::with_network(config, network, rng))
    }

    /// Constructs an agent sized for `env`.
    pub fn from_env(config: PgConfig, env: &E) -> Result<Self> {
        Self::build(config, env.obs_dim(), env.n_actions())
    }

    /// Constructs an agent starting from the given weights.
    ///
    /// The hidden width of `network` must equal `config.n_hidden_units`.
    pub fn from_network(config: PgConfig, network: PolicyNetwork) -> Result<Self> {
        config.validate()?;
        if network.n_hidden() != config.n_hidden_units {
            return Err(ReinforceError::InvalidConfig(format!(
                "n_hidden_units is {} but the network has {} hidden units",
                config.n_hidden_units,
                network.n_hidden()
            ))
            .into());
        }
        let rng = seeded_rng(config.seed);
        Ok(Self::with_network(config, network, rng))
    }

    fn with_network(config: PgConfig, network: PolicyNetwork, rng: SmallRng) -> Self {
        let optimizer = RmsProp::new(
            &network,
            config.learning_rate,
            config.decay_rate,
            config.rmsprop_eps,
        );
        Self {
            grad_buffer: Gradients::zeros_like(&network),
            optimizer,
            network,
            config,
            n_accumulated: 0,
            n_opts: 0,
            train: true,
            rng,
            phantom: PhantomData,
        }
    }

    /// The policy network.
    pub fn network(&self) -> &PolicyNetwork {
        &self.network
    }

    /// The optimizer holding the RMSProp cache.
    pub fn optimizer(&self) -> &RmsProp {
        &self.optimizer
    }

    /// Gradients accumulated since the last update.
    pub fn grad_buffer(&self) -> &Gradients {
        &self.grad_buffer
    }

    /// The number of committed updates.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// Configuration of the agent.
    pub fn config(&self) -> &PgConfig {
        &self.config
    }
}

impl<E: Env> Policy<E> for Pg<E> {
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act> {
        let (_, raw) = self.network.forward(ArrayView1::from(obs.as_slice()))?;
        let (action, _) = if self.train {
            sample(raw.view(), &mut self.rng)?
        } else {
            greedy(raw.view())?
        };
        Ok(action.into())
    }
}

impl<E: Env> Agent<E> for Pg<E> {
    type Episode = Trajectory;

    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn sample_episode(&mut self, env: &mut E, max_steps: usize, render: bool) -> Result<Trajectory> {
        let network = &self.network;
        if self.train {
            let rng = &mut self.rng;
            collect(network, env, max_steps, render, |raw| sample(raw, &mut *rng))
        } else {
            collect(network, env, max_steps, render, greedy)
        }
    }

    fn accumulate(&mut self, episode: Trajectory) -> Result<EpisodeSummary> {
        let grads = build_gradient(
            &self.network,
            &episode,
            self.config.discount_factor,
            self.config.degenerate_returns,
        )?;
        self.grad_buffer.add_assign(&grads)?;
        self.n_accumulated += 1;

        let summary = EpisodeSummary {
            reward: episode.reward_sum(),
            length: episode.len(),
        };
        debug!(
            "Accumulated episode {} of the batch: reward = {}, length = {}",
            self.n_accumulated, summary.reward, summary.length
        );
        Ok(summary)
    }

    fn opt_with_record(&mut self) -> Result<Record> {
        let (grad_norm_w1, grad_norm_w2) = self.grad_buffer.norms();
        self.optimizer.step(&mut self.network, &self.grad_buffer)?;
        let (rms_mean_w1, rms_mean_w2) = self.optimizer.cache_means();
        let n_episodes = self.n_accumulated;

        self.grad_buffer.reset();
        self.n_accumulated = 0;
        self.n_opts += 1;

        Ok(Record::from_slice(&[
            ("grad_norm_w1", RecordValue::Scalar(grad_norm_w1 as _)),
            ("grad_norm_w2", RecordValue::Scalar(grad_norm_w2 as _)),
            ("rms_mean_w1", RecordValue::Scalar(rms_mean_w1 as _)),
            ("rms_mean_w2", RecordValue::Scalar(rms_mean_w2 as _)),
            ("n_episodes", RecordValue::Scalar(n_episodes as _)),
        ]))
    }
}
