//! Deterministic environment used in tests.
use crate::{record::Record, Act, Env, Obs, Step};
use anyhow::{ensure, Result};

#[derive(Clone, Debug, PartialEq)]
/// Dummy observation.
pub struct DummyObs(pub Vec<f64>);

impl Obs for DummyObs {
    fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Dummy action.
pub struct DummyAct(pub usize);

impl From<usize> for DummyAct {
    fn from(ix: usize) -> Self {
        Self(ix)
    }
}

impl Act for DummyAct {}

#[derive(Clone, Debug, PartialEq)]
/// Configuration of [`DummyEnv`].
pub struct DummyEnvConfig {
    /// Dimension of observations.
    pub obs_dim: usize,

    /// The number of actions.
    pub n_actions: usize,

    /// The episode terminates after this number of steps.
    pub episode_length: usize,

    /// If set, only this action is rewarded. Otherwise every step gives reward 1.
    pub rewarded_action: Option<usize>,

    /// Value returned by [`Env::max_episode_steps`].
    pub max_episode_steps: Option<usize>,
}

impl Default for DummyEnvConfig {
    fn default() -> Self {
        Self {
            obs_dim: 4,
            n_actions: 2,
            episode_length: 5,
            rewarded_action: None,
            max_episode_steps: Some(100),
        }
    }
}

/// Dummy env.
///
/// Observations are `[t + 1, t + 1, ...] / episode_length` where `t` is the
/// step count, so they stay positive and change every step.
pub struct DummyEnv {
    config: DummyEnvConfig,
    t: usize,

    /// The number of calls to [`Env::render`].
    pub n_renders: usize,

    /// The number of calls to [`Env::reset`].
    pub n_resets: usize,
}

impl DummyEnv {
    fn obs(&self) -> DummyObs {
        let v = (self.t + 1) as f64 / self.config.episode_length.max(1) as f64;
        DummyObs(vec![v; self.config.obs_dim])
    }
}

impl Env for DummyEnv {
    type Config = DummyEnvConfig;
    type Obs = DummyObs;
    type Act = DummyAct;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        ensure!(config.n_actions > 0, "n_actions must be positive");
        Ok(Self {
            config: config.clone(),
            t: 0,
            n_renders: 0,
            n_resets: 0,
        })
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.t = 0;
        self.n_resets += 1;
        Ok(self.obs())
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        ensure!(
            a.0 < self.config.n_actions,
            "invalid action {}, n_actions = {}",
            a.0,
            self.config.n_actions
        );
        let reward = match self.config.rewarded_action {
            Some(k) if k != a.0 => 0.0,
            _ => 1.0,
        };
        self.t += 1;
        let is_terminated = self.t >= self.config.episode_length;
        let step = Step::new(self.obs(), *a, reward, is_terminated, false, ());
        Ok((step, Record::empty()))
    }

    fn render(&mut self) -> Result<()> {
        self.n_renders += 1;
        Ok(())
    }

    fn n_actions(&self) -> usize {
        self.config.n_actions
    }

    fn obs_dim(&self) -> usize {
        self.config.obs_dim
    }

    fn max_episode_steps(&self) -> Option<usize> {
        self.config.max_episode_steps
    }
}

/// A policy taking the same action at every step.
pub struct ConstantPolicy(pub usize);

impl crate::Policy<DummyEnv> for ConstantPolicy {
    fn sample(&mut self, _obs: &DummyObs) -> Result<DummyAct> {
        Ok(DummyAct(self.0))
    }
}
