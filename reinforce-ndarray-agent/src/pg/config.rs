//! Configuration of REINFORCE agent.
use anyhow::Result;
use log::info;
use reinforce_core::error::ReinforceError;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// What to do with a trajectory whose discounted returns have zero variance.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum DegenerateReturns {
    /// Use a zero error signal, so the trajectory contributes a zero gradient.
    Skip,

    /// Fail with [`ReinforceError::DegenerateReturns`].
    Fail,
}

impl Default for DegenerateReturns {
    fn default() -> Self {
        Self::Skip
    }
}

/// Constructs [`Pg`](super::Pg).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PgConfig {
    pub(super) discount_factor: f64,
    pub(super) learning_rate: f64,
    pub(super) decay_rate: f64,
    pub(super) n_hidden_units: usize,
    pub(super) rmsprop_eps: f64,
    #[serde(default)]
    pub(super) degenerate_returns: DegenerateReturns,
    #[serde(default)]
    pub(super) seed: Option<u64>,
}

impl Default for PgConfig {
    fn default() -> Self {
        Self {
            discount_factor: 0.99,
            learning_rate: 0.05,
            decay_rate: 0.99,
            n_hidden_units: 20,
            rmsprop_eps: 1e-5,
            degenerate_returns: DegenerateReturns::Skip,
            seed: None,
        }
    }
}

impl PgConfig {
    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Learning rate.
    pub fn learning_rate(mut self, v: f64) -> Self {
        self.learning_rate = v;
        self
    }

    /// Decay rate of the RMSProp cache.
    pub fn decay_rate(mut self, v: f64) -> Self {
        self.decay_rate = v;
        self
    }

    /// The number of hidden units.
    pub fn n_hidden_units(mut self, v: usize) -> Self {
        self.n_hidden_units = v;
        self
    }

    /// Constant added to the RMS in the denominator of the update.
    pub fn rmsprop_eps(mut self, v: f64) -> Self {
        self.rmsprop_eps = v;
        self
    }

    /// Handling of trajectories with zero-variance returns.
    pub fn degenerate_returns(mut self, v: DegenerateReturns) -> Self {
        self.degenerate_returns = v;
        self
    }

    /// Random seed of weight initialization and action sampling.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = Some(v);
        self
    }

    /// Checks ranges of the hyperparameters.
    pub fn validate(&self) -> Result<(), ReinforceError> {
        let err = |msg: &str| Err(ReinforceError::InvalidConfig(msg.to_string()));

        if !(0.0..=1.0).contains(&self.discount_factor) {
            return err("discount_factor must be in [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.decay_rate) {
            return err("decay_rate must be in [0, 1]");
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return err("learning_rate must be positive");
        }
        if !(self.rmsprop_eps > 0.0 && self.rmsprop_eps.is_finite()) {
            return err("rmsprop_eps must be positive");
        }
        if self.n_hidden_units == 0 {
            return err("n_hidden_units must be positive");
        }
        Ok(())
    }

    /// Constructs [`PgConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of REINFORCE agent from {:?}", path_);
        Ok(b)
    }

    /// Saves [`PgConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of REINFORCE agent into {:?}", path_);
        Ok(())
    }
}
