//! Cart-pole balancing.
use crate::{ClassicAct, ClassicObs};
use anyhow::{bail, Result};
use log::info;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use reinforce_core::{record::Record, Env, Step};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

const GRAVITY: f64 = 9.8;
const MASS_CART: f64 = 1.0;
const MASS_POLE: f64 = 0.1;
const TOTAL_MASS: f64 = MASS_CART + MASS_POLE;
// half the pole's length
const LENGTH: f64 = 0.5;
const POLE_MASS_LENGTH: f64 = MASS_POLE * LENGTH;
const FORCE_MAG: f64 = 10.0;
const TAU: f64 = 0.02;
const X_THRESHOLD: f64 = 2.4;
const THETA_THRESHOLD: f64 = 12.0 * 2.0 * std::f64::consts::PI / 360.0;
const RENDER_WIDTH: usize = 49;

/// Configuration of [`CartPole`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartPoleConfig {
    /// Episodes are truncated after this number of steps.
    pub max_episode_steps: usize,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            max_episode_steps: 200,
        }
    }
}

impl CartPoleConfig {
    /// Sets the step cap of episodes.
    pub fn max_episode_steps(mut self, v: usize) -> Self {
        self.max_episode_steps = v;
        self
    }

    /// Constructs [`CartPoleConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of CartPole from {:?}", path_);
        Ok(b)
    }

    /// Saves [`CartPoleConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of CartPole into {:?}", path_);
        Ok(())
    }
}

/// A pole attached by an unactuated joint to a cart moving along a track.
///
/// The state is `[x, x_dot, theta, theta_dot]`. Action 0 pushes the cart to
/// the left and action 1 to the right. Every step pays reward 1. The episode
/// terminates when `|x| > 2.4` or `|theta| > 12` degrees and is truncated
/// after `max_episode_steps` steps.
pub struct CartPole {
    config: CartPoleConfig,
    state: [f64; 4],
    n_steps: usize,
    rng: SmallRng,
}

impl CartPole {
    fn obs(&self) -> ClassicObs {
        ClassicObs(self.state.to_vec())
    }

    /// A one-line picture of the cart on the track with the pole's lean.
    pub fn picture(&self) -> String {
        let [x, _, theta, _] = self.state;
        let pos = ((x + X_THRESHOLD) / (2.0 * X_THRESHOLD) * (RENDER_WIDTH - 1) as f64)
            .round()
            .max(0.0)
            .min((RENDER_WIDTH - 1) as f64) as usize;
        let pole = if theta > 0.05 {
            '/'
        } else if theta < -0.05 {
            '\\'
        } else {
            '|'
        };

        let mut line = vec!['-'; RENDER_WIDTH];
        line[pos] = pole;
        format!(
            "[{}] x = {:+.3}, theta = {:+.3}",
            line.into_iter().collect::<String>(),
            x,
            theta
        )
    }
}

impl Env for CartPole {
    type Config = CartPoleConfig;
    type Obs = ClassicObs;
    type Act = ClassicAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        if config.max_episode_steps == 0 {
            bail!("max_episode_steps must be positive");
        }
        Ok(Self {
            config: config.clone(),
            state: [0.0; 4],
            n_steps: 0,
            rng: SmallRng::seed_from_u64(seed as u64),
        })
    }

    fn reset(&mut self) -> Result<ClassicObs> {
        let rng = &mut self.rng;
        self.state = [(); 4].map(|_| rng.gen_range(-0.05..=0.05));
        self.n_steps = 0;
        Ok(self.obs())
    }

    fn step(&mut self, a: &ClassicAct) -> Result<(Step<Self>, Record)> {
        let force = match a.0 {
            0 => -FORCE_MAG,
            1 => FORCE_MAG,
            _ => bail!("invalid action {} for CartPole", a.0),
        };

        let [x, x_dot, theta, theta_dot] = self.state;
        let (sin_theta, cos_theta) = theta.sin_cos();
        let temp = (force + POLE_MASS_LENGTH * theta_dot * theta_dot * sin_theta) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (LENGTH * (4.0 / 3.0 - MASS_POLE * cos_theta * cos_theta / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        self.state = [
            x + TAU * x_dot,
            x_dot + TAU * x_acc,
            theta + TAU * theta_dot,
            theta_dot + TAU * theta_acc,
        ];
        self.n_steps += 1;

        let is_terminated =
            self.state[0].abs() > X_THRESHOLD || self.state[2].abs() > THETA_THRESHOLD;
        let is_truncated = !is_terminated && self.n_steps >= self.config.max_episode_steps;
        let step = Step::new(self.obs(), *a, 1.0, is_terminated, is_truncated, ());

        Ok((step, Record::empty()))
    }

    fn render(&mut self) -> Result<()> {
        info!("{:>4} {}", self.n_steps, self.picture());
        Ok(())
    }

    fn n_actions(&self) -> usize {
        2
    }

    fn obs_dim(&self) -> usize {
        4
    }

    fn max_episode_steps(&self) -> Option<usize> {
        Some(self.config.max_episode_steps)
    }
}
