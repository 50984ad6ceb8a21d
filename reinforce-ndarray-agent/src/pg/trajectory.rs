//! Trajectory and its collector.
use super::network::PolicyNetwork;
use anyhow::Result;
use log::{trace, warn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use reinforce_core::{error::ReinforceError, Env, Obs};

/// The record of one episode.
///
/// States, hidden activations and action probabilities are stacked row by
/// row, one row per step.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    states: Array2<f64>,
    hidden: Array2<f64>,
    probs: Array2<f64>,
    actions: Vec<usize>,
    rewards: Vec<f64>,
}

impl Trajectory {
    /// Constructs an empty trajectory.
    pub fn new(obs_dim: usize, n_hidden: usize, n_actions: usize) -> Self {
        Self {
            states: Array2::zeros((0, obs_dim)),
            hidden: Array2::zeros((0, n_hidden)),
            probs: Array2::zeros((0, n_actions)),
            actions: vec![],
            rewards: vec![],
        }
    }

    /// Appends a step.
    pub fn push(
        &mut self,
        state: ArrayView1<f64>,
        hidden: ArrayView1<f64>,
        probs: ArrayView1<f64>,
        action: usize,
        reward: f64,
    ) -> Result<(), ReinforceError> {
        let expected = [self.states.ncols(), self.hidden.ncols(), self.probs.ncols()];
        let actual = [state.len(), hidden.len(), probs.len()];
        if expected != actual || action >= self.n_actions() {
            return Err(ReinforceError::ShapeMismatch {
                op: "Trajectory::push",
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            });
        }
        let mismatch = |_| ReinforceError::ShapeMismatch {
            op: "Trajectory::push",
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        };
        self.states.push_row(state).map_err(mismatch)?;
        self.hidden.push_row(hidden).map_err(mismatch)?;
        self.probs.push_row(probs).map_err(mismatch)?;
        self.actions.push(action);
        self.rewards.push(reward);
        Ok(())
    }

    /// The number of steps.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if no step has been recorded.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Actions taken.
    pub fn actions(&self) -> &[usize] {
        &self.actions
    }

    /// Rewards received.
    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    /// Sum of rewards.
    pub fn reward_sum(&self) -> f64 {
        self.rewards.iter().sum()
    }

    /// The number of actions.
    pub fn n_actions(&self) -> usize {
        self.probs.ncols()
    }

    /// States, `(T, obs_dim)`.
    pub fn states(&self) -> ArrayView2<f64> {
        self.states.view()
    }

    /// Hidden activations, `(T, n_hidden)`.
    pub fn hidden(&self) -> ArrayView2<f64> {
        self.hidden.view()
    }

    /// Normalized action probabilities, `(T, n_actions)`.
    pub fn probs(&self) -> ArrayView2<f64> {
        self.probs.view()
    }
}

/// Runs one episode on `env` and records it.
///
/// `select` maps raw action scores to an action and the probabilities it was
/// drawn from. The episode ends when the environment reports termination or
/// truncation, or after `max_steps` steps. If `render` is set,
/// [`Env::render`] is called after every step and its failures are logged and
/// ignored. Environment errors are returned as they are.
pub fn collect<E, F>(
    network: &PolicyNetwork,
    env: &mut E,
    max_steps: usize,
    render: bool,
    mut select: F,
) -> Result<Trajectory>
where
    E: Env,
    F: FnMut(ArrayView1<f64>) -> Result<(usize, Array1<f64>), ReinforceError>,
{
    let mut trajectory =
        Trajectory::new(network.obs_dim(), network.n_hidden(), network.n_actions());
    let mut obs = env.reset()?;

    for t in 0..max_steps {
        let state = ArrayView1::from(obs.as_slice());
        let (hidden, raw) = network.forward(state)?;
        let (action, probs) = select(raw.view())?;
        let (step, _) = env.step(&E::Act::from(action))?;
        trace!("t = {}, action = {}, reward = {}", t, action, step.reward);
        trajectory.push(state, hidden.view(), probs.view(), action, step.reward)?;

        if render {
            if let Err(e) = env.render() {
                warn!("Failed to render: {}", e);
            }
        }
        if step.is_done() {
            break;
        }
        obs = step.obs;
    }

    Ok(trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pg::sampler::{greedy, sample};
    use ndarray::arr1;
    use rand::{rngs::SmallRng, SeedableRng};
    use reinforce_core::dummy::{DummyEnv, DummyEnvConfig};

    fn network() -> PolicyNetwork {
        let mut rng = SmallRng::seed_from_u64(0);
        PolicyNetwork::new(3, 5, 2, &mut rng)
    }

    fn env(episode_length: usize) -> DummyEnv {
        let config = DummyEnvConfig {
            obs_dim: 3,
            episode_length,
            ..Default::default()
        };
        DummyEnv::build(&config, 0).unwrap()
    }

    #[test]
    fn test_collect_until_termination() -> Result<()> {
        let net = network();
        let mut env = env(4);
        let mut rng = SmallRng::seed_from_u64(1);
        let traj = collect(&net, &mut env, 100, true, |raw| sample(raw, &mut rng))?;

        assert_eq!(traj.len(), 4);
        assert_eq!(traj.rewards(), &[1.0; 4]);
        assert_eq!(traj.states().shape(), &[4, 3]);
        assert_eq!(traj.hidden().shape(), &[4, 5]);
        assert_eq!(traj.probs().shape(), &[4, 2]);
        assert_eq!(env.n_renders, 4);

        // the recorded rows are those of the forward passes
        for (t, state) in traj.states().outer_iter().enumerate() {
            assert_eq!(state[0], (t + 1) as f64 / 4.0);
            let (hidden, raw) = net.forward(state)?;
            assert_eq!(hidden, traj.hidden().row(t));
            let probs = normalize_like(&raw);
            assert!((&probs - &traj.probs().row(t)).iter().all(|d| d.abs() < 1e-12));
        }
        Ok(())
    }

    fn normalize_like(raw: &Array1<f64>) -> Array1<f64> {
        raw / raw.sum()
    }

    #[test]
    fn test_collect_step_cap() -> Result<()> {
        let net = network();
        let mut env = env(1000);
        let traj = collect(&net, &mut env, 7, false, greedy)?;
        assert_eq!(traj.len(), 7);
        assert_eq!(env.n_renders, 0);
        Ok(())
    }

    #[test]
    fn test_collect_propagates_env_error() {
        let net = network();
        let mut env = env(10);
        let res = collect(&net, &mut env, 10, false, |raw| {
            greedy(raw).map(|(_, probs)| (5, probs))
        });
        assert!(res.is_err());
    }

    #[test]
    fn test_push_checks_shapes() {
        let mut traj = Trajectory::new(2, 1, 2);
        let ok = traj.push(
            arr1(&[1.0, 0.0]).view(),
            arr1(&[1.0]).view(),
            arr1(&[0.5, 0.5]).view(),
            0,
            1.0,
        );
        assert!(ok.is_ok());
        let err = traj.push(
            arr1(&[1.0]).view(),
            arr1(&[1.0]).view(),
            arr1(&[0.5, 0.5]).view(),
            0,
            1.0,
        );
        assert!(matches!(err, Err(ReinforceError::ShapeMismatch { .. })));
        let err = traj.push(
            arr1(&[1.0, 0.0]).view(),
            arr1(&[1.0]).view(),
            arr1(&[0.5, 0.5]).view(),
            2,
            1.0,
        );
        assert!(err.is_err());
        assert_eq!(traj.len(), 1);
        assert_eq!(traj.reward_sum(), 1.0);
    }
}
