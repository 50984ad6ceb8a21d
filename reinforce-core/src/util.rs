//! Utilities for interaction of agents and environments.
use crate::{
    record::{RecordValue, Recorder},
    Env, Obs, Policy,
};
use anyhow::{ensure, Result};

/// Runs episodes with a policy and returns the reward sum of each episode.
///
/// An episode ends at termination, truncation or after `max_steps` steps.
/// Every step is written to `recorder` together with `reward`, `episode` and
/// `step` entries.
pub fn eval_with_recorder<E, P, R>(
    env: &mut E,
    policy: &mut P,
    n_episodes: usize,
    max_steps: usize,
    recorder: &mut R,
) -> Result<Vec<f64>>
where
    E: Env,
    P: Policy<E>,
    R: Recorder,
{
    let mut rs = Vec::with_capacity(n_episodes);

    for episode in 0..n_episodes {
        let mut prev_obs = env.reset()?;
        let mut r_total = 0.0;

        for count_step in 0..max_steps {
            ensure!(
                prev_obs.len() == env.obs_dim(),
                "observation has {} features, expected {}",
                prev_obs.len(),
                env.obs_dim()
            );
            let act = policy.sample(&prev_obs)?;
            let (step, mut record) = env.step(&act)?;
            r_total += step.reward;

            record.insert("reward", RecordValue::Scalar(step.reward as _));
            record.insert("episode", RecordValue::Scalar(episode as _));
            record.insert("step", RecordValue::Scalar(count_step as _));
            recorder.write(record);

            if step.is_done() {
                break;
            }
            prev_obs = step.obs;
        }
        rs.push(r_total);
    }

    Ok(rs)
}
