//! Credit assignment.
use super::{
    config::DegenerateReturns,
    network::{Gradients, PolicyNetwork},
    returns::{discount_rewards, standardize},
    trajectory::Trajectory,
};
use log::warn;
use ndarray::Array2;
use reinforce_core::error::ReinforceError;

/// One-hot encodes `actions`, `(T, n_actions)`.
pub fn one_hot(actions: &[usize], n_actions: usize) -> Array2<f64> {
    let mut m = Array2::zeros((actions.len(), n_actions));
    for (t, &a) in actions.iter().enumerate() {
        m[[t, a]] = 1.0;
    }
    m
}

/// Returns `(one_hot(action) - probs) * G_t` for every step, with `G_t` the
/// standardized discounted return.
///
/// If the returns have zero variance, the error signal is all zeros under
/// [`DegenerateReturns::Skip`].
pub fn error_signal(
    trajectory: &Trajectory,
    discount_factor: f64,
    on_degenerate: DegenerateReturns,
) -> Result<Array2<f64>, ReinforceError> {
    let mut returns = discount_rewards(trajectory.rewards(), discount_factor);
    let mut error = one_hot(trajectory.actions(), trajectory.n_actions()) - &trajectory.probs();

    match (standardize(&mut returns), on_degenerate) {
        (Ok(()), _) => {}
        (Err(e), DegenerateReturns::Fail) => return Err(e),
        (Err(_), DegenerateReturns::Skip) => {
            warn!(
                "Returns of a trajectory of length {} have zero variance, skipped",
                trajectory.len()
            );
            returns.fill(0.0);
        }
    }

    for (mut row, &g) in error.outer_iter_mut().zip(returns.iter()) {
        row.mapv_inplace(|v| v * g);
    }
    Ok(error)
}

/// Computes the gradient contribution of one episode.
pub fn build_gradient(
    network: &PolicyNetwork,
    trajectory: &Trajectory,
    discount_factor: f64,
    on_degenerate: DegenerateReturns,
) -> Result<Gradients, ReinforceError> {
    let error = error_signal(trajectory, discount_factor, on_degenerate)?;
    network.backward(trajectory.states(), trajectory.hidden(), error.view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    fn golden_network() -> PolicyNetwork {
        PolicyNetwork::from_weights(arr2(&[[1.0], [1.0]]), arr2(&[[1.0, 1.0]])).unwrap()
    }

    fn push(traj: &mut Trajectory, state: [f64; 2], hidden: f64, action: usize, reward: f64) {
        traj.push(
            arr1(&state).view(),
            arr1(&[hidden]).view(),
            arr1(&[0.5, 0.5]).view(),
            action,
            reward,
        )
        .unwrap();
    }

    #[test]
    fn test_one_hot() {
        assert_eq!(
            one_hot(&[0, 2, 1], 3),
            arr2(&[[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]])
        );
    }

    #[test]
    fn test_single_step_is_degenerate() {
        let mut traj = Trajectory::new(2, 1, 2);
        push(&mut traj, [1.0, 0.0], 1.0, 0, 1.0);

        let error = error_signal(&traj, 0.99, DegenerateReturns::Skip).unwrap();
        assert_eq!(error, Array2::<f64>::zeros((1, 2)));
        assert_eq!(
            error_signal(&traj, 0.99, DegenerateReturns::Fail),
            Err(ReinforceError::DegenerateReturns { len: 1 })
        );

        let g = build_gradient(&golden_network(), &traj, 0.99, DegenerateReturns::Skip).unwrap();
        assert_eq!(g, Gradients::zeros_like(&golden_network()));
    }

    #[test]
    fn test_two_step_credit_assignment() {
        // returns with gamma = 1 are [1, 0], standardized to [1, -1]
        let mut traj = Trajectory::new(2, 1, 2);
        push(&mut traj, [1.0, 0.0], 1.0, 0, 1.0);
        push(&mut traj, [0.0, 1.0], 1.0, 1, 0.0);

        let error = error_signal(&traj, 1.0, DegenerateReturns::Fail).unwrap();
        assert_eq!(error, arr2(&[[0.5, -0.5], [0.5, -0.5]]));

        // dh = error . W2^T = 0, so only W2 receives gradient
        let g = build_gradient(&golden_network(), &traj, 1.0, DegenerateReturns::Fail).unwrap();
        assert_eq!(g.w2, arr2(&[[1.0, -1.0]]));
        assert_eq!(g.w1, arr2(&[[0.0], [0.0]]));
    }

    #[test]
    fn test_credit_assignment_through_hidden_layer() {
        let net =
            PolicyNetwork::from_weights(arr2(&[[1.0], [1.0]]), arr2(&[[2.0, 1.0]])).unwrap();
        let mut traj = Trajectory::new(2, 1, 2);
        push(&mut traj, [1.0, 0.0], 1.0, 0, 1.0);
        push(&mut traj, [0.0, 1.0], 0.0, 0, -1.0);

        // error = [[0.5, -0.5], [-0.5, 0.5]], dh = [[0.5], [-0.5]] gated to [[0.5], [0]]
        let g = build_gradient(&net, &traj, 1.0, DegenerateReturns::Fail).unwrap();
        assert_eq!(g.w1, arr2(&[[0.5], [0.0]]));
        assert_eq!(g.w2, arr2(&[[0.5, -0.5]]));
    }
}
