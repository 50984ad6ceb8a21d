//! Two-layer policy network with a hand-derived backward pass.
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;
use reinforce_core::error::ReinforceError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Bound of the sigmoid input; keeps `exp` finite.
const SIGMOID_CLAMP: f64 = 500.0;

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x.clamp(-SIGMOID_CLAMP, SIGMOID_CLAMP)).exp())
}

/// Standard normal sample with the Box-Muller transform.
fn randn<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-10);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn check_shape(
    op: &'static str,
    expected: &[usize],
    actual: &[usize],
) -> Result<(), ReinforceError> {
    if expected != actual {
        return Err(ReinforceError::ShapeMismatch {
            op,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        });
    }
    Ok(())
}

/// Policy network `sigmoid(relu(x W1) W2)` without biases.
///
/// `W1` has shape `(obs_dim, n_hidden)` and `W2` has shape `(n_hidden, n_actions)`.
/// Shapes are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyNetwork {
    w1: Array2<f64>,
    w2: Array2<f64>,
}

impl PolicyNetwork {
    /// Draws weights from a standard normal distribution, scaled by the
    /// inverse square root of the width of each layer's output.
    pub fn new<R: Rng>(
        obs_dim: usize,
        n_hidden: usize,
        n_actions: usize,
        rng: &mut R,
    ) -> Self {
        let s1 = (n_hidden as f64).sqrt();
        let s2 = (n_actions as f64).sqrt();
        let w1 = Array2::from_shape_simple_fn((obs_dim, n_hidden), || randn(&mut *rng) / s1);
        let w2 = Array2::from_shape_simple_fn((n_hidden, n_actions), || randn(&mut *rng) / s2);
        Self { w1, w2 }
    }

    /// Constructs a network from given weights.
    pub fn from_weights(w1: Array2<f64>, w2: Array2<f64>) -> Result<Self, ReinforceError> {
        check_shape(
            "PolicyNetwork::from_weights",
            &[w1.ncols()],
            &[w2.nrows()],
        )?;
        Ok(Self { w1, w2 })
    }

    /// Weights of the hidden layer.
    pub fn w1(&self) -> &Array2<f64> {
        &self.w1
    }

    /// Weights of the output layer.
    pub fn w2(&self) -> &Array2<f64> {
        &self.w2
    }

    /// Dimension of the input.
    pub fn obs_dim(&self) -> usize {
        self.w1.nrows()
    }

    /// The number of hidden units.
    pub fn n_hidden(&self) -> usize {
        self.w1.ncols()
    }

    /// The number of actions.
    pub fn n_actions(&self) -> usize {
        self.w2.ncols()
    }

    /// Returns the hidden activation and the raw per-action scores in `(0, 1)`.
    ///
    /// The scores are independent sigmoids and do not sum to one.
    pub fn forward(
        &self,
        state: ArrayView1<f64>,
    ) -> Result<(Array1<f64>, Array1<f64>), ReinforceError> {
        check_shape("PolicyNetwork::forward", &[self.obs_dim()], state.shape())?;
        let hidden = state.dot(&self.w1).mapv_into(|v| v.max(0.0));
        let out = hidden.dot(&self.w2).mapv_into(sigmoid);
        Ok((hidden, out))
    }

    /// Computes weight gradients for an output-level error signal.
    ///
    /// `states`, `hidden` and `error` are stacked over the `T` steps of a
    /// trajectory, with shapes `(T, obs_dim)`, `(T, n_hidden)` and
    /// `(T, n_actions)`. The ReLU gate is taken from `hidden`, the activations
    /// recorded in the forward passes.
    pub fn backward(
        &self,
        states: ArrayView2<f64>,
        hidden: ArrayView2<f64>,
        error: ArrayView2<f64>,
    ) -> Result<Gradients, ReinforceError> {
        let t = states.nrows();
        check_shape("backward: states", &[t, self.obs_dim()], states.shape())?;
        check_shape("backward: hidden", &[t, self.n_hidden()], hidden.shape())?;
        check_shape("backward: error", &[t, self.n_actions()], error.shape())?;

        let w2 = hidden.t().dot(&error);
        let mut dh = error.dot(&self.w2.t());
        dh.zip_mut_with(&hidden, |d, &h| {
            if h <= 0.0 {
                *d = 0.0;
            }
        });
        let w1 = states.t().dot(&dh);

        Ok(Gradients { w1, w2 })
    }

    pub(super) fn replace(&mut self, w1: Array2<f64>, w2: Array2<f64>) {
        self.w1 = w1;
        self.w2 = w2;
    }
}

/// A pair of matrices shaped like the weights of a [`PolicyNetwork`].
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    /// Gradient of `W1`.
    pub w1: Array2<f64>,

    /// Gradient of `W2`.
    pub w2: Array2<f64>,
}

impl Gradients {
    /// Zero matrices shaped like the weights of `network`.
    pub fn zeros_like(network: &PolicyNetwork) -> Self {
        Self {
            w1: Array2::zeros(network.w1.raw_dim()),
            w2: Array2::zeros(network.w2.raw_dim()),
        }
    }

    /// Adds `other` elementwise.
    pub fn add_assign(&mut self, other: &Gradients) -> Result<(), ReinforceError> {
        check_shape("Gradients::add_assign", self.w1.shape(), other.w1.shape())?;
        check_shape("Gradients::add_assign", self.w2.shape(), other.w2.shape())?;
        self.w1 += &other.w1;
        self.w2 += &other.w2;
        Ok(())
    }

    /// Sets all elements to zero.
    pub fn reset(&mut self) {
        self.w1.fill(0.0);
        self.w2.fill(0.0);
    }

    /// Frobenius norms of both gradients.
    pub fn norms(&self) -> (f64, f64) {
        let norm = |a: &Array2<f64>| a.iter().map(|v| v * v).sum::<f64>().sqrt();
        (norm(&self.w1), norm(&self.w2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2, Array2};
    use rand::{rngs::SmallRng, SeedableRng};

    fn golden_network() -> PolicyNetwork {
        PolicyNetwork::from_weights(arr2(&[[1.0], [1.0]]), arr2(&[[1.0, 1.0]])).unwrap()
    }

    #[test]
    fn test_forward_golden() {
        let net = golden_network();
        let (hidden, out) = net.forward(arr1(&[1.0, 0.0]).view()).unwrap();
        assert_eq!(hidden, arr1(&[1.0]));
        let s = 1.0 / (1.0 + (-1.0f64).exp());
        assert!((out[0] - s).abs() < 1e-12);
        assert!((out[1] - s).abs() < 1e-12);
        assert!((out[0] - 0.731).abs() < 1e-3);
    }

    #[test]
    fn test_relu_floor() {
        let net = golden_network();
        let (hidden, out) = net.forward(arr1(&[-1.0, -2.0]).view()).unwrap();
        assert_eq!(hidden, arr1(&[0.0]));
        assert_eq!(out, arr1(&[0.5, 0.5]));
    }

    #[test]
    fn test_sigmoid_clamp() {
        assert!(sigmoid(1e6).is_finite());
        assert!(sigmoid(-1e6) > 0.0);
        assert_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn test_forward_shape_mismatch() {
        let net = golden_network();
        let err = net.forward(arr1(&[1.0, 0.0, 0.0]).view()).unwrap_err();
        assert_eq!(
            err,
            ReinforceError::ShapeMismatch {
                op: "PolicyNetwork::forward",
                expected: vec![2],
                actual: vec![3]
            }
        );
    }

    #[test]
    fn test_backward_golden() {
        let net = golden_network();
        let states = arr2(&[[1.0, 0.0]]);
        let hidden = arr2(&[[1.0]]);
        let error = arr2(&[[0.5, -0.5]]);
        let g = net
            .backward(states.view(), hidden.view(), error.view())
            .unwrap();
        assert_eq!(g.w2, arr2(&[[0.5, -0.5]]));
        assert_eq!(g.w1, arr2(&[[0.0], [0.0]]));
    }

    #[test]
    fn test_backward_relu_gate_from_recorded_hidden() {
        let net = golden_network();
        let states = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let error = arr2(&[[1.0, 0.0], [0.0, 1.0]]);

        // dh = [[1], [1]], gated by the recorded activations only
        let hidden = arr2(&[[0.0], [2.0]]);
        let g = net
            .backward(states.view(), hidden.view(), error.view())
            .unwrap();
        assert_eq!(g.w1, arr2(&[[3.0], [4.0]]));
        assert_eq!(g.w2, arr2(&[[0.0, 2.0]]));
    }

    #[test]
    fn test_backward_zero_error_and_shapes() {
        let mut rng = SmallRng::seed_from_u64(42);
        let net = PolicyNetwork::new(4, 6, 3, &mut rng);

        for t in [1, 2, 17] {
            let states = Array2::from_shape_fn((t, 4), |(i, j)| (i + j) as f64 - 2.0);
            let hidden = Array2::from_shape_fn((t, 6), |(i, j)| (i * j) as f64);
            let error = Array2::zeros((t, 3));
            let g = net
                .backward(states.view(), hidden.view(), error.view())
                .unwrap();
            assert_eq!(g.w1.shape(), net.w1().shape());
            assert_eq!(g.w2.shape(), net.w2().shape());
            assert!(g.w1.iter().all(|&v| v == 0.0));
            assert!(g.w2.iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_backward_length_mismatch() {
        let net = golden_network();
        let states = arr2(&[[1.0, 0.0], [0.0, 1.0]]);
        let hidden = arr2(&[[1.0]]);
        let error = arr2(&[[0.5, -0.5], [0.5, -0.5]]);
        assert!(matches!(
            net.backward(states.view(), hidden.view(), error.view()),
            Err(ReinforceError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_init_scale() {
        let mut rng = SmallRng::seed_from_u64(0);
        let net = PolicyNetwork::new(4, 400, 2, &mut rng);
        assert_eq!(net.w1().shape(), &[4, 400]);
        assert_eq!(net.w2().shape(), &[400, 2]);

        // variance of W1 entries is 1 / n_hidden
        let n = net.w1().len() as f64;
        let var = net.w1().iter().map(|v| v * v).sum::<f64>() / n;
        assert!((var * 400.0 - 1.0).abs() < 0.2, "{}", var * 400.0);
    }

    #[test]
    fn test_gradients_accumulate() {
        let net = golden_network();
        let mut acc = Gradients::zeros_like(&net);
        let g = Gradients {
            w1: arr2(&[[1.0], [2.0]]),
            w2: arr2(&[[3.0, 4.0]]),
        };
        acc.add_assign(&g).unwrap();
        acc.add_assign(&g).unwrap();
        assert_eq!(acc.w1, arr2(&[[2.0], [4.0]]));
        assert_eq!(acc.norms().1, 10.0);
        acc.reset();
        assert_eq!(acc, Gradients::zeros_like(&net));
    }
}
