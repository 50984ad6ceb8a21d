//! RMSProp update of the policy network.
use super::network::{Gradients, PolicyNetwork};
use ndarray::{Array2, Zip};
use reinforce_core::error::ReinforceError;

/// RMSProp with a per-weight cache of squared gradients.
///
/// The update is a gradient ascent step:
///
/// ```text
/// cache = decay_rate * cache + (1 - decay_rate) * g^2
/// w     = w + learning_rate * g / (sqrt(cache) + eps)
/// ```
///
/// The cache persists over the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct RmsProp {
    learning_rate: f64,
    decay_rate: f64,
    eps: f64,
    cache: Gradients,
}

impl RmsProp {
    /// Constructs the optimizer with a zero cache shaped like `network`.
    pub fn new(network: &PolicyNetwork, learning_rate: f64, decay_rate: f64, eps: f64) -> Self {
        Self {
            learning_rate,
            decay_rate,
            eps,
            cache: Gradients::zeros_like(network),
        }
    }

    /// The cache of squared gradients.
    pub fn cache(&self) -> &Gradients {
        &self.cache
    }

    /// Mean of each cache matrix.
    pub fn cache_means(&self) -> (f64, f64) {
        (
            self.cache.w1.mean().unwrap_or(0.0),
            self.cache.w2.mean().unwrap_or(0.0),
        )
    }

    /// Applies `grads` to `network`.
    ///
    /// New caches and weights are computed aside and committed together only
    /// if all values are finite. Otherwise the network and the cache are left
    /// as they were and [`ReinforceError::NonFiniteUpdate`] is returned.
    pub fn step(
        &mut self,
        network: &mut PolicyNetwork,
        grads: &Gradients,
    ) -> Result<(), ReinforceError> {
        let (w1, c1) = self.stage("w1", network.w1(), &self.cache.w1, &grads.w1)?;
        let (w2, c2) = self.stage("w2", network.w2(), &self.cache.w2, &grads.w2)?;

        network.replace(w1, w2);
        self.cache.w1 = c1;
        self.cache.w2 = c2;
        Ok(())
    }

    fn stage(
        &self,
        name: &'static str,
        w: &Array2<f64>,
        cache: &Array2<f64>,
        g: &Array2<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>), ReinforceError> {
        for (op, other) in [("RmsProp::step: cache", cache), ("RmsProp::step: grad", g)] {
            if other.shape() != w.shape() {
                return Err(ReinforceError::ShapeMismatch {
                    op,
                    expected: w.shape().to_vec(),
                    actual: other.shape().to_vec(),
                });
            }
        }

        let (decay, lr, eps) = (self.decay_rate, self.learning_rate, self.eps);
        let cache = Zip::from(cache)
            .and(g)
            .map_collect(|&c, &g| decay * c + (1.0 - decay) * g * g);
        let w = Zip::from(w)
            .and(g)
            .and(&cache)
            .map_collect(|&w, &g, &c| w + lr * g / (c.sqrt() + eps));

        if cache.iter().chain(w.iter()).all(|v| v.is_finite()) {
            Ok((w, cache))
        } else {
            Err(ReinforceError::NonFiniteUpdate(name))
        }
    }
}
