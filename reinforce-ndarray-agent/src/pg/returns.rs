//! Discounted returns.
use ndarray::Array1;
use reinforce_core::error::ReinforceError;

/// Computes `G_t = r_t + discount_factor * G_{t+1}` from the last step backwards, `G_T = 0`.
pub fn discount_rewards(rewards: &[f64], discount_factor: f64) -> Array1<f64> {
    let mut returns = Array1::zeros(rewards.len());
    let mut running = 0.0;
    for (t, r) in rewards.iter().enumerate().rev() {
        running = r + discount_factor * running;
        returns[t] = running;
    }
    returns
}

/// Subtracts the mean and divides by the population standard deviation.
///
/// Fails with [`ReinforceError::DegenerateReturns`] if the standard deviation
/// is zero or not finite, e.g. for a single-step trajectory. `returns` is left
/// unchanged in that case.
pub fn standardize(returns: &mut Array1<f64>) -> Result<(), ReinforceError> {
    let len = returns.len();
    let mean = match returns.mean() {
        Some(mean) => mean,
        None => return Err(ReinforceError::DegenerateReturns { len }),
    };
    let std = returns.std(0.0);
    if !(std > 0.0 && std.is_finite()) {
        return Err(ReinforceError::DegenerateReturns { len });
    }
    returns.mapv_inplace(|g| (g - mean) / std);
    Ok(())
}
