//! Action selection from raw per-action scores.
use ndarray::{Array1, ArrayView1};
use rand::{distributions::WeightedIndex, Rng};
use reinforce_core::error::ReinforceError;

/// Divides `raw_scores` by their sum.
///
/// This is a linear renormalization, not a softmax. Fails with
/// [`ReinforceError::DegenerateDistribution`] if the sum is not positive and
/// finite or if any score is negative.
pub fn normalize(raw_scores: ArrayView1<f64>) -> Result<Array1<f64>, ReinforceError> {
    let sum = raw_scores.sum();
    if !(sum > 0.0 && sum.is_finite()) || raw_scores.iter().any(|&v| v < 0.0) {
        return Err(ReinforceError::DegenerateDistribution(sum));
    }
    Ok(raw_scores.mapv(|v| v / sum))
}

/// Draws an action from the renormalized scores.
///
/// Returns the action index and the probabilities it was drawn from.
pub fn sample<R: Rng>(
    raw_scores: ArrayView1<f64>,
    rng: &mut R,
) -> Result<(usize, Array1<f64>), ReinforceError> {
    let probs = normalize(raw_scores)?;
    let dist = WeightedIndex::new(probs.iter())
        .map_err(|_| ReinforceError::DegenerateDistribution(raw_scores.sum()))?;
    Ok((rng.sample(dist), probs))
}

/// Takes the most probable action, the lowest index on ties.
pub fn greedy(raw_scores: ArrayView1<f64>) -> Result<(usize, Array1<f64>), ReinforceError> {
    let probs = normalize(raw_scores)?;
    let mut best = 0;
    for (i, &p) in probs.iter().enumerate() {
        if p > probs[best] {
            best = i;
        }
    }
    Ok((best, probs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    #[test]
    fn test_normalize() {
        let probs = normalize(arr1(&[0.731, 0.731]).view()).unwrap();
        assert_eq!(probs, arr1(&[0.5, 0.5]));

        let probs = normalize(arr1(&[0.9, 0.1, 0.5, 1e-9]).view()).unwrap();
        assert!((probs.sum() - 1.0).abs() < 1e-12);
        assert!((probs[0] - 0.9 / 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_distribution() {
        assert_eq!(
            normalize(arr1(&[0.0, 0.0]).view()),
            Err(ReinforceError::DegenerateDistribution(0.0))
        );
        assert!(normalize(arr1(&[f64::NAN, 0.5]).view()).is_err());
        assert!(normalize(arr1(&[-0.5, 1.0]).view()).is_err());

        let mut rng = SmallRng::seed_from_u64(0);
        assert!(sample(arr1(&[0.0, 0.0, 0.0]).view(), &mut rng).is_err());
    }

    #[test]
    fn test_sample_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        let raw = arr1(&[0.2, 0.9, 0.4]);
        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            let (a, probs) = sample(raw.view(), &mut rng).unwrap();
            assert!(a < 3);
            assert!((probs.sum() - 1.0).abs() < 1e-12);
            counts[a] += 1;
        }
        // p = [0.133, 0.6, 0.267]
        assert!(counts[1] > counts[2] && counts[2] > counts[0]);
    }

    #[test]
    fn test_random_scores_give_distributions() {
        let mut rng = SmallRng::seed_from_u64(23);
        for _ in 0..200 {
            let n = rng.gen_range(1..10);
            let raw: Array1<f64> = (0..n).map(|_| rng.gen_range(1e-6..1.0)).collect();

            let (a, probs) = sample(raw.view(), &mut rng).unwrap();
            assert!(a < n);
            assert!((probs.sum() - 1.0).abs() < 1e-12, "{:?}", raw);
            assert!(probs.iter().all(|&p| p > 0.0 && p <= 1.0));
            assert_eq!(probs, normalize(raw.view()).unwrap());
        }
    }

    #[test]
    fn test_sample_never_picks_zero_score() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            let (a, _) = sample(arr1(&[0.0, 1.0]).view(), &mut rng).unwrap();
            assert_eq!(a, 1);
        }
    }

    #[test]
    fn test_sample_deterministic_given_seed() {
        let raw = arr1(&[0.3, 0.3, 0.3, 0.3]);
        let draw = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            (0..20)
                .map(|_| sample(raw.view(), &mut rng).unwrap().0)
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(11), draw(11));
    }

    #[test]
    fn test_greedy() {
        assert_eq!(greedy(arr1(&[0.2, 0.9, 0.4]).view()).unwrap().0, 1);
        assert_eq!(greedy(arr1(&[0.5, 0.5]).view()).unwrap().0, 0);
    }
}
