//! Per-batch episode statistics.

/// Ring buffers of episode rewards and lengths.
///
/// The slot of an episode is `episode mod batch_size`, so after a full batch
/// the buffers hold exactly the episodes of that batch.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeStats {
    rewards: Vec<f64>,
    lengths: Vec<usize>,
}

impl EpisodeStats {
    /// Constructs zero-filled buffers of `batch_size` slots.
    pub fn new(batch_size: usize) -> Self {
        Self {
            rewards: vec![0.0; batch_size],
            lengths: vec![0; batch_size],
        }
    }

    /// Stores the reward sum and length of episode `episode`.
    pub fn put(&mut self, episode: usize, reward: f64, length: usize) {
        let ix = episode % self.rewards.len();
        self.rewards[ix] = reward;
        self.lengths[ix] = length;
    }

    /// Reward sums.
    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    /// Episode lengths.
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Mean of the reward sums.
    pub fn mean_reward(&self) -> f64 {
        self.rewards.iter().sum::<f64>() / self.rewards.len() as f64
    }
}
