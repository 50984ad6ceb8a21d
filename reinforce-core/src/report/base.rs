use crate::record::Record;
use anyhow::Result;

/// Statistics of one batch of episodes.
///
/// `episode_rewards` and `episode_lengths` are ring buffers of length
/// `batch_size`, indexed by `episode mod batch_size`.
#[derive(Debug, Clone, Copy)]
pub struct IterationStats<'a> {
    /// The number of weight updates so far, including this one.
    pub iteration: usize,

    /// The number of episodes so far.
    pub episode: usize,

    /// Sum of rewards of each episode in the batch.
    pub episode_rewards: &'a [f64],

    /// Length of each episode in the batch.
    pub episode_lengths: &'a [usize],

    /// Values returned by the agent from the weight update.
    pub record: &'a Record,
}

impl<'a> IterationStats<'a> {
    /// Mean of the episode rewards.
    pub fn mean_reward(&self) -> f64 {
        mean(self.episode_rewards)
    }

    /// Population standard deviation of the episode rewards.
    pub fn std_reward(&self) -> f64 {
        let m = self.mean_reward();
        let n = self.episode_rewards.len().max(1) as f64;
        (self
            .episode_rewards
            .iter()
            .map(|r| (r - m) * (r - m))
            .sum::<f64>()
            / n)
            .sqrt()
    }

    /// Minimum of the episode rewards.
    pub fn min_reward(&self) -> f64 {
        self.episode_rewards
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    /// Maximum of the episode rewards.
    pub fn max_reward(&self) -> f64 {
        self.episode_rewards
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Mean of the episode lengths.
    pub fn mean_length(&self) -> f64 {
        let n = self.episode_lengths.len().max(1) as f64;
        self.episode_lengths.iter().sum::<usize>() as f64 / n
    }
}

fn mean(vs: &[f64]) -> f64 {
    vs.iter().sum::<f64>() / vs.len().max(1) as f64
}

/// Consumes training progress.
pub trait Reporter {
    /// Reports the statistics of the batch which has just been used for an update.
    fn report_iteration(&mut self, stats: &IterationStats) -> Result<()>;

    /// Reports the history of mean batch rewards, one value per iteration.
    fn report_progress(&mut self, mean_rewards: &[f64]) -> Result<()>;
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report_iteration(&mut self, stats: &IterationStats) -> Result<()> {
        (**self).report_iteration(stats)
    }

    fn report_progress(&mut self, mean_rewards: &[f64]) -> Result<()> {
        (**self).report_progress(mean_rewards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_stats() {
        let record = Record::empty();
        let stats = IterationStats {
            iteration: 3,
            episode: 12,
            episode_rewards: &[1.0, 3.0, 5.0, 7.0],
            episode_lengths: &[10, 20, 30, 40],
            record: &record,
        };

        assert_eq!(stats.mean_reward(), 4.0);
        assert!((stats.std_reward() - 5f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.min_reward(), 1.0);
        assert_eq!(stats.max_reward(), 7.0);
        assert_eq!(stats.mean_length(), 25.0);
    }
}
