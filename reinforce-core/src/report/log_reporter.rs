use super::{IterationStats, Reporter};
use anyhow::Result;
use log::info;

/// Reports progress through the [`log`] facade.
///
/// Iteration statistics are written at `info` level. The reward history is
/// drawn as a text chart of `width` x `height` characters.
pub struct LogReporter {
    width: usize,
    height: usize,
}

impl Default for LogReporter {
    fn default() -> Self {
        Self {
            width: 60,
            height: 10,
        }
    }
}

impl LogReporter {
    /// Constructs a reporter with the default chart size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the size of the reward chart.
    pub fn chart_size(mut self, width: usize, height: usize) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }
}

impl Reporter for LogReporter {
    fn report_iteration(&mut self, stats: &IterationStats) -> Result<()> {
        info!(
            "Iteration {}, episodes {}: reward mean {:.3}, std {:.3}, min {:.3}, max {:.3}, length mean {:.1}",
            stats.iteration,
            stats.episode,
            stats.mean_reward(),
            stats.std_reward(),
            stats.min_reward(),
            stats.max_reward(),
            stats.mean_length(),
        );
        Ok(())
    }

    fn report_progress(&mut self, mean_rewards: &[f64]) -> Result<()> {
        info!("Mean reward over {} iterations", mean_rewards.len());
        for line in draw_curve(mean_rewards, self.width, self.height) {
            info!("{}", line);
        }
        Ok(())
    }
}

/// Draws `values` as a text chart of `height` rows.
///
/// Values are averaged into at most `width` columns. Each row is prefixed with
/// the value at its level; the top row holds the maximum and the bottom row
/// the minimum.
pub fn draw_curve(values: &[f64], width: usize, height: usize) -> Vec<String> {
    if values.is_empty() || width == 0 || height == 0 {
        return vec![];
    }

    let n_cols = values.len().min(width);
    let cols: Vec<f64> = (0..n_cols)
        .map(|c| {
            let start = c * values.len() / n_cols;
            let end = ((c + 1) * values.len() / n_cols).max(start + 1);
            values[start..end].iter().sum::<f64>() / (end - start) as f64
        })
        .collect();

    let lo = cols.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = cols.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;
    let level = |v: f64| -> usize {
        if span <= 0.0 {
            0
        } else {
            (((v - lo) / span) * (height - 1) as f64).round() as usize
        }
    };

    (0..height)
        .rev()
        .map(|row| {
            let label = if height == 1 {
                hi
            } else {
                lo + span * row as f64 / (height - 1) as f64
            };
            let body: String = cols
                .iter()
                .map(|&v| if level(v) == row { '*' } else { ' ' })
                .collect();
            format!("{:>10.2} |{}", label, body.trim_end())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::draw_curve;

    #[test]
    fn test_draw_increasing_curve() {
        let lines = draw_curve(&[0.0, 1.0, 2.0], 10, 3);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("|  *"));
        assert!(lines[1].ends_with("| *"));
        assert!(lines[2].ends_with("|*"));
    }

    #[test]
    fn test_draw_downsamples_to_width() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let lines = draw_curve(&values, 20, 5);
        let n_marks: usize = lines
            .iter()
            .map(|l| l.chars().filter(|c| *c == '*').count())
            .sum();
        assert_eq!(n_marks, 20);
    }

    #[test]
    fn test_draw_flat_and_empty() {
        assert!(draw_curve(&[], 10, 3).is_empty());
        let lines = draw_curve(&[5.0, 5.0], 10, 3);
        assert!(lines[2].ends_with("|**"));
        assert!(!lines[0].contains('*'));
    }
}
