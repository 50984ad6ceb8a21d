use super::{IterationStats, Reporter};
use anyhow::Result;

/// Forwards every report to a list of reporters, in order.
#[derive(Default)]
pub struct MultiReporter {
    reporters: Vec<Box<dyn Reporter>>,
}

impl MultiReporter {
    /// Constructs an empty fan-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reporter.
    pub fn push(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporters.push(Box::new(reporter));
        self
    }

    /// The number of reporters.
    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    /// Returns `true` if there is no reporter.
    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

impl Reporter for MultiReporter {
    fn report_iteration(&mut self, stats: &IterationStats) -> Result<()> {
        for r in self.reporters.iter_mut() {
            r.report_iteration(stats)?;
        }
        Ok(())
    }

    fn report_progress(&mut self, mean_rewards: &[f64]) -> Result<()> {
        for r in self.reporters.iter_mut() {
            r.report_progress(mean_rewards)?;
        }
        Ok(())
    }
}
