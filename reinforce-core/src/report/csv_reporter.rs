use super::{IterationStats, Reporter};
use anyhow::Result;
use csv::{Writer, WriterBuilder};
use log::info;
use serde::Serialize;
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

#[derive(Debug, Serialize)]
struct IterationRow {
    iteration: usize,
    episode: usize,
    mean_reward: f64,
    std_reward: f64,
    min_reward: f64,
    max_reward: f64,
    mean_length: f64,
}

#[derive(Debug, Serialize)]
struct ProgressRow {
    iteration: usize,
    mean_reward: f64,
}

/// Writes training progress into CSV files in a directory.
///
/// * `iterations.csv` gets one row per weight update.
/// * `mean_rewards.csv` is rewritten on every progress report with the whole
///   history of mean batch rewards, ready to be plotted.
pub struct CsvReporter {
    dir: PathBuf,
    wtr: Writer<File>,
}

impl CsvReporter {
    /// Creates `dir` if needed and opens `iterations.csv` in it.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let wtr = WriterBuilder::new().from_path(dir.join("iterations.csv"))?;
        info!("Write training progress into {:?}", &dir);
        Ok(Self { dir, wtr })
    }

    /// Path of the file holding the mean reward history.
    pub fn progress_path(&self) -> PathBuf {
        self.dir.join("mean_rewards.csv")
    }
}

impl Reporter for CsvReporter {
    fn report_iteration(&mut self, stats: &IterationStats) -> Result<()> {
        self.wtr.serialize(IterationRow {
            iteration: stats.iteration,
            episode: stats.episode,
            mean_reward: stats.mean_reward(),
            std_reward: stats.std_reward(),
            min_reward: stats.min_reward(),
            max_reward: stats.max_reward(),
            mean_length: stats.mean_length(),
        })?;
        self.wtr.flush()?;
        Ok(())
    }

    fn report_progress(&mut self, mean_rewards: &[f64]) -> Result<()> {
        let mut wtr = WriterBuilder::new().from_path(self.progress_path())?;
        for (i, &mean_reward) in mean_rewards.iter().enumerate() {
            wtr.serialize(ProgressRow {
                iteration: i + 1,
                mean_reward,
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}
