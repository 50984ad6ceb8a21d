//! Configuration of [`Trainer`](super::Trainer).
use crate::error::ReinforceError;
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of episodes whose gradients are summed before a weight update.
    pub batch_size: usize,

    /// Step cap of an episode. If `None`, the cap of the environment is used.
    #[serde(default)]
    pub max_episode_length: Option<usize>,

    /// Interval of reward history reports in iterations.
    pub report_interval: usize,

    /// Render the environment after every step.
    #[serde(default)]
    pub render: bool,

    /// Stop after this number of iterations. If `None`, run until cancelled.
    #[serde(default)]
    pub max_iterations: Option<usize>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_episode_length: None,
            report_interval: 50,
            render: false,
            max_iterations: None,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of episodes per weight update.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the step cap of an episode.
    pub fn max_episode_length(mut self, v: usize) -> Self {
        self.max_episode_length = Some(v);
        self
    }

    /// Sets the interval of reward history reports in iterations.
    pub fn report_interval(mut self, v: usize) -> Self {
        self.report_interval = v;
        self
    }

    /// Enables rendering.
    pub fn render(mut self, v: bool) -> Self {
        self.render = v;
        self
    }

    /// Sets the number of iterations after which training ends.
    pub fn max_iterations(mut self, v: usize) -> Self {
        self.max_iterations = Some(v);
        self
    }

    /// Checks that counts and intervals are positive.
    pub fn validate(&self) -> Result<(), ReinforceError> {
        if self.batch_size == 0 {
            return Err(ReinforceError::InvalidConfig(
                "batch_size must be positive".to_string(),
            ));
        }
        if self.report_interval == 0 {
            return Err(ReinforceError::InvalidConfig(
                "report_interval must be positive".to_string(),
            ));
        }
        if self.max_episode_length == Some(0) {
            return Err(ReinforceError::InvalidConfig(
                "max_episode_length must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of trainer from {:?}", path_);
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of trainer into {:?}", path_);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_trainer_config() -> Result<()> {
        let config = TrainerConfig::default()
            .batch_size(4)
            .max_episode_length(500)
            .report_interval(5)
            .max_iterations(100);

        let dir = TempDir::new("trainer_config")?;
        let path = dir.path().join("trainer_config.yaml");
        config.save(&path)?;
        let config_ = TrainerConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_optional_fields_default() -> Result<()> {
        let config: TrainerConfig = serde_yaml::from_str("batch_size: 3\nreport_interval: 7\n")?;
        assert_eq!(
            config,
            TrainerConfig::default().batch_size(3).report_interval(7)
        );
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(TrainerConfig::default().validate().is_ok());
        assert!(TrainerConfig::default().batch_size(0).validate().is_err());
        assert!(TrainerConfig::default().report_interval(0).validate().is_err());
        assert!(TrainerConfig::default()
            .max_episode_length(0)
            .validate()
            .is_err());
    }
}
