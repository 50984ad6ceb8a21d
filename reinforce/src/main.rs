//! Trains a REINFORCE agent on CartPole until interrupted.
use anyhow::Result;
use clap::Parser;
use log::info;
use reinforce_classic_env::{CartPole, CartPoleConfig};
use reinforce_core::{
    evaluator::{DefaultEvaluator, Evaluator as _},
    record::Record,
    report::{CsvReporter, LogReporter, MultiReporter},
    CancelToken, Env as _, Trainer, TrainerConfig, TrainingSummary,
};
use reinforce_ndarray_agent::pg::{Pg, PgConfig};
use std::path::{Path, PathBuf};

/// Train a REINFORCE agent on CartPole
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML file of the trainer configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// YAML file of the agent configuration
    #[arg(long)]
    agent_config: Option<PathBuf>,

    /// YAML file of the CartPole configuration
    #[arg(long)]
    env_config: Option<PathBuf>,

    /// Episodes per weight update
    #[arg(long)]
    batch_size: Option<usize>,

    /// Learning rate of RMSProp
    #[arg(long)]
    learning_rate: Option<f64>,

    /// The number of hidden units
    #[arg(long)]
    hidden: Option<usize>,

    /// Discount factor
    #[arg(long)]
    gamma: Option<f64>,

    /// Decay rate of the RMSProp cache
    #[arg(long)]
    decay_rate: Option<f64>,

    /// Step cap of an episode
    #[arg(long)]
    max_episode_length: Option<usize>,

    /// Interval of reward curve reports in iterations
    #[arg(long)]
    report_interval: Option<usize>,

    /// Stop after this number of weight updates
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Random seed of the environment and the agent
    #[arg(long)]
    seed: Option<u64>,

    /// Render the environment after every step
    #[arg(long, default_value_t = false)]
    render: bool,

    /// Episodes of greedy evaluation after training
    #[arg(long, default_value_t = 0)]
    eval_episodes: usize,

    /// Directory of CSV reports and effective configurations
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn trainer_config(args: &Args) -> Result<TrainerConfig> {
    let mut config = match &args.config {
        Some(path) => TrainerConfig::load(path)?,
        None => TrainerConfig::default(),
    };
    if let Some(v) = args.batch_size {
        config = config.batch_size(v);
    }
    if let Some(v) = args.max_episode_length {
        config = config.max_episode_length(v);
    }
    if let Some(v) = args.report_interval {
        config = config.report_interval(v);
    }
    if let Some(v) = args.max_iterations {
        config = config.max_iterations(v);
    }
    if args.render {
        config = config.render(true);
    }
    Ok(config)
}

fn agent_config(args: &Args) -> Result<PgConfig> {
    let mut config = match &args.agent_config {
        Some(path) => PgConfig::load(path)?,
        None => PgConfig::default(),
    };
    if let Some(v) = args.learning_rate {
        config = config.learning_rate(v);
    }
    if let Some(v) = args.hidden {
        config = config.n_hidden_units(v);
    }
    if let Some(v) = args.gamma {
        config = config.discount_factor(v);
    }
    if let Some(v) = args.decay_rate {
        config = config.decay_rate(v);
    }
    if let Some(v) = args.seed {
        config = config.seed(v);
    }
    Ok(config)
}

fn env_config(args: &Args) -> Result<CartPoleConfig> {
    match &args.env_config {
        Some(path) => CartPoleConfig::load(path),
        None => Ok(CartPoleConfig::default()),
    }
}

fn create_reporter(args: &Args) -> Result<MultiReporter> {
    let reporter = MultiReporter::new().push(LogReporter::new());
    match &args.out_dir {
        Some(dir) => Ok(reporter.push(CsvReporter::new(dir)?)),
        None => Ok(reporter),
    }
}

/// Writes the return of every evaluation episode into `evaluation.csv`.
fn save_evaluation(dir: &Path, record: &Record) -> Result<()> {
    let evaluated_at = record.get_datetime("eval_time")?.to_rfc3339();
    let mut wtr = csv::Writer::from_path(dir.join("evaluation.csv"))?;
    wtr.write_record(["evaluated_at", "episode", "reward"])?;
    for (i, r) in record.get_array1("eval_returns")?.iter().enumerate() {
        wtr.write_record([evaluated_at.clone(), i.to_string(), r.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

fn train(args: &Args, cancel: CancelToken) -> Result<TrainingSummary> {
    let trainer_config = trainer_config(args)?;
    let agent_config = agent_config(args)?;
    let env_config = env_config(args)?;
    let mut reporter = create_reporter(args)?;
    if let Some(dir) = &args.out_dir {
        trainer_config.save(dir.join("trainer.yaml"))?;
        agent_config.save(dir.join("agent.yaml"))?;
        env_config.save(dir.join("env.yaml"))?;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Seed of the environment: {}", seed);
    let mut env = CartPole::build(&env_config, seed as i64)?;
    let mut agent = Pg::from_env(agent_config, &env)?;
    let mut trainer = Trainer::build(trainer_config)?.with_cancel_token(cancel);

    let summary = trainer.train(&mut env, &mut agent, &mut reporter)?;
    info!(
        "Finished after {} episodes and {} iterations{}",
        summary.episodes,
        summary.iterations,
        if summary.cancelled { " (interrupted)" } else { "" }
    );

    if args.eval_episodes > 0 {
        let eval_seed = (seed as i64).wrapping_add(1);
        let mut evaluator =
            DefaultEvaluator::<CartPole>::new(&env_config, eval_seed, args.eval_episodes)?;
        let record = evaluator.evaluate(&mut agent)?;
        if let Some(dir) = &args.out_dir {
            save_evaluation(dir, &record)?;
        }
    }

    Ok(summary)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let cancel = CancelToken::new();
    let handle = cancel.clone();
    ctrlc::set_handler(move || {
        info!("Interrupt received, stopping at the next episode boundary");
        handle.cancel();
    })?;

    train(&args, cancel)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{train, Args};
    use anyhow::Result;
    use clap::Parser;
    use reinforce_classic_env::CartPoleConfig;
    use reinforce_core::CancelToken;
    use reinforce_ndarray_agent::pg::PgConfig;
    use std::fs;
    use tempdir::TempDir;

    #[test]
    fn test_reinforce_cartpole() -> Result<()> {
        let tmp_dir = TempDir::new("reinforce_cartpole")?;
        let out_dir = match tmp_dir.as_ref().to_str() {
            Some(s) => s,
            None => panic!("Failed to get string of temporary directory"),
        };
        let args = Args::parse_from([
            "reinforce",
            "--batch-size",
            "2",
            "--max-iterations",
            "3",
            "--report-interval",
            "1",
            "--hidden",
            "8",
            "--seed",
            "42",
            "--eval-episodes",
            "2",
            "--out-dir",
            out_dir,
        ]);

        let summary = train(&args, CancelToken::new())?;
        assert_eq!(summary.episodes, 6);
        assert_eq!(summary.iterations, 3);
        assert!(!summary.cancelled);

        let iterations = fs::read_to_string(tmp_dir.path().join("iterations.csv"))?;
        assert_eq!(iterations.lines().count(), 4);
        let progress = fs::read_to_string(tmp_dir.path().join("mean_rewards.csv"))?;
        assert_eq!(progress.lines().count(), 4);

        let evaluation = fs::read_to_string(tmp_dir.path().join("evaluation.csv"))?;
        assert_eq!(evaluation.lines().count(), 3);
        assert!(evaluation.starts_with("evaluated_at,episode,reward"));

        let agent_config = PgConfig::load(tmp_dir.path().join("agent.yaml"))?;
        assert_eq!(agent_config, PgConfig::default().n_hidden_units(8).seed(42));
        assert_eq!(
            CartPoleConfig::load(tmp_dir.path().join("env.yaml"))?,
            CartPoleConfig::default()
        );
        Ok(())
    }

    #[test]
    fn test_evaluation_with_largest_seed() -> Result<()> {
        let args = Args::parse_from([
            "reinforce",
            "--batch-size",
            "1",
            "--max-iterations",
            "1",
            "--max-episode-length",
            "10",
            "--seed",
            "9223372036854775807",
            "--eval-episodes",
            "1",
        ]);

        let summary = train(&args, CancelToken::new())?;
        assert_eq!(summary.iterations, 1);
        Ok(())
    }

    #[test]
    fn test_cancelled_before_start() -> Result<()> {
        let args = Args::parse_from(["reinforce", "--seed", "0"]);
        let cancel = CancelToken::new();
        cancel.cancel();
        let summary = train(&args, cancel)?;
        assert!(summary.cancelled);
        assert_eq!(summary.episodes, 0);
        Ok(())
    }
}
