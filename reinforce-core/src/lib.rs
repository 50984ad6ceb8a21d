#![warn(missing_docs)]
//! Core of a REINFORCE policy-gradient training library.
//!
//! The crate defines the contracts between the three parties of a training run:
//!
//! * an environment ([`Env`]), which emits observations and rewards,
//! * an agent ([`Agent`]), which samples actions, turns whole episodes into
//!   gradient contributions and commits batched weight updates,
//! * a reporter ([`report::Reporter`]), which consumes per-batch statistics.
//!
//! [`Trainer`] drives these objects in an episode-batched loop that runs until
//! an iteration bound is reached or a [`CancelToken`] is triggered.
pub mod dummy;
pub mod error;
pub mod evaluator;
pub mod record;
pub mod report;
pub mod util;

mod base;
pub use base::{Act, Agent, EpisodeSummary, Env, Info, Obs, Policy, Step};

mod cancel;
pub use cancel::CancelToken;

mod trainer;
pub use trainer::{EpisodeStats, Phase, TrainStep, Trainer, TrainerConfig, TrainingSummary};
