//! Progress reporting.
//!
//! [`Trainer`](crate::Trainer) hands the statistics of every batch to a
//! [`Reporter`] and, every `report_interval` batches, the history of mean
//! batch rewards.
mod base;
mod csv_reporter;
mod log_reporter;
mod multi_reporter;

pub use base::{IterationStats, Reporter};
pub use csv_reporter::CsvReporter;
pub use log_reporter::{draw_curve, LogReporter};
pub use multi_reporter::MultiReporter;
