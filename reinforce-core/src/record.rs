//! Types and traits for recording values obtained during training and evaluation.
//!
//! [`Record`] is a map from names to [`RecordValue`]s. Agents return a record
//! from every weight update and environments return one from every step.
//!
//! ```rust
//! use reinforce_core::record::{Record, RecordValue};
//!
//! // following values are obtained with some process in reality
//! let iteration = 1;
//! let grad_norm = 0.25f32;
//!
//! let mut record = Record::empty();
//! record.insert("iteration", RecordValue::Scalar(iteration as f32));
//! record.insert("grad_norm_w1", RecordValue::Scalar(grad_norm));
//! assert_eq!(record.get_scalar("grad_norm_w1").unwrap(), 0.25);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
