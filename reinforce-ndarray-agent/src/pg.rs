//! REINFORCE policy gradient.
mod base;
mod config;
mod gradient;
mod network;
mod returns;
mod rmsprop;
mod sampler;
mod trajectory;
pub use base::Pg;
pub use config::{DegenerateReturns, PgConfig};
pub use gradient::{build_gradient, error_signal, one_hot};
pub use network::{Gradients, PolicyNetwork};
pub use returns::{discount_rewards, standardize};
pub use rmsprop::RmsProp;
pub use sampler::{greedy, normalize, sample};
pub use trajectory::{collect, Trajectory};
