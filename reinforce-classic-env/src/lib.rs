//! Classic-control environments implemented natively in Rust.
//!
//! ```
//! use anyhow::Result;
//! use reinforce_classic_env::{CartPole, CartPoleConfig, ClassicAct};
//! use reinforce_core::Env as _;
//!
//! fn main() -> Result<()> {
//!     let mut env = CartPole::build(&CartPoleConfig::default(), 42)?;
//!     let mut obs = env.reset()?;
//!     let mut steps = 0;
//!     loop {
//!         // push the cart toward the side the pole leans to
//!         let act = ClassicAct::new(if obs.0[2] > 0.0 { 1 } else { 0 });
//!         let (step, _) = env.step(&act)?;
//!         steps += 1;
//!         if step.is_done() {
//!             break;
//!         }
//!         obs = step.obs;
//!     }
//!     assert!(steps <= 200);
//!     Ok(())
//! }
//! ```
mod act;
mod cartpole;
mod obs;
pub use act::ClassicAct;
pub use cartpole::{CartPole, CartPoleConfig};
pub use obs::ClassicObs;
