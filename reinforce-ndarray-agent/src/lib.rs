//! REINFORCE agent on a dense-array backend.
//!
//! The policy is a two-layer network without biases: a ReLU hidden layer
//! followed by a sigmoid output layer whose per-action scores are renormalized
//! by their sum into a categorical distribution. Gradients are derived by hand
//! for exactly this architecture and applied with RMSProp once per batch of
//! episodes.
pub mod pg;
