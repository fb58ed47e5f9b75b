//! Iterative Bounding MDP environments
//!
//! This crate provides:
//! - the [`Ibmdp`] transformer, which wraps a factored MDP so the agent can
//!   pay a penalty to query bounds on individual state features,
//! - classic control environments used as base factored MDPs,
//! - a [`TimeLimit`] truncation wrapper,
//! - a name-based environment registry.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bounds;
pub mod classic;
pub mod ibmdp;
pub mod registry;
pub mod wrappers;

// Re-export environments and the transformer
pub use bounds::{clip_to_finite, unbounded_dims, UNBOUNDED_SENTINEL};
pub use classic::{
    CartPoleConfig, CartPoleEnv, MountainCarConfig, MountainCarEnv, PendulumConfig, PendulumEnv,
};
pub use ibmdp::{Ibmdp, InfoGatheringAction, DEFAULT_BOUNDING_VALUE};
pub use registry::{list_envs, make_env, register_env, EnvRegistry};
pub use wrappers::TimeLimit;

// Re-export core types
pub use ibmdp_core::{
    Action, BoxSpace, DiscreteSpace, Environment, Result, Reward, RlError, Space, Step, StepInfo,
    VectorObservation,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{CartPoleEnv, Ibmdp, InfoGatheringAction, TimeLimit};
    pub use ibmdp_core::prelude::*;
}
