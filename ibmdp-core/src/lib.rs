//! Core environment traits and types for the IBMDP toolkit
//!
//! This crate provides the foundational abstractions shared by the
//! Iterative Bounding MDP transformer and the environments it wraps:
//! vector observations, box and discrete spaces, a synchronous
//! `Environment` trait, and the common error type.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod environment;
pub mod error;
pub mod observation;
pub mod reward;
pub mod space;

// Re-export core traits and types
pub use action::{Action, DiscreteSpace};
pub use environment::{Environment, Step, StepInfo};
pub use error::{Result, RlError};
pub use observation::{BoxSpace, VectorObservation};
pub use reward::Reward;
pub use space::Space;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Action, BoxSpace, DiscreteSpace, Environment, Result, Reward, Space, Step, StepInfo,
        VectorObservation,
    };
}
