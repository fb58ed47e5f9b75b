//! Environment trait and step types

use serde::{Deserialize, Serialize};

use crate::{Action, Reward, Space, VectorObservation};

/// Result of a single environment step
#[derive(Debug, Clone)]
pub struct Step {
    /// Observation after the step
    pub observation: VectorObservation,
    /// Reward signal
    pub reward: Reward,
    /// Whether the episode reached a terminal state
    pub terminated: bool,
    /// Whether the episode was cut off (e.g. time limit)
    pub truncated: bool,
    /// Additional info from the environment
    pub info: StepInfo,
}

/// Auxiliary metadata carried alongside reset and step results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepInfo {
    /// Custom fields
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl StepInfo {
    /// Create an empty info map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Look up a value by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }

    /// Merge another info map into this one; keys in `other` override
    /// same-named keys already present.
    pub fn merge(&mut self, other: StepInfo) {
        self.fields.extend(other.fields);
    }
}

/// Core environment trait.
///
/// Interaction is synchronous and strictly sequential: each `reset`/`step`
/// call runs to completion before returning, and a single instance must not
/// be stepped from multiple call sites concurrently.
pub trait Environment: Send + Sync {
    /// Get the observation space descriptor
    fn observation_space(&self) -> Space;

    /// Get the action space descriptor
    fn action_space(&self) -> Space;

    /// Declared (min, max) reward range, if the environment has one
    fn reward_range(&self) -> Option<(f64, f64)> {
        None
    }

    /// Reset the environment, optionally reseeding its RNG
    ///
    /// # Errors
    ///
    /// Propagates any fault the environment hits while reinitializing.
    fn reset(&mut self, seed: Option<u64>) -> crate::Result<(VectorObservation, StepInfo)>;

    /// Take a step in the environment
    ///
    /// # Errors
    ///
    /// Returns [`crate::RlError::InvalidAction`] when the action does not
    /// belong to the environment's action space.
    fn step(&mut self, action: &Action) -> crate::Result<Step>;
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn observation_space(&self) -> Space {
        (**self).observation_space()
    }

    fn action_space(&self) -> Space {
        (**self).action_space()
    }

    fn reward_range(&self) -> Option<(f64, f64)> {
        (**self).reward_range()
    }

    fn reset(&mut self, seed: Option<u64>) -> crate::Result<(VectorObservation, StepInfo)> {
        (**self).reset(seed)
    }

    fn step(&mut self, action: &Action) -> crate::Result<Step> {
        (**self).step(action)
    }
}
