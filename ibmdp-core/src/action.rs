//! Actions and discrete action spaces

use rand::Rng;
use serde::{Deserialize, Serialize};

/// An action submitted to an environment.
///
/// Environments with discrete action spaces expect `Discrete` indices;
/// continuous-control environments expect a `Continuous` value vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Index into a discrete action space
    Discrete(usize),
    /// Value vector for a continuous action space
    Continuous(Vec<f64>),
}

impl From<usize> for Action {
    fn from(index: usize) -> Self {
        Self::Discrete(index)
    }
}

/// Discrete action space with contiguous indices `0..n`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteSpace {
    /// Number of discrete actions
    pub n: usize,
}

impl DiscreteSpace {
    /// Create a new discrete action space
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// Sample an action index uniformly at random
    #[must_use]
    pub fn sample(&self) -> usize {
        rand::thread_rng().gen_range(0..self.n)
    }

    /// Check if an action index is valid within this space
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        index < self.n
    }
}
