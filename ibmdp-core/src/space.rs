//! Runtime space descriptors

use serde::{Deserialize, Serialize};

use crate::{Action, BoxSpace, DiscreteSpace};

/// Descriptor for an environment's observation or action space.
///
/// Consumers that only support a particular space kind match on this value
/// at construction time and reject anything else with a typed error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Space {
    /// Continuous bounded vector space
    Box(BoxSpace),
    /// Discrete space with contiguous integer indices
    Discrete(DiscreteSpace),
}

impl Space {
    /// Short name of the space kind, for error reporting
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Box(_) => "box",
            Self::Discrete(_) => "discrete",
        }
    }

    /// Downcast to a box space
    #[must_use]
    pub fn as_box(&self) -> Option<&BoxSpace> {
        match self {
            Self::Box(space) => Some(space),
            Self::Discrete(_) => None,
        }
    }

    /// Downcast to a discrete space
    #[must_use]
    pub fn as_discrete(&self) -> Option<&DiscreteSpace> {
        match self {
            Self::Discrete(space) => Some(space),
            Self::Box(_) => None,
        }
    }

    /// Sample an action uniformly from the space
    #[must_use]
    pub fn sample(&self) -> Action {
        match self {
            Self::Box(space) => Action::Continuous(space.sample()),
            Self::Discrete(space) => Action::Discrete(space.sample()),
        }
    }
}
