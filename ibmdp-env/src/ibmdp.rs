//! The Iterative Bounding MDP transformer
//!
//! Wraps a factored MDP (continuous box observations, discrete actions) so
//! that the agent can pay a penalty to query bounds on individual state
//! features before acting. The augmented state concatenates the base
//! observation with running lower and upper bound estimates for every
//! feature; the action space grows by one pseudo-action per configured
//! query. Learning a policy over this augmented environment yields decision
//! policies that can be read off as threshold tests on single features.
//!
//! See Topin et al., "Iterative Bounding MDPs: Learning Interpretable
//! Policies via Non-Interpretable Methods" (<https://arxiv.org/abs/2102.13045>).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use ibmdp_core::{
    Action, BoxSpace, DiscreteSpace, Environment, Result, Reward, RlError, Space, Step, StepInfo,
    VectorObservation,
};

use crate::bounds::clip_to_finite;

/// Default clamp magnitude for unbounded observation dimensions
pub const DEFAULT_BOUNDING_VALUE: f64 = 10.0;

/// Info key holding the current bounds snapshot (lowers then uppers)
const PARTIAL_OBS_KEY: &str = "partial_obs";
/// Info key counting info-gathering actions taken this episode
const DEPTH_KEY: &str = "depth";

/// An information-gathering pseudo-action asking `feature <= threshold?`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InfoGatheringAction {
    /// Index of the base feature the query targets
    pub feature: usize,
    /// Threshold the feature is compared against
    pub threshold: f64,
}

impl From<(usize, f64)> for InfoGatheringAction {
    fn from((feature, threshold): (usize, f64)) -> Self {
        Self { feature, threshold }
    }
}

/// Environment transformer that turns a factored MDP into an Iterative
/// Bounding MDP.
///
/// Action indices `0..A` forward to the base environment; indices
/// `A..A+K` execute the configured info-gathering queries in table order.
pub struct Ibmdp<E> {
    base: E,
    zeta: f64,
    info_actions: Vec<InfoGatheringAction>,
    num_base_actions: usize,
    num_base_features: usize,
    /// Construction-time bounds, lowers then uppers; every episode starts
    /// from this vector
    init_bounds: Vec<f64>,
    observation_space: BoxSpace,
    state: Vec<f64>,
    info: StepInfo,
}

impl<E: Environment> Ibmdp<E> {
    /// Wrap `base` with the default bounding value.
    ///
    /// # Errors
    ///
    /// See [`Ibmdp::with_bounding_value`].
    pub fn new(
        base: E,
        zeta: f64,
        info_gathering_actions: Vec<InfoGatheringAction>,
    ) -> Result<Self> {
        Self::with_bounding_value(base, zeta, info_gathering_actions, DEFAULT_BOUNDING_VALUE)
    }

    /// Wrap `base`, clamping unbounded observation dimensions to
    /// `bounding_value`.
    ///
    /// # Errors
    ///
    /// - [`RlError::UnsupportedSpace`] when the base observation space is
    ///   not a box or its action space is not discrete;
    /// - [`RlError::FeatureIndexOutOfRange`] when a query targets a feature
    ///   the base observation does not have;
    /// - [`RlError::NonFiniteValue`] when a query threshold or `zeta` is
    ///   NaN or infinite.
    pub fn with_bounding_value(
        base: E,
        zeta: f64,
        info_gathering_actions: Vec<InfoGatheringAction>,
        bounding_value: f64,
    ) -> Result<Self> {
        let base_obs_space = match base.observation_space() {
            Space::Box(space) => space,
            other => {
                return Err(RlError::UnsupportedSpace {
                    context: "observation",
                    expected: "box",
                    actual: other.kind(),
                })
            }
        };
        let num_base_actions = match base.action_space() {
            Space::Discrete(space) => space.n,
            other => {
                return Err(RlError::UnsupportedSpace {
                    context: "action",
                    expected: "discrete",
                    actual: other.kind(),
                })
            }
        };

        let num_base_features = base_obs_space.len();
        for action in &info_gathering_actions {
            if action.feature >= num_base_features {
                return Err(RlError::FeatureIndexOutOfRange {
                    index: action.feature,
                    num_features: num_base_features,
                });
            }
            if !action.threshold.is_finite() {
                return Err(RlError::NonFiniteValue {
                    name: "info-gathering threshold",
                    value: action.threshold,
                });
            }
        }
        if !zeta.is_finite() {
            return Err(RlError::NonFiniteValue {
                name: "zeta",
                value: zeta,
            });
        }

        let (low, high) = clip_to_finite(&base_obs_space, bounding_value);
        let mut init_bounds = low.clone();
        init_bounds.extend_from_slice(&high);

        // Augmented observations are base features followed by lower and
        // upper bounds, so the space tiles the clipped bounds three times.
        let observation_space = BoxSpace::new(tile3(&low), tile3(&high))?;

        let zeta = match base.reward_range() {
            Some((min, max)) => {
                let clamped = zeta.clamp(min, max);
                if (clamped - zeta).abs() > f64::EPSILON {
                    debug!(zeta, clamped, "clamped zeta into base reward range");
                }
                clamped
            }
            None => zeta,
        };

        debug!(
            num_base_features,
            num_base_actions,
            num_info_actions = info_gathering_actions.len(),
            "built iterative bounding mdp"
        );

        let mut state = vec![0.0; num_base_features];
        state.extend_from_slice(&init_bounds);

        Ok(Self {
            base,
            zeta,
            info_actions: info_gathering_actions,
            num_base_actions,
            num_base_features,
            init_bounds,
            observation_space,
            state,
            info: StepInfo::new(),
        })
    }

    /// Penalty charged per info-gathering action, after reward-range
    /// clamping
    #[must_use]
    pub fn zeta(&self) -> f64 {
        self.zeta
    }

    /// Number of actions forwarded to the base environment
    #[must_use]
    pub fn num_base_actions(&self) -> usize {
        self.num_base_actions
    }

    /// Number of features in the base observation vector
    #[must_use]
    pub fn num_base_features(&self) -> usize {
        self.num_base_features
    }

    /// The construction-time bounds vector (lowers then uppers) every
    /// episode starts from
    #[must_use]
    pub fn initial_bounds(&self) -> &[f64] {
        &self.init_bounds
    }

    /// Shared reference to the wrapped environment
    pub fn base(&self) -> &E {
        &self.base
    }

    /// Current bounds portion of the augmented state
    fn bounds_slice(&self) -> &[f64] {
        &self.state[self.num_base_features..]
    }
}

impl<E: Environment> Environment for Ibmdp<E> {
    fn observation_space(&self) -> Space {
        Space::Box(self.observation_space.clone())
    }

    fn action_space(&self) -> Space {
        Space::Discrete(DiscreteSpace::new(
            self.num_base_actions + self.info_actions.len(),
        ))
    }

    fn reward_range(&self) -> Option<(f64, f64)> {
        self.base.reward_range()
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<(VectorObservation, StepInfo)> {
        let (observation, info) = self.base.reset(seed)?;

        self.state = observation.data;
        self.state.extend_from_slice(&self.init_bounds);

        self.info = info;
        self.info.insert(PARTIAL_OBS_KEY, self.init_bounds.clone());
        self.info.insert(DEPTH_KEY, 0);

        Ok((VectorObservation::new(self.state.clone()), self.info.clone()))
    }

    fn step(&mut self, action: &Action) -> Result<Step> {
        let index = match action {
            Action::Discrete(index) => *index,
            Action::Continuous(_) => {
                return Err(RlError::InvalidAction(
                    "iterative bounding mdp only accepts discrete actions".into(),
                ))
            }
        };

        if index < self.num_base_actions {
            let step = self.base.step(action)?;
            self.info.merge(step.info);

            // Taking a base action rebuilds the bound portion from the
            // construction-time bounds instead of carrying the tightened
            // bounds forward. Downstream policies depend on this contract;
            // do not carry bounds across base actions.
            self.state = step.observation.data;
            self.state.extend_from_slice(&self.init_bounds);

            Ok(Step {
                observation: VectorObservation::new(self.state.clone()),
                reward: step.reward,
                terminated: step.terminated,
                truncated: step.truncated,
                info: self.info.clone(),
            })
        } else if index < self.num_base_actions + self.info_actions.len() {
            let InfoGatheringAction { feature, threshold } =
                self.info_actions[index - self.num_base_actions];
            let value = self.state[feature];
            let offset = self.num_base_features;

            // Bounds only ever tighten: min for uppers, max for lowers, so
            // lower <= upper is preserved.
            if value <= threshold {
                let upper = &mut self.state[2 * offset + feature];
                *upper = upper.min(threshold);
            } else {
                let lower = &mut self.state[offset + feature];
                *lower = lower.max(threshold);
            }

            let depth = self.info.get(DEPTH_KEY).and_then(Value::as_u64).unwrap_or(0);
            let snapshot = self.bounds_slice().to_vec();
            self.info.insert(PARTIAL_OBS_KEY, snapshot);
            self.info.insert(DEPTH_KEY, depth + 1);

            Ok(Step {
                observation: VectorObservation::new(self.state.clone()),
                reward: Reward(self.zeta),
                terminated: false,
                truncated: false,
                info: self.info.clone(),
            })
        } else {
            Err(RlError::InvalidAction(format!(
                "action index {index} out of range for {} actions",
                self.num_base_actions + self.info_actions.len()
            )))
        }
    }
}

fn tile3(values: &[f64]) -> Vec<f64> {
    let mut tiled = Vec::with_capacity(values.len() * 3);
    for _ in 0..3 {
        tiled.extend_from_slice(values);
    }
    tiled
}
