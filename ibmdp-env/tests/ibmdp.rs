//! Integration tests for the Iterative Bounding MDP transformer

use proptest::prelude::*;
use serde_json::Value;

use ibmdp_core::{
    Action, BoxSpace, DiscreteSpace, Environment, Result, Reward, RlError, Space, Step, StepInfo,
    VectorObservation,
};
use ibmdp_env::{make_env, CartPoleEnv, Ibmdp, PendulumEnv, TimeLimit};

/// A four-feature, two-action environment whose observation never changes.
/// Deterministic by construction, which makes bound arithmetic easy to
/// check.
struct FrozenEnv {
    observation: Vec<f64>,
    low: Vec<f64>,
    high: Vec<f64>,
    num_actions: usize,
    reward_range: Option<(f64, f64)>,
    base_steps: u64,
}

impl FrozenEnv {
    fn new(observation: Vec<f64>, low: Vec<f64>, high: Vec<f64>) -> Self {
        Self {
            observation,
            low,
            high,
            num_actions: 2,
            reward_range: None,
            base_steps: 0,
        }
    }

    fn bounded() -> Self {
        Self::new(
            vec![0.1, -0.3, 0.2, 0.0],
            vec![-1.0; 4],
            vec![1.0; 4],
        )
    }

    fn with_reward_range(mut self, min: f64, max: f64) -> Self {
        self.reward_range = Some((min, max));
        self
    }
}

impl Environment for FrozenEnv {
    fn observation_space(&self) -> Space {
        Space::Box(BoxSpace {
            low: self.low.clone(),
            high: self.high.clone(),
        })
    }

    fn action_space(&self) -> Space {
        Space::Discrete(DiscreteSpace::new(self.num_actions))
    }

    fn reward_range(&self) -> Option<(f64, f64)> {
        self.reward_range
    }

    fn reset(&mut self, _seed: Option<u64>) -> Result<(VectorObservation, StepInfo)> {
        let mut info = StepInfo::new();
        info.insert("tag", "reset");
        Ok((VectorObservation::new(self.observation.clone()), info))
    }

    fn step(&mut self, _action: &Action) -> Result<Step> {
        self.base_steps += 1;
        let mut info = StepInfo::new();
        info.insert("tag", "base");
        info.insert("base_steps", self.base_steps);
        Ok(Step {
            observation: VectorObservation::new(self.observation.clone()),
            reward: Reward(0.5),
            terminated: false,
            truncated: false,
            info,
        })
    }
}

/// Environment whose observation space is not a box; only used to exercise
/// construction-time rejection.
struct DiscreteObsEnv;

impl Environment for DiscreteObsEnv {
    fn observation_space(&self) -> Space {
        Space::Discrete(DiscreteSpace::new(16))
    }

    fn action_space(&self) -> Space {
        Space::Discrete(DiscreteSpace::new(2))
    }

    fn reset(&mut self, _seed: Option<u64>) -> Result<(VectorObservation, StepInfo)> {
        Ok((VectorObservation::new(vec![0.0]), StepInfo::new()))
    }

    fn step(&mut self, _action: &Action) -> Result<Step> {
        Ok(Step {
            observation: VectorObservation::new(vec![0.0]),
            reward: Reward(0.0),
            terminated: false,
            truncated: false,
            info: StepInfo::new(),
        })
    }
}

fn queries(pairs: &[(usize, f64)]) -> Vec<ibmdp_env::InfoGatheringAction> {
    pairs.iter().copied().map(Into::into).collect()
}

fn depth(info: &StepInfo) -> u64 {
    info.get("depth").and_then(Value::as_u64).unwrap()
}

#[test]
fn augmented_state_concatenates_observation_and_bounds() {
    let mut env = Ibmdp::new(FrozenEnv::bounded(), 1.0, queries(&[(0, 0.0), (1, 0.0)])).unwrap();
    let (state, info) = env.reset(None).unwrap();

    assert_eq!(state.len(), 12); // 4 base + 4 lower + 4 upper
    assert_eq!(&state.data[..4], &[0.1, -0.3, 0.2, 0.0]);
    assert_eq!(&state.data[4..8], &[-1.0; 4]);
    assert_eq!(&state.data[8..], &[1.0; 4]);
    assert_eq!(depth(&info), 0);
}

#[test]
fn action_space_covers_base_actions_and_queries() {
    let env = Ibmdp::new(FrozenEnv::bounded(), 1.0, queries(&[(0, 0.0), (1, 0.0)])).unwrap();
    assert_eq!(env.action_space().as_discrete().unwrap().n, 4);
}

#[test]
fn observation_space_tiles_the_clipped_bounds() {
    let env = Ibmdp::new(FrozenEnv::bounded(), 1.0, queries(&[(0, 0.0)])).unwrap();
    let space = env.observation_space();
    let space = space.as_box().unwrap();
    assert_eq!(space.len(), 12);
    assert_eq!(space.low, vec![-1.0; 12]);
    assert_eq!(space.high, vec![1.0; 12]);
}

#[test]
fn query_above_threshold_raises_the_lower_bound() {
    let mut env = Ibmdp::new(FrozenEnv::bounded(), 1.0, queries(&[(0, 0.0), (1, 0.0)])).unwrap();
    env.reset(None).unwrap();

    // Feature 0 is 0.1 > 0, so the query proves feature 0 > 0.
    let step = env.step(&Action::Discrete(2)).unwrap();
    assert_eq!(step.observation.data[4], 0.0); // lower bound of feature 0
    assert_eq!(step.observation.data[8], 1.0); // upper bound untouched
    assert_eq!(step.observation.data[5], -1.0); // feature 1 untouched
    assert_eq!(step.observation.data[9], 1.0);
    assert_eq!(step.reward, Reward(1.0));
    assert!(!step.terminated);
    assert!(!step.truncated);
    assert_eq!(depth(&step.info), 1);
}

#[test]
fn query_at_or_below_threshold_lowers_the_upper_bound() {
    let mut env = Ibmdp::new(FrozenEnv::bounded(), 1.0, queries(&[(0, 0.0), (1, 0.0)])).unwrap();
    env.reset(None).unwrap();

    // Feature 1 is -0.3 <= 0, so the query proves feature 1 <= 0.
    let step = env.step(&Action::Discrete(3)).unwrap();
    assert_eq!(step.observation.data[9], 0.0); // upper bound of feature 1
    assert_eq!(step.observation.data[5], -1.0); // lower bound untouched
}

#[test]
fn repeated_queries_are_idempotent() {
    let mut env = Ibmdp::new(FrozenEnv::bounded(), 1.0, queries(&[(0, 0.0)])).unwrap();
    env.reset(None).unwrap();

    let first = env.step(&Action::Discrete(2)).unwrap();
    let second = env.step(&Action::Discrete(2)).unwrap();
    assert_eq!(first.observation, second.observation);
    assert_eq!(depth(&second.info), 2); // depth still counts every query
}

#[test]
fn base_actions_rebuild_bounds_from_the_initial_vector() {
    let mut env = Ibmdp::new(FrozenEnv::bounded(), 1.0, queries(&[(0, 0.0), (1, 0.0)])).unwrap();
    env.reset(None).unwrap();

    env.step(&Action::Discrete(2)).unwrap();
    env.step(&Action::Discrete(3)).unwrap();

    let step = env.step(&Action::Discrete(0)).unwrap();
    assert_eq!(&step.observation.data[4..8], &[-1.0; 4]);
    assert_eq!(&step.observation.data[8..], &[1.0; 4]);
    assert_eq!(step.reward, Reward(0.5)); // base reward passes through
    // Base-action steps leave the depth counter alone.
    assert_eq!(depth(&step.info), 2);
}

#[test]
fn base_step_info_overrides_running_keys() {
    let mut env = Ibmdp::new(FrozenEnv::bounded(), 1.0, queries(&[(0, 0.0)])).unwrap();
    let (_state, info) = env.reset(None).unwrap();
    assert_eq!(info.get("tag").and_then(Value::as_str), Some("reset"));

    let step = env.step(&Action::Discrete(0)).unwrap();
    assert_eq!(step.info.get("tag").and_then(Value::as_str), Some("base"));
    assert_eq!(step.info.get("base_steps").and_then(Value::as_u64), Some(1));
}

#[test]
fn reset_reinitializes_bounds_every_episode() {
    let mut env = Ibmdp::new(FrozenEnv::bounded(), 1.0, queries(&[(0, 0.0)])).unwrap();
    env.reset(None).unwrap();
    env.step(&Action::Discrete(2)).unwrap();

    let (first, info) = env.reset(None).unwrap();
    assert_eq!(depth(&info), 0);
    let (second, _) = env.reset(None).unwrap();
    assert_eq!(&first.data[4..], &second.data[4..]);
    assert_eq!(&first.data[4..], env.initial_bounds());
}

#[test]
fn unbounded_dimensions_are_clamped_to_the_bounding_value() {
    let half_open = FrozenEnv::new(
        vec![0.0; 4],
        vec![-4.8, f64::NEG_INFINITY, -0.418, f64::NEG_INFINITY],
        vec![4.8, f64::INFINITY, 0.418, f64::INFINITY],
    );
    let env = Ibmdp::new(half_open, 1.0, queries(&[(0, 0.0)])).unwrap();
    assert_eq!(
        env.initial_bounds(),
        &[-4.8, -10.0, -0.418, -10.0, 4.8, 10.0, 0.418, 10.0]
    );

    let half_open = FrozenEnv::new(
        vec![0.0; 4],
        vec![-4.8, f64::NEG_INFINITY, -0.418, f64::NEG_INFINITY],
        vec![4.8, f64::INFINITY, 0.418, f64::INFINITY],
    );
    let env = Ibmdp::with_bounding_value(half_open, 1.0, queries(&[(0, 0.0)]), 5.0).unwrap();
    assert_eq!(
        env.initial_bounds(),
        &[-4.8, -5.0, -0.418, -5.0, 4.8, 5.0, 0.418, 5.0]
    );
}

#[test]
fn zeta_is_clamped_into_the_declared_reward_range() {
    let env = Ibmdp::new(
        FrozenEnv::bounded().with_reward_range(0.0, 1.0),
        10_000.0,
        queries(&[(0, 0.0)]),
    )
    .unwrap();
    assert_eq!(env.zeta(), 1.0);

    let mut env = Ibmdp::new(
        FrozenEnv::bounded().with_reward_range(0.0, 1.0),
        -5.0,
        queries(&[(0, 0.0)]),
    )
    .unwrap();
    assert_eq!(env.zeta(), 0.0);
    env.reset(None).unwrap();
    let step = env.step(&Action::Discrete(2)).unwrap();
    assert_eq!(step.reward, Reward(0.0));
}

#[test]
fn construction_rejects_continuous_action_spaces() {
    let result = Ibmdp::new(PendulumEnv::new(), 1.0, queries(&[(0, 0.0)]));
    assert!(matches!(
        result,
        Err(RlError::UnsupportedSpace {
            context: "action",
            ..
        })
    ));
}

#[test]
fn construction_rejects_non_box_observation_spaces() {
    let result = Ibmdp::new(DiscreteObsEnv, 1.0, queries(&[(0, 0.0)]));
    assert!(matches!(
        result,
        Err(RlError::UnsupportedSpace {
            context: "observation",
            ..
        })
    ));
}

#[test]
fn construction_rejects_out_of_range_feature_indices() {
    let result = Ibmdp::new(FrozenEnv::bounded(), 1.0, queries(&[(10_000, 0.0)]));
    assert!(matches!(
        result,
        Err(RlError::FeatureIndexOutOfRange {
            index: 10_000,
            num_features: 4,
        })
    ));
}

#[test]
fn construction_rejects_non_finite_thresholds() {
    let result = Ibmdp::new(FrozenEnv::bounded(), 1.0, queries(&[(0, f64::NAN)]));
    assert!(matches!(result, Err(RlError::NonFiniteValue { .. })));
}

#[test]
fn construction_rejects_non_finite_zeta() {
    let result = Ibmdp::new(FrozenEnv::bounded(), f64::NAN, queries(&[(0, 0.0)]));
    assert!(matches!(
        result,
        Err(RlError::NonFiniteValue { name: "zeta", .. })
    ));

    let result = Ibmdp::new(FrozenEnv::bounded(), f64::INFINITY, queries(&[(0, 0.0)]));
    assert!(matches!(result, Err(RlError::NonFiniteValue { .. })));
}

#[test]
fn invalid_actions_are_rejected_at_step_time() {
    let mut env = Ibmdp::new(FrozenEnv::bounded(), 1.0, queries(&[(0, 0.0)])).unwrap();
    env.reset(None).unwrap();
    assert!(matches!(
        env.step(&Action::Discrete(3)),
        Err(RlError::InvalidAction(_))
    ));
    assert!(matches!(
        env.step(&Action::Continuous(vec![0.0])),
        Err(RlError::InvalidAction(_))
    ));
}

#[test]
fn registry_environments_can_be_wrapped() {
    let base = make_env("cartpole").unwrap();
    let mut env = Ibmdp::new(base, -0.1, queries(&[(0, 0.0), (2, 0.0)])).unwrap();
    let (state, _info) = env.reset(Some(0)).unwrap();
    assert_eq!(state.len(), 12);
}

/// Port of the reference smoke test: a long random rollout over CartPole,
/// resetting whenever the episode ends, with the bound invariant checked at
/// every step.
#[test]
fn random_rollout_on_cartpole_keeps_bounds_ordered() {
    let env = Ibmdp::new(CartPoleEnv::new(), 1.0, queries(&[(0, 0.0), (1, 0.0)])).unwrap();
    let num_features = env.num_base_features();
    let mut env = TimeLimit::new(env, 200);

    let action_space = env.action_space();
    env.reset(Some(0)).unwrap();
    for _ in 0..1000 {
        let step = env.step(&action_space.sample()).unwrap();
        assert_eq!(step.observation.len(), 3 * num_features);
        for i in 0..num_features {
            let lower = step.observation.data[num_features + i];
            let upper = step.observation.data[2 * num_features + i];
            assert!(lower <= upper, "bounds crossed for feature {i}");
        }
        if step.terminated || step.truncated {
            env.reset(None).unwrap();
        }
    }
}

proptest! {
    /// For arbitrary observations, query tables, and action sequences, the
    /// bound portion of the augmented state stays ordered and only ever
    /// tightens between consecutive steps of the same episode.
    #[test]
    fn bounds_tighten_monotonically(
        observation in prop::collection::vec(-1.0f64..1.0, 4),
        table in prop::collection::vec((0usize..4, -2.0f64..2.0), 1..4),
        actions in prop::collection::vec(0usize..8, 1..40),
    ) {
        let base = FrozenEnv::new(observation, vec![-2.0; 4], vec![2.0; 4]);
        let num_actions = 2 + table.len();
        let mut env = Ibmdp::new(base, 0.0, queries(&table)).unwrap();

        let (state, _info) = env.reset(None).unwrap();
        let mut previous = state.data;

        for action in actions {
            let step = env.step(&Action::Discrete(action % num_actions)).unwrap();
            let current = step.observation.data.clone();

            for i in 0..4 {
                prop_assert!(current[4 + i] <= current[8 + i]);
            }
            if action % num_actions >= 2 {
                // Info-gathering steps never loosen any bound.
                for i in 0..4 {
                    prop_assert!(current[4 + i] >= previous[4 + i]);
                    prop_assert!(current[8 + i] <= previous[8 + i]);
                }
            }
            previous = current;
        }
    }
}
