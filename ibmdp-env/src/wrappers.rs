//! Environment wrappers for common transformations

use ibmdp_core::{Action, Environment, Result, Space, Step, StepInfo, VectorObservation};

/// Time limit wrapper: truncates episodes after a fixed number of steps.
///
/// Truncation is reported through the `truncated` flag; `terminated` is
/// left untouched so consumers can tell the two apart.
pub struct TimeLimit<E> {
    /// Inner environment
    pub env: E,
    /// Maximum steps per episode
    pub max_steps: usize,
    /// Steps taken in the current episode
    pub steps: usize,
}

impl<E> TimeLimit<E> {
    /// Create a new time limit wrapper
    pub fn new(env: E, max_steps: usize) -> Self {
        Self {
            env,
            max_steps,
            steps: 0,
        }
    }
}

impl<E: Environment> Environment for TimeLimit<E> {
    fn observation_space(&self) -> Space {
        self.env.observation_space()
    }

    fn action_space(&self) -> Space {
        self.env.action_space()
    }

    fn reward_range(&self) -> Option<(f64, f64)> {
        self.env.reward_range()
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<(VectorObservation, StepInfo)> {
        self.steps = 0;
        self.env.reset(seed)
    }

    fn step(&mut self, action: &Action) -> Result<Step> {
        self.steps += 1;
        let mut step = self.env.step(action)?;

        if self.steps >= self.max_steps && !step.terminated {
            step.truncated = true;
        }

        Ok(step)
    }
}
