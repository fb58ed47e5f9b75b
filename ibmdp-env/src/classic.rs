//! Classic control environments
//!
//! Factored MDPs with vector observations, used as base environments for
//! the Iterative Bounding MDP transformer. Truncation is not handled here;
//! wrap with [`crate::wrappers::TimeLimit`] for bounded episodes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ibmdp_core::{
    Action, BoxSpace, DiscreteSpace, Environment, Result, Reward, RlError, Space, Step, StepInfo,
    VectorObservation,
};

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// CartPole environment: balance a pole on a cart by pushing left or right
pub struct CartPoleEnv {
    state: CartPoleState,
    config: CartPoleConfig,
    rng: StdRng,
}

#[derive(Debug, Clone)]
struct CartPoleState {
    x: f64,
    x_dot: f64,
    theta: f64,
    theta_dot: f64,
}

/// Physical constants of the cart-pole system
#[derive(Debug, Clone)]
pub struct CartPoleConfig {
    /// Gravitational acceleration
    pub gravity: f64,
    /// Mass of the cart
    pub mass_cart: f64,
    /// Mass of the pole
    pub mass_pole: f64,
    /// Half-length of the pole
    pub length: f64,
    /// Magnitude of the force applied per push
    pub force_mag: f64,
    /// Cart position beyond which the episode terminates
    pub x_threshold: f64,
    /// Pole angle (radians) beyond which the episode terminates
    pub theta_threshold: f64,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            mass_cart: 1.0,
            mass_pole: 0.1,
            length: 0.5,
            force_mag: 10.0,
            x_threshold: 2.4,
            theta_threshold: 0.209, // ~12 degrees
        }
    }
}

impl CartPoleEnv {
    /// Create a CartPole environment with default physics
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CartPoleConfig::default())
    }

    /// Create a CartPole environment with custom physics
    #[must_use]
    pub fn with_config(config: CartPoleConfig) -> Self {
        Self {
            state: CartPoleState {
                x: 0.0,
                x_dot: 0.0,
                theta: 0.0,
                theta_dot: 0.0,
            },
            config,
            rng: make_rng(None),
        }
    }

    fn observation(&self) -> VectorObservation {
        VectorObservation::new(vec![
            self.state.x,
            self.state.x_dot,
            self.state.theta,
            self.state.theta_dot,
        ])
    }

    fn is_terminated(&self) -> bool {
        self.state.x.abs() > self.config.x_threshold
            || self.state.theta.abs() > self.config.theta_threshold
    }
}

impl Default for CartPoleEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for CartPoleEnv {
    fn observation_space(&self) -> Space {
        // Velocities are unbounded, matching the published environment.
        let high = vec![
            self.config.x_threshold * 2.0,
            f64::INFINITY,
            self.config.theta_threshold * 2.0,
            f64::INFINITY,
        ];
        let low = high.iter().map(|&x| -x).collect();
        Space::Box(BoxSpace { low, high })
    }

    fn action_space(&self) -> Space {
        Space::Discrete(DiscreteSpace::new(2)) // 0: push left, 1: push right
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<(VectorObservation, StepInfo)> {
        if seed.is_some() {
            self.rng = make_rng(seed);
        }
        self.state = CartPoleState {
            x: self.rng.gen_range(-0.05..0.05),
            x_dot: self.rng.gen_range(-0.05..0.05),
            theta: self.rng.gen_range(-0.05..0.05),
            theta_dot: self.rng.gen_range(-0.05..0.05),
        };
        Ok((self.observation(), StepInfo::new()))
    }

    fn step(&mut self, action: &Action) -> Result<Step> {
        let force = match action {
            Action::Discrete(1) => self.config.force_mag,
            Action::Discrete(0) => -self.config.force_mag,
            other => {
                return Err(RlError::InvalidAction(format!(
                    "cart-pole expects discrete action 0 or 1, got {other:?}"
                )))
            }
        };

        let cos_theta = self.state.theta.cos();
        let sin_theta = self.state.theta.sin();

        let total_mass = self.config.mass_cart + self.config.mass_pole;
        let pole_mass_length = self.config.mass_pole * self.config.length;

        let temp =
            (force + pole_mass_length * self.state.theta_dot.powi(2) * sin_theta) / total_mass;
        let theta_acc = (self.config.gravity * sin_theta - cos_theta * temp)
            / (self.config.length
                * (4.0 / 3.0 - self.config.mass_pole * cos_theta.powi(2) / total_mass));
        let x_acc = temp - pole_mass_length * theta_acc * cos_theta / total_mass;

        let dt = 0.02;
        self.state.x += dt * self.state.x_dot;
        self.state.x_dot += dt * x_acc;
        self.state.theta += dt * self.state.theta_dot;
        self.state.theta_dot += dt * theta_acc;

        Ok(Step {
            observation: self.observation(),
            reward: Reward(1.0), // 1 for every step survived
            terminated: self.is_terminated(),
            truncated: false,
            info: StepInfo::new(),
        })
    }
}

/// Mountain Car environment: drive an underpowered car up a hill
pub struct MountainCarEnv {
    state: MountainCarState,
    config: MountainCarConfig,
    rng: StdRng,
}

#[derive(Debug, Clone)]
struct MountainCarState {
    position: f64,
    velocity: f64,
}

/// Physical constants of the mountain-car system
#[derive(Debug, Clone)]
pub struct MountainCarConfig {
    /// Leftmost reachable position
    pub min_position: f64,
    /// Rightmost reachable position
    pub max_position: f64,
    /// Speed cap in either direction
    pub max_speed: f64,
    /// Position at which the goal is reached
    pub goal_position: f64,
    /// Minimum velocity required at the goal
    pub goal_velocity: f64,
    /// Acceleration per engine push
    pub force: f64,
    /// Gravitational pull along the slope
    pub gravity: f64,
}

impl Default for MountainCarConfig {
    fn default() -> Self {
        Self {
            min_position: -1.2,
            max_position: 0.6,
            max_speed: 0.07,
            goal_position: 0.5,
            goal_velocity: 0.0,
            force: 0.001,
            gravity: 0.0025,
        }
    }
}

impl MountainCarEnv {
    /// Create a Mountain Car environment with default physics
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MountainCarConfig::default())
    }

    /// Create a Mountain Car environment with custom physics
    #[must_use]
    pub fn with_config(config: MountainCarConfig) -> Self {
        Self {
            state: MountainCarState {
                position: -0.5,
                velocity: 0.0,
            },
            config,
            rng: make_rng(None),
        }
    }

    fn observation(&self) -> VectorObservation {
        VectorObservation::new(vec![self.state.position, self.state.velocity])
    }
}

impl Default for MountainCarEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for MountainCarEnv {
    fn observation_space(&self) -> Space {
        Space::Box(BoxSpace {
            low: vec![self.config.min_position, -self.config.max_speed],
            high: vec![self.config.max_position, self.config.max_speed],
        })
    }

    fn action_space(&self) -> Space {
        Space::Discrete(DiscreteSpace::new(3)) // 0: push left, 1: no push, 2: push right
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<(VectorObservation, StepInfo)> {
        if seed.is_some() {
            self.rng = make_rng(seed);
        }
        self.state = MountainCarState {
            position: self.rng.gen_range(-0.6..-0.4),
            velocity: 0.0,
        };
        Ok((self.observation(), StepInfo::new()))
    }

    fn step(&mut self, action: &Action) -> Result<Step> {
        let force = match action {
            Action::Discrete(0) => -1.0,
            Action::Discrete(1) => 0.0,
            Action::Discrete(2) => 1.0,
            other => {
                return Err(RlError::InvalidAction(format!(
                    "mountain-car expects discrete action 0, 1 or 2, got {other:?}"
                )))
            }
        };

        self.state.velocity +=
            force * self.config.force + self.state.position.cos() * (-self.config.gravity);
        self.state.velocity = self
            .state
            .velocity
            .clamp(-self.config.max_speed, self.config.max_speed);

        self.state.position += self.state.velocity;
        self.state.position = self
            .state
            .position
            .clamp(self.config.min_position, self.config.max_position);

        // The car stops dead against the left wall.
        if self.state.position <= self.config.min_position {
            self.state.velocity = 0.0;
        }

        let terminated = self.state.position >= self.config.goal_position
            && self.state.velocity >= self.config.goal_velocity;
        let reward = if terminated { 0.0 } else { -1.0 };

        Ok(Step {
            observation: self.observation(),
            reward: Reward(reward),
            terminated,
            truncated: false,
            info: StepInfo::new(),
        })
    }
}

/// Pendulum environment: swing a pendulum upright with continuous torque.
///
/// The action space is continuous, so this environment cannot be wrapped by
/// the Iterative Bounding MDP transformer; it exists as the canonical
/// rejection case and as a continuous-control test bed.
pub struct PendulumEnv {
    state: PendulumState,
    config: PendulumConfig,
    rng: StdRng,
}

#[derive(Debug, Clone)]
struct PendulumState {
    theta: f64,
    theta_dot: f64,
}

/// Physical constants of the pendulum system
#[derive(Debug, Clone)]
pub struct PendulumConfig {
    /// Gravitational acceleration
    pub gravity: f64,
    /// Pendulum mass
    pub mass: f64,
    /// Pendulum length
    pub length: f64,
    /// Angular speed cap
    pub max_speed: f64,
    /// Torque cap in either direction
    pub max_torque: f64,
    /// Integration time step
    pub dt: f64,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            gravity: 10.0,
            mass: 1.0,
            length: 1.0,
            max_speed: 8.0,
            max_torque: 2.0,
            dt: 0.05,
        }
    }
}

impl PendulumEnv {
    /// Create a Pendulum environment with default physics
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PendulumConfig::default())
    }

    /// Create a Pendulum environment with custom physics
    #[must_use]
    pub fn with_config(config: PendulumConfig) -> Self {
        Self {
            state: PendulumState {
                theta: 0.0,
                theta_dot: 0.0,
            },
            config,
            rng: make_rng(None),
        }
    }

    fn observation(&self) -> VectorObservation {
        VectorObservation::new(vec![
            self.state.theta.cos(),
            self.state.theta.sin(),
            self.state.theta_dot,
        ])
    }
}

impl Default for PendulumEnv {
    fn default() -> Self {
        Self::new()
    }
}

fn angle_normalize(theta: f64) -> f64 {
    (theta + std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI) - std::f64::consts::PI
}

impl Environment for PendulumEnv {
    fn observation_space(&self) -> Space {
        Space::Box(BoxSpace {
            low: vec![-1.0, -1.0, -self.config.max_speed],
            high: vec![1.0, 1.0, self.config.max_speed],
        })
    }

    fn action_space(&self) -> Space {
        Space::Box(BoxSpace {
            low: vec![-self.config.max_torque],
            high: vec![self.config.max_torque],
        })
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<(VectorObservation, StepInfo)> {
        if seed.is_some() {
            self.rng = make_rng(seed);
        }
        self.state = PendulumState {
            theta: self.rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI),
            theta_dot: self.rng.gen_range(-1.0..1.0),
        };
        Ok((self.observation(), StepInfo::new()))
    }

    fn step(&mut self, action: &Action) -> Result<Step> {
        let torque = match action {
            Action::Continuous(values) if values.len() == 1 => {
                values[0].clamp(-self.config.max_torque, self.config.max_torque)
            }
            other => {
                return Err(RlError::InvalidAction(format!(
                    "pendulum expects a one-dimensional continuous action, got {other:?}"
                )))
            }
        };

        let PendulumConfig {
            gravity,
            mass,
            length,
            max_speed,
            dt,
            ..
        } = self.config.clone();

        let cost = angle_normalize(self.state.theta).powi(2)
            + 0.1 * self.state.theta_dot.powi(2)
            + 0.001 * torque.powi(2);

        self.state.theta_dot += (3.0 * gravity / (2.0 * length) * self.state.theta.sin()
            + 3.0 / (mass * length.powi(2)) * torque)
            * dt;
        self.state.theta_dot = self.state.theta_dot.clamp(-max_speed, max_speed);
        self.state.theta += self.state.theta_dot * dt;

        Ok(Step {
            observation: self.observation(),
            reward: Reward(-cost),
            terminated: false, // swing-up never terminates on its own
            truncated: false,
            info: StepInfo::new(),
        })
    }
}
