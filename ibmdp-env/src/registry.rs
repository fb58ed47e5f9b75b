//! Environment registry for name-based environment creation

use std::collections::HashMap;
use std::sync::Mutex;

use ibmdp_core::{Environment, Result, RlError};

use crate::classic::{CartPoleEnv, MountainCarEnv, PendulumEnv};

type EnvConstructor = Box<dyn Fn() -> Result<Box<dyn Environment>> + Send + Sync>;

lazy_static::lazy_static! {
    static ref REGISTRY: Mutex<EnvRegistry> = {
        let mut registry = EnvRegistry::new();
        registry.register("cartpole", || Ok(Box::new(CartPoleEnv::new()) as Box<dyn Environment>));
        registry.register("mountain-car", || Ok(Box::new(MountainCarEnv::new()) as Box<dyn Environment>));
        registry.register("pendulum", || Ok(Box::new(PendulumEnv::new()) as Box<dyn Environment>));
        Mutex::new(registry)
    };
}

/// Registry mapping names to environment constructors
pub struct EnvRegistry {
    envs: HashMap<String, EnvConstructor>,
}

impl EnvRegistry {
    fn new() -> Self {
        Self {
            envs: HashMap::new(),
        }
    }

    /// Register an environment constructor under a name
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Result<Box<dyn Environment>> + Send + Sync + 'static,
    {
        self.envs.insert(name.into(), Box::new(constructor));
    }

    /// Create an environment by name
    ///
    /// # Errors
    ///
    /// Returns [`RlError::Environment`] when no environment is registered
    /// under `name`, or whatever error the constructor itself reports.
    pub fn make(&self, name: &str) -> Result<Box<dyn Environment>> {
        self.envs
            .get(name)
            .ok_or_else(|| RlError::Environment(format!("unknown environment: {name}")))
            .and_then(|constructor| constructor())
    }

    /// List registered environment names
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        self.envs.keys().cloned().collect()
    }
}

/// Register an environment constructor globally
pub fn register_env<F>(name: impl Into<String>, constructor: F)
where
    F: Fn() -> Result<Box<dyn Environment>> + Send + Sync + 'static,
{
    REGISTRY.lock().unwrap().register(name, constructor);
}

/// Create an environment by name from the global registry
///
/// # Errors
///
/// Returns [`RlError::Environment`] for unknown names.
pub fn make_env(name: &str) -> Result<Box<dyn Environment>> {
    REGISTRY.lock().unwrap().make(name)
}

/// List all globally registered environment names
#[must_use]
pub fn list_envs() -> Vec<String> {
    REGISTRY.lock().unwrap().list()
}
