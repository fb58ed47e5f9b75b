//! Example: random rollouts on CartPole wrapped as an Iterative Bounding MDP
//!
//! Mirrors the usual training wiring: base environment, then the IBMDP
//! transformer, then a time limit on the augmented episode.

use serde_json::Value;

use ibmdp_core::Environment;
use ibmdp_env::{CartPoleEnv, Ibmdp, TimeLimit};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let env = CartPoleEnv::new();
    let env = Ibmdp::new(env, 0.0, vec![(0, 0.0).into(), (2, 0.0).into()])?;
    let mut env = TimeLimit::new(env, 1000);

    let action_space = env.action_space();
    let num_episodes = 10;
    let mut episode_returns = Vec::new();

    for episode in 0..num_episodes {
        env.reset(None)?;
        let mut total_reward = 0.0;
        let mut steps = 0;
        let mut final_depth = 0;

        loop {
            let step = env.step(&action_space.sample())?;
            total_reward += step.reward.value();
            steps += 1;
            final_depth = step
                .info
                .get("depth")
                .and_then(Value::as_u64)
                .unwrap_or(final_depth);

            if step.terminated || step.truncated {
                break;
            }
        }

        episode_returns.push(total_reward);
        println!(
            "Episode {}: Return = {:.2}, Steps = {}, Queries at exit = {}",
            episode + 1,
            total_reward,
            steps,
            final_depth
        );
    }

    let avg_return: f64 = episode_returns.iter().sum::<f64>() / episode_returns.len() as f64;
    println!("\nAverage return over {num_episodes} episodes: {avg_return:.2}");

    Ok(())
}
