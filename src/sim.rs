use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    algo::tabular::{TdAgent, TdAgentConfig, ValueTable},
    env::Environment,
    error::{Error, Result},
    gym::GridWorld,
    util::elementwise_mean,
};

/// Running average of the cumulative reward, one entry per simulated step
pub type RewardHistory = Vec<f64>;

/// Configuration for a single run of [`simulate_agent_with`]
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub n_steps: usize,
    pub agent: TdAgentConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n_steps: 50_000,
            agent: TdAgentConfig::default(),
        }
    }
}

/// Everything a single run produces
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Value estimates at the end of the run
    pub values: ValueTable,
    pub rewards: RewardHistory,
    /// Number of times a goal was reached
    pub episodes: u32,
    pub walls_hit: u32,
}

fn ensure_positive(name: &str, n: usize) -> Result<()> {
    if n == 0 {
        return Err(Error::invalid_argument(name, "must be greater than zero"));
    }
    Ok(())
}

/// Run the agent for `n_steps` steps from a freshly drawn value table
///
/// **Returns** `(values, rewards)` where `rewards[i]` is the average reward over steps `0..=i`
pub fn simulate_agent<R: Rng + ?Sized>(
    n_steps: usize,
    epsilon: f64,
    discount: f64,
    rng: &mut R,
) -> Result<(ValueTable, RewardHistory)> {
    let config = RunConfig {
        n_steps,
        agent: TdAgentConfig {
            epsilon,
            gamma: discount,
            ..Default::default()
        },
    };
    let outcome = simulate_agent_with(&config, rng)?;
    Ok((outcome.values, outcome.rewards))
}

/// Like [`simulate_agent`], with the full configuration and run statistics
pub fn simulate_agent_with<R: Rng + ?Sized>(config: &RunConfig, rng: &mut R) -> Result<RunOutcome> {
    ensure_positive("n_steps", config.n_steps)?;
    let values = ValueTable::random(rng);
    simulate_agent_from(config, values, rng)
}

/// Run the agent starting from the given value estimates
///
/// Every step starts where the previous one ended, except after a goal, where the
/// environment is reset to the start state. The value update always uses the state
/// the step actually resolved to.
pub fn simulate_agent_from<R: Rng + ?Sized>(
    config: &RunConfig,
    values: ValueTable,
    rng: &mut R,
) -> Result<RunOutcome> {
    ensure_positive("n_steps", config.n_steps)?;
    let mut agent = TdAgent::new(config.agent.clone(), values)?;
    let mut env = GridWorld::new();

    let mut total_reward = 0.0;
    let mut rewards = Vec::with_capacity(config.n_steps);
    for i in 0..config.n_steps {
        if !env.is_active() {
            env.reset();
        }

        let exp = agent.go(&mut env, rng);
        total_reward += exp.reward;
        rewards.push(total_reward / (i + 1) as f64);
    }

    let episodes = env.report["episodes"] as u32;
    let walls_hit = env.report["walls"] as u32;
    debug!(
        "run finished: {} steps, {episodes} episodes, {walls_hit} wall hits, average reward {:.3}",
        config.n_steps,
        total_reward / config.n_steps as f64,
    );

    Ok(RunOutcome {
        values: agent.into_values(),
        rewards,
        episodes,
        walls_hit,
    })
}

/// Configuration for [`simulate_multi_parameter`]
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    pub epsilons: Vec<f64>,
    pub discount: f64,
    pub alpha: f64,
    /// Average values and rewards over runs instead of returning every run
    pub averaged: bool,
    /// Independent runs per epsilon
    pub runs: usize,
    pub n_steps: usize,
    /// Run `k` of the sweep, counted across all epsilons, is seeded with `seed + k`
    pub seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            epsilons: vec![0.1],
            discount: 0.95,
            alpha: 0.01,
            averaged: true,
            runs: 5,
            n_steps: 50_000,
            seed: 0,
        }
    }
}

/// Results of a sweep, indexed by epsilon in the order given
#[derive(Debug, Clone, PartialEq)]
pub enum Sweep {
    Averaged {
        values: Vec<ValueTable>,
        rewards: Vec<RewardHistory>,
    },
    PerRun {
        values: Vec<Vec<ValueTable>>,
        rewards: Vec<Vec<RewardHistory>>,
    },
}

fn simulate_seeded(config: &RunConfig, seed: u64) -> Result<RunOutcome> {
    let mut rng = StdRng::seed_from_u64(seed);
    simulate_agent_with(config, &mut rng)
}

#[cfg(not(feature = "parallel"))]
fn simulate_runs(config: &RunConfig, first_seed: u64, runs: usize) -> Result<Vec<RunOutcome>> {
    (0..runs)
        .map(|k| simulate_seeded(config, first_seed.wrapping_add(k as u64)))
        .collect()
}

#[cfg(feature = "parallel")]
fn simulate_runs(config: &RunConfig, first_seed: u64, runs: usize) -> Result<Vec<RunOutcome>> {
    (0..runs)
        .into_par_iter()
        .map(|k| simulate_seeded(config, first_seed.wrapping_add(k as u64)))
        .collect()
}

/// Run `config.runs` independent simulations for every epsilon
///
/// Each run draws a fresh value table from its own seeded generator, so the result
/// does not depend on whether runs execute in parallel.
pub fn simulate_multi_parameter(config: &SweepConfig) -> Result<Sweep> {
    if config.epsilons.is_empty() {
        return Err(Error::invalid_argument("epsilons", "must not be empty"));
    }
    ensure_positive("runs", config.runs)?;
    ensure_positive("n_steps", config.n_steps)?;

    let mut values = Vec::with_capacity(config.epsilons.len());
    let mut rewards = Vec::with_capacity(config.epsilons.len());
    for (i, &epsilon) in config.epsilons.iter().enumerate() {
        info!("starting {} runs for epsilon {epsilon}", config.runs);

        let run_config = RunConfig {
            n_steps: config.n_steps,
            agent: TdAgentConfig {
                epsilon,
                alpha: config.alpha,
                gamma: config.discount,
            },
        };
        let first_seed = config.seed.wrapping_add((i * config.runs) as u64);
        let (run_values, run_rewards): (Vec<_>, Vec<_>) =
            simulate_runs(&run_config, first_seed, config.runs)?
                .into_iter()
                .map(|outcome| (outcome.values, outcome.rewards))
                .unzip();

        values.push(run_values);
        rewards.push(run_rewards);
    }

    if !config.averaged {
        return Ok(Sweep::PerRun { values, rewards });
    }

    Ok(Sweep::Averaged {
        values: values
            .iter()
            .map(|runs| ValueTable::mean(runs).unwrap_or_default())
            .collect(),
        rewards: rewards.iter().map(|runs| elementwise_mean(runs)).collect(),
    })
}
