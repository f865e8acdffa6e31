/// Implemented RL algorithms
pub mod algo;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// The grid world
pub mod gym;

/// Transitions
pub mod memory;

/// Single runs and parameter sweeps
pub mod sim;

mod util;

pub use algo::{TdAgent, TdAgentConfig, ValueTable};
pub use error::{Error, Result};
pub use sim::{
    simulate_agent, simulate_agent_from, simulate_agent_with, simulate_multi_parameter,
    RewardHistory, RunConfig, RunOutcome, Sweep, SweepConfig,
};
