use std::{
    collections::HashMap,
    ops::{Deref, DerefMut},
};

use rand::Rng;

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// and a continuing task: reaching a terminal state marks the environment inactive,
/// and the driver decides when to [`reset`](Environment::reset) it.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State: Copy;

    /// A representation of an action that an agent can take to affect the environment
    type Action: Copy;

    /// Determine if the state is active or terminal
    fn is_active(&self) -> bool;

    /// Update the environment in response to an action taken by an agent, producing a new state and associated reward
    ///
    /// **Returns** `(next_state, reward)`
    fn step(&mut self, action: Self::Action) -> (Self::State, f64);

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;

    /// Sample an action uniformly from the environment's action space
    fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Action;
}

/// An environment with a finite set of actions
pub trait DiscreteActionSpace: Environment {
    /// Get the available actions for the current state
    ///
    /// The returned vec should never be empty.
    fn actions(&self) -> Vec<Self::Action>;
}

/// Named counters an environment keeps about its own history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    metrics: HashMap<&'static str, f64>,
}

impl Report {
    /// Create a report with every key set to zero
    pub fn new(keys: Vec<&'static str>) -> Self {
        Self {
            metrics: keys.into_iter().map(|k| (k, 0.0)).collect(),
        }
    }
}

impl Deref for Report {
    type Target = HashMap<&'static str, f64>;

    fn deref(&self) -> &Self::Target {
        &self.metrics
    }
}

impl DerefMut for Report {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_functional() {
        let mut report = Report::new(vec!["steps", "walls"]);
        assert_eq!(report["steps"], 0.0, "Keys start at zero");

        report.entry("steps").and_modify(|x| *x += 1.0);
        report.entry("steps").and_modify(|x| *x += 1.0);
        assert_eq!(report["steps"], 2.0, "Counter accumulates");
        assert_eq!(report["walls"], 0.0, "Other counters untouched");
        assert_eq!(report.len(), 2);
    }
}
