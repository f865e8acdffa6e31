use log::trace;
use rand::Rng;

use crate::{
    check_interval,
    env::Environment,
    error::Result,
    exploration::{Choice, EpsilonGreedy},
    gym::grid_world::{Action, GridWorld, Pos},
    memory::Exp,
};

use super::value_table::ValueTable;

/// Configuration for the [`TdAgent`]
#[derive(Debug, Clone, PartialEq)]
pub struct TdAgentConfig {
    /// Probability of taking a uniformly random action
    pub epsilon: f64,
    /// Learning rate
    pub alpha: f64,
    /// Discount factor
    pub gamma: f64,
}

impl Default for TdAgentConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            alpha: 0.01,
            gamma: 0.95,
        }
    }
}

/// An epsilon-greedy agent that learns state values on a [`GridWorld`] with TD(0)
///
/// The agent owns its [`ValueTable`] for as long as it lives; take the learned values back
/// with [`TdAgent::into_values`].
#[derive(Debug, Clone)]
pub struct TdAgent {
    values: ValueTable,
    exploration: EpsilonGreedy,
    alpha: f64, // learning rate
    gamma: f64, // discount factor
}

impl TdAgent {
    /// Initialize a new `TdAgent` starting from the given value estimates
    ///
    /// **Errors** if `epsilon`, `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(config: TdAgentConfig, values: ValueTable) -> Result<Self> {
        check_interval!(config.alpha, 0.0, 1.0);
        check_interval!(config.gamma, 0.0, 1.0);
        Ok(Self {
            values,
            exploration: EpsilonGreedy::new(config.epsilon)?,
            alpha: config.alpha,
            gamma: config.gamma,
        })
    }

    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    pub fn into_values(self) -> ValueTable {
        self.values
    }

    /// Choose an action based on the current state and exploration policy
    pub fn act<R: Rng + ?Sized>(&self, env: &GridWorld, state: Pos, rng: &mut R) -> Action {
        match self.exploration.choose(rng) {
            Choice::Explore => env.random_action(rng),
            Choice::Exploit => self.values.greedy_action(state),
        }
    }

    /// Choose an action and resolve where it leads, without moving the environment
    ///
    /// **Returns** `(next_state, hit_wall)`
    pub fn policy<R: Rng + ?Sized>(&self, env: &GridWorld, state: Pos, rng: &mut R) -> (Pos, bool) {
        GridWorld::transition(state, self.act(env, state, rng))
    }

    /// Apply the TD(0) update for one transition
    ///
    /// V(s) ← V(s) + α[r + γV(s') - V(s)]
    ///
    /// **Returns** the TD error
    pub fn learn(&mut self, exp: &Exp<GridWorld>) -> f64 {
        let value = self.values[exp.state];
        let next_value = self.values[exp.next_state];
        let td_error = exp.reward + self.gamma * next_value - value;
        self.values[exp.state] = value + self.alpha * td_error;
        td_error
    }

    /// Take one step in the environment and learn from it
    pub fn go<R: Rng + ?Sized>(&mut self, env: &mut GridWorld, rng: &mut R) -> Exp<GridWorld> {
        let state = env.pos();
        let action = self.act(env, state, rng);
        let (next_state, reward) = env.step(action);

        let exp = Exp {
            state,
            action,
            next_state,
            reward,
        };
        let td_error = self.learn(&exp);
        trace!("{state:?} -{action:?}-> {next_state:?} r={reward} δ={td_error:.4}");

        exp
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::{mock::StepRng, StdRng};
    use rand::SeedableRng;

    use crate::gym::grid_world::{BIG_GOAL, START};

    use super::*;

    fn agent(epsilon: f64, values: ValueTable) -> TdAgent {
        let config = TdAgentConfig {
            epsilon,
            ..Default::default()
        };
        TdAgent::new(config, values).unwrap()
    }

    #[test]
    fn config_out_of_range() {
        let bad_alpha = TdAgentConfig {
            alpha: 1.5,
            ..Default::default()
        };
        let bad_gamma = TdAgentConfig {
            gamma: -0.5,
            ..Default::default()
        };
        let bad_epsilon = TdAgentConfig {
            epsilon: 2.0,
            ..Default::default()
        };
        for config in [bad_alpha, bad_gamma, bad_epsilon] {
            assert!(TdAgent::new(config, ValueTable::zeros()).is_err());
        }
    }

    #[test]
    fn td_update_arithmetic() {
        let cur = Pos::new(2, 2);
        let next = Pos::new(2, 3);
        let mut values = ValueTable::zeros();
        values[cur] = 2.0;
        values[next] = 3.0;
        let mut agent = agent(0.1, values);

        let td_error = agent.learn(&Exp {
            state: cur,
            action: Action::Right,
            next_state: next,
            reward: -1.0,
        });

        // δ = -1 + 0.95 * 3 - 2
        assert!((td_error + 0.15).abs() < 1e-12, "TD error is {td_error}");
        assert!(
            (agent.values()[cur] - 1.9985).abs() < 1e-12,
            "V(cur) is {}",
            agent.values()[cur]
        );
        assert_eq!(agent.values()[next], 3.0, "Only the current state changes");
    }

    #[test]
    fn greedy_policy_follows_values() {
        let mut values = ValueTable::zeros();
        values[Pos::new(0, 1)] = 1.0;
        let agent = agent(0.0, values);
        let env = GridWorld::new();
        let mut rng = StepRng::new(0, 0);

        assert_eq!(agent.act(&env, START, &mut rng), Action::Right);
        assert_eq!(agent.policy(&env, START, &mut rng), (Pos::new(0, 1), false));
    }

    #[test]
    fn greedy_policy_into_wall() {
        let mut values = ValueTable::zeros();
        values[START] = 5.0;
        values[Pos::new(1, 0)] = 1.0;
        values[Pos::new(0, 1)] = 2.0;
        let agent = agent(0.0, values);
        let env = GridWorld::new();
        let mut rng = StepRng::new(0, 0);

        assert_eq!(
            agent.policy(&env, START, &mut rng),
            (START, true),
            "Staying put scores best, so the greedy move is into the wall"
        );
    }

    #[test]
    fn random_policy_moves_to_a_neighbour() {
        let agent = agent(1.0, ValueTable::zeros());
        let env = GridWorld::new();
        let mut rng = StdRng::seed_from_u64(9);
        let state = Pos::new(3, 2);
        for _ in 0..100 {
            let (next, hit_wall) = agent.policy(&env, state, &mut rng);
            assert!(!hit_wall, "No walls next to {state:?}");
            let dist = (next.row - state.row).abs() + (next.col - state.col).abs();
            assert_eq!(dist, 1, "{next:?} is adjacent");
        }
    }

    #[test]
    fn go_updates_with_resolved_goal() {
        let before = Pos::new(6, 5);
        let mut values = ValueTable::zeros();
        values[BIG_GOAL] = 10.0;
        let mut agent = agent(0.0, values);
        let mut env = GridWorld::new();
        for _ in 0..6 {
            env.step(Action::Down);
        }
        for _ in 0..5 {
            env.step(Action::Right);
        }
        assert_eq!(env.pos(), before);

        let exp = agent.go(&mut env, &mut StepRng::new(0, 0));
        assert_eq!(exp.next_state, BIG_GOAL, "Greedy step lands on the goal");
        assert_eq!(exp.reward, 100.0);
        let expected = 0.01 * (100.0 + 0.95 * 10.0);
        assert!(
            (agent.values()[before] - expected).abs() < 1e-12,
            "Bootstraps from the goal value"
        );
        assert!(!env.is_active(), "Episode over");
    }
}
