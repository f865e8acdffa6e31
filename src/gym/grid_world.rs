use rand::Rng;
use strum::{EnumIter, VariantArray};

use crate::env::{DiscreteActionSpace, Environment, Report};

/// Number of rows and columns of the grid
pub const GRID_SIZE: usize = 7;

/// Where every episode begins
pub const START: Pos = Pos::new(0, 0);

/// Absorbing goal worth [`SMALL_GOAL_REWARD`]
pub const SMALL_GOAL: Pos = Pos::new(3, 3);

/// Absorbing goal worth [`BIG_GOAL_REWARD`]
pub const BIG_GOAL: Pos = Pos::new(6, 6);

pub const WALL_REWARD: f64 = -5.0;
pub const BIG_GOAL_REWARD: f64 = 100.0;
pub const SMALL_GOAL_REWARD: f64 = 10.0;
pub const STEP_REWARD: f64 = -1.0;

/// A cell of the grid as `(row, col)`
///
/// Coordinates are signed so that a candidate move past the edge (row or column `-1` or `7`)
/// can be represented before [`resolve_boundaries`] folds it back onto the grid.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

impl Pos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The cell one move away in the direction of `action`, which may lie off the grid
    pub fn offset(self, action: Action) -> Self {
        let (dr, dc) = action.delta();
        Self::new(self.row + dr, self.col + dc)
    }

    pub fn is_on_grid(self) -> bool {
        let range = 0..GRID_SIZE as i32;
        range.contains(&self.row) && range.contains(&self.col)
    }

    pub fn is_goal(self) -> bool {
        self == SMALL_GOAL || self == BIG_GOAL
    }
}

impl From<(i32, i32)> for Pos {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

/// Grid moves, listed in the order the greedy policy breaks ties
#[derive(EnumIter, VariantArray, Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// `(d_row, d_col)`
    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }
}

/// Fold a candidate move back onto the grid
///
/// A candidate outside the grid is a wall hit: the agent stays at `current`.
///
/// **Returns** `(resolved, hit_wall)`
pub fn resolve_boundaries(current: Pos, candidate: Pos) -> (Pos, bool) {
    if candidate.is_on_grid() {
        (candidate, false)
    } else {
        (current, true)
    }
}

/// Reward for landing on `next`. A wall hit takes precedence over any goal.
pub fn reward(next: Pos, hit_wall: bool) -> f64 {
    if hit_wall {
        WALL_REWARD
    } else if next == BIG_GOAL {
        BIG_GOAL_REWARD
    } else if next == SMALL_GOAL {
        SMALL_GOAL_REWARD
    } else {
        STEP_REWARD
    }
}

/// A 7x7 grid bounded by walls with two absorbing goals
///
/// The agent starts at [`START`]. Stepping onto [`SMALL_GOAL`] or [`BIG_GOAL`] ends the
/// episode, after which the environment is inactive until [`reset`](Environment::reset).
pub struct GridWorld {
    pos: Pos,
    pub report: Report,
}

impl GridWorld {
    pub fn new() -> Self {
        Self {
            pos: START,
            report: Report::new(vec!["steps", "episodes", "walls"]),
        }
    }

    /// Current position of the agent
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Where `action` takes an agent standing at `current`
    ///
    /// **Returns** `(resolved, hit_wall)`
    pub fn transition(current: Pos, action: Action) -> (Pos, bool) {
        resolve_boundaries(current, current.offset(action))
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for GridWorld {
    type State = Pos;
    type Action = Action;

    fn is_active(&self) -> bool {
        !self.pos.is_goal()
    }

    fn step(&mut self, action: Self::Action) -> (Self::State, f64) {
        self.report.entry("steps").and_modify(|x| *x += 1.0);

        let (next, hit_wall) = Self::transition(self.pos, action);
        self.pos = next;

        if hit_wall {
            self.report.entry("walls").and_modify(|x| *x += 1.0);
        }
        if next.is_goal() {
            self.report.entry("episodes").and_modify(|x| *x += 1.0);
        }

        (next, reward(next, hit_wall))
    }

    fn reset(&mut self) -> Self::State {
        self.pos = START;
        self.pos
    }

    fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Action {
        Action::VARIANTS[rng.gen_range(0..Action::VARIANTS.len())]
    }
}

impl DiscreteActionSpace for GridWorld {
    fn actions(&self) -> Vec<Self::Action> {
        Action::VARIANTS.to_vec()
    }
}
