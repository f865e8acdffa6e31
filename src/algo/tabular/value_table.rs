use std::ops::{Index, IndexMut};

use rand::Rng;
use rand_distr::StandardNormal;
use strum::VariantArray;

use crate::{
    gym::grid_world::{Action, Pos, GRID_SIZE},
    util::elementwise_mean,
};

/// State-value estimates, one per grid cell
///
/// Indexing with an off-grid [`Pos`] panics, like slice indexing; use [`ValueTable::get`]
/// when the position may lie outside the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    values: [[f64; GRID_SIZE]; GRID_SIZE],
}

impl ValueTable {
    pub fn from_rows(values: [[f64; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { values }
    }

    pub fn zeros() -> Self {
        Self::from_rows([[0.0; GRID_SIZE]; GRID_SIZE])
    }

    /// Every cell drawn independently from N(0, 1)
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut table = Self::zeros();
        for row in table.values.iter_mut() {
            for v in row.iter_mut() {
                *v = rng.sample(StandardNormal);
            }
        }
        table
    }

    pub fn get(&self, pos: Pos) -> Option<f64> {
        pos.is_on_grid().then(|| self[pos])
    }

    pub fn rows(&self) -> &[[f64; GRID_SIZE]; GRID_SIZE] {
        &self.values
    }

    /// Value the greedy policy assigns to moving from `pos` in the direction of `action`
    ///
    /// A move into a wall leaves the agent in place, so it is scored with the value of `pos`.
    ///
    /// **Panics** if the move leaves the grid and `pos` is itself off the grid
    pub fn action_value(&self, pos: Pos, action: Action) -> f64 {
        self.get(pos.offset(action)).unwrap_or_else(|| self[pos])
    }

    /// The action with the strictly highest [`action_value`](Self::action_value) from `pos`
    ///
    /// Ties go to the earliest action in the order up, down, left, right.
    pub fn greedy_action(&self, pos: Pos) -> Action {
        let mut best = (Action::VARIANTS[0], self.action_value(pos, Action::VARIANTS[0]));
        for &action in &Action::VARIANTS[1..] {
            let value = self.action_value(pos, action);
            if value > best.1 {
                best = (action, value);
            }
        }
        best.0
    }

    /// Cell-wise mean of several tables, or `None` if `tables` is empty
    pub fn mean(tables: &[ValueTable]) -> Option<ValueTable> {
        let flat: Vec<Vec<f64>> = tables
            .iter()
            .map(|t| t.values.iter().flatten().copied().collect())
            .collect();
        let means = elementwise_mean(&flat);
        if means.is_empty() {
            return None;
        }

        let mut table = Self::zeros();
        for (v, m) in table.values.iter_mut().flatten().zip(means) {
            *v = m;
        }
        Some(table)
    }
}

impl Default for ValueTable {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Index<Pos> for ValueTable {
    type Output = f64;

    fn index(&self, pos: Pos) -> &Self::Output {
        &self.values[pos.row as usize][pos.col as usize]
    }
}

impl IndexMut<Pos> for ValueTable {
    fn index_mut(&mut self, pos: Pos) -> &mut Self::Output {
        &mut self.values[pos.row as usize][pos.col as usize]
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn random_table_is_standard_normal() {
        let mut rng = StdRng::seed_from_u64(42);
        let tables: Vec<_> = (0..200).map(|_| ValueTable::random(&mut rng)).collect();
        let samples: Vec<f64> = tables
            .iter()
            .flat_map(|t| t.rows().iter().flatten().copied())
            .collect();

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 0.05, "Mean {mean} near 0");
        assert!((var - 1.0).abs() < 0.05, "Variance {var} near 1");
    }

    #[test]
    fn get_off_grid() {
        let table = ValueTable::zeros();
        assert_eq!(table.get(Pos::new(-1, 0)), None);
        assert_eq!(table.get(Pos::new(0, 7)), None);
        assert_eq!(table.get(Pos::new(6, 6)), Some(0.0));
    }

    #[test]
    fn greedy_scores_walls_with_current_value() {
        let mut table = ValueTable::zeros();
        table[Pos::new(0, 0)] = 5.0;
        table[Pos::new(1, 0)] = 1.0;
        table[Pos::new(0, 1)] = 2.0;

        assert_eq!(
            table.action_value(Pos::new(0, 0), Action::Up),
            5.0,
            "Wall scored as current cell"
        );
        assert_eq!(
            table.action_value(Pos::new(0, 0), Action::Left),
            5.0,
            "Wall scored as current cell"
        );
        assert_eq!(table.action_value(Pos::new(0, 0), Action::Down), 1.0);
        assert_eq!(table.action_value(Pos::new(0, 0), Action::Right), 2.0);
        assert_eq!(
            table.greedy_action(Pos::new(0, 0)),
            Action::Up,
            "Up and left tie, up comes first"
        );
    }

    #[test]
    fn action_value_off_grid_origin() {
        let mut table = ValueTable::zeros();
        table[Pos::new(0, 0)] = 4.0;
        assert_eq!(
            table.action_value(Pos::new(-1, 0), Action::Down),
            4.0,
            "Move back onto the grid reads the target cell"
        );
    }

    #[test]
    #[should_panic]
    fn action_value_off_grid_into_wall() {
        ValueTable::zeros().action_value(Pos::new(-1, 0), Action::Up);
    }

    #[test]
    fn greedy_tie_break_order() {
        let table = ValueTable::zeros();
        assert_eq!(table.greedy_action(Pos::new(3, 3)), Action::Up, "All equal picks up");

        let mut table = ValueTable::zeros();
        table[Pos::new(4, 3)] = 1.0;
        table[Pos::new(3, 4)] = 1.0;
        assert_eq!(table.greedy_action(Pos::new(3, 3)), Action::Down, "Down beats right on a tie");

        table[Pos::new(3, 4)] = 1.5;
        assert_eq!(table.greedy_action(Pos::new(3, 3)), Action::Right, "Strict maximum wins");
    }

    #[test]
    fn greedy_at_every_corner_stays_in_table() {
        let mut rng = StdRng::seed_from_u64(5);
        let table = ValueTable::random(&mut rng);
        for pos in [(0, 0), (0, 6), (6, 0), (6, 6)].map(Pos::from) {
            let action = table.greedy_action(pos);
            let best = table.action_value(pos, action);
            for &other in Action::VARIANTS {
                assert!(table.action_value(pos, other) <= best, "{action:?} is maximal at {pos:?}");
            }
        }
    }

    #[test]
    fn mean_functional() {
        let a = ValueTable::from_rows([[1.0; GRID_SIZE]; GRID_SIZE]);
        let b = ValueTable::from_rows([[3.0; GRID_SIZE]; GRID_SIZE]);
        let mean = ValueTable::mean(&[a, b]).unwrap();
        assert_eq!(mean, ValueTable::from_rows([[2.0; GRID_SIZE]; GRID_SIZE]));

        assert_eq!(ValueTable::mean(&[]), None, "No tables, no mean");
    }
}
