pub mod grid_world;

pub use grid_world::{Action, GridWorld, Pos};
