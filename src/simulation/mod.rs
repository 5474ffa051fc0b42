mod cell;
mod controller;
mod grid;

pub use cell::Cell;
pub use controller::{RunState, Simulation, Tick};
pub use grid::Grid;
