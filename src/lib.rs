//! Conway's Game of Life engine: a bounded grid, the B3/S23 step, a
//! run/stop controller with drag-paint editing, and the `cells.sav`
//! save-file format.

pub mod config;
pub mod error;
pub mod persistence;
pub mod serializer;
pub mod simulation;

pub use error::{GridError, PersistenceError};
pub use serializer::SaveFile;
pub use simulation::{Cell, Grid, RunState, Simulation, Tick};
