use std::time::Duration;

use rand::Rng;

use crate::config::{
    DEFAULT_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS, TICK_INTERVAL_STEP_MS,
};
use crate::error::GridError;
use crate::simulation::grid::Grid;

/// Whether generations advance on tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

/// Outcome of a scheduler tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// A generation was computed and the grid should be redrawn
    Redraw,
    /// Stopped, nothing happened
    Idle,
}

/// An in-progress drag-paint
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Gesture {
    paint: bool,
    last: (usize, usize),
}

/// Owns the grid plus everything that decides when and how it changes:
/// run state, tick cadence and the edit gesture.
#[derive(Debug)]
pub struct Simulation {
    grid: Grid,
    state: RunState,
    tick_interval: Duration,
    generation: u64,
    gesture: Option<Gesture>,
}

impl Simulation {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            state: RunState::Stopped,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            generation: 0,
            gesture: None,
        }
    }

    /// Create a simulation over an empty grid
    pub fn with_size(width: usize, height: usize) -> Result<Self, GridError> {
        Ok(Self::new(Grid::new(width, height)?))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Generations computed since the grid was last replaced
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn start(&mut self) {
        self.state = RunState::Running;
    }

    pub fn stop(&mut self) {
        self.state = RunState::Stopped;
    }

    pub fn toggle(&mut self) -> RunState {
        self.state = match self.state {
            RunState::Running => RunState::Stopped,
            RunState::Stopped => RunState::Running,
        };
        self.state
    }

    /// Advance one generation if running
    pub fn tick(&mut self) -> Tick {
        match self.state {
            RunState::Running => {
                self.advance();
                Tick::Redraw
            }
            RunState::Stopped => Tick::Idle,
        }
    }

    /// Advance exactly one generation regardless of run state
    pub fn step_once(&mut self) {
        self.advance();
    }

    /// Set the cadence used by the external scheduler, clamped to the allowed range.
    /// Returns the interval actually applied.
    pub fn set_tick_interval(&mut self, ms: u64) -> Duration {
        let ms = ms.clamp(MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS);
        self.tick_interval = Duration::from_millis(ms);
        self.tick_interval
    }

    pub fn speed_up(&mut self) -> Duration {
        let ms = self.interval_ms().saturating_sub(TICK_INTERVAL_STEP_MS);
        self.set_tick_interval(ms)
    }

    pub fn slow_down(&mut self) -> Duration {
        let ms = self.interval_ms().saturating_add(TICK_INTERVAL_STEP_MS);
        self.set_tick_interval(ms)
    }

    /// Replace the grid from encoded data. A successful load always stops
    /// the simulation; a failed one changes nothing.
    pub fn load_from_encoded_string(
        &mut self,
        data: &str,
        width: usize,
        height: usize,
    ) -> Result<(), GridError> {
        let grid = Grid::from_encoded_string(data, width, height)?;
        self.replace_grid(grid);
        Ok(())
    }

    /// Swap in a new grid, stopping the simulation
    pub fn replace_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.generation = 0;
        self.gesture = None;
        self.stop();
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.generation = 0;
    }

    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, density: f64) {
        self.grid.randomize(rng, density);
        self.generation = 0;
    }

    /// Start a drag-paint: set `(x, y)` to `paint` and remember it for the
    /// rest of the gesture
    pub fn begin_edit(&mut self, x: usize, y: usize, paint: bool) -> Result<(), GridError> {
        self.grid.set_cell(x, y, paint)?;
        self.gesture = Some(Gesture { paint, last: (x, y) });
        Ok(())
    }

    /// Start a drag-paint whose paint value is the inverse of the first cell touched
    pub fn begin_toggle_edit(&mut self, x: usize, y: usize) -> Result<bool, GridError> {
        let paint = !self.grid.cell(x, y)?.active;
        self.begin_edit(x, y, paint)?;
        Ok(paint)
    }

    /// Paint `(x, y)` with the gesture's value.
    ///
    /// Returns `false` without touching the grid when no gesture is active
    /// or the pointer is still over the last painted cell.
    pub fn continue_edit(&mut self, x: usize, y: usize) -> Result<bool, GridError> {
        let Some(gesture) = self.gesture.as_mut() else {
            return Ok(false);
        };
        if gesture.last == (x, y) {
            return Ok(false);
        }
        self.grid.set_cell(x, y, gesture.paint)?;
        gesture.last = (x, y);
        Ok(true)
    }

    pub fn end_edit(&mut self) {
        self.gesture = None;
    }

    /// Paint value of the active gesture, if any
    pub fn paint_value(&self) -> Option<bool> {
        self.gesture.map(|g| g.paint)
    }

    fn advance(&mut self) {
        let flipped = self.grid.step();
        self.generation += 1;
        log::debug!(
            "generation {}: {} flips, population {}",
            self.generation,
            flipped,
            self.grid.population()
        );
    }

    fn interval_ms(&self) -> u64 {
        u64::try_from(self.tick_interval.as_millis()).unwrap_or(MAX_TICK_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation(width: usize, height: usize) -> Simulation {
        Simulation::with_size(width, height).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let sim = simulation(5, 5);
        assert_eq!(sim.state(), RunState::Stopped);
        assert_eq!(sim.tick_interval(), Duration::from_millis(DEFAULT_TICK_INTERVAL_MS));
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.paint_value(), None);
    }

    #[test]
    fn test_tick_when_stopped_is_noop() {
        let mut sim = simulation(5, 5);
        sim.begin_edit(2, 2, true).unwrap();
        sim.end_edit();
        assert_eq!(sim.tick(), Tick::Idle);
        assert!(sim.grid().cell(2, 2).unwrap().active);
        assert_eq!(sim.generation(), 0);
    }

    #[test]
    fn test_tick_when_running_steps() {
        let mut sim = simulation(5, 5);
        sim.begin_edit(2, 2, true).unwrap();
        sim.end_edit();
        sim.start();
        assert_eq!(sim.tick(), Tick::Redraw);
        assert_eq!(sim.grid().population(), 0);
        assert_eq!(sim.generation(), 1);

        sim.stop();
        assert_eq!(sim.tick(), Tick::Idle);
        assert_eq!(sim.generation(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut sim = simulation(2, 2);
        assert_eq!(sim.toggle(), RunState::Running);
        assert!(sim.is_running());
        assert_eq!(sim.toggle(), RunState::Stopped);
    }

    #[test]
    fn test_step_once_while_stopped() {
        let mut sim = simulation(3, 3);
        for y in 0..3 {
            sim.begin_edit(1, y, true).unwrap();
        }
        sim.end_edit();
        sim.step_once();
        assert_eq!(sim.state(), RunState::Stopped);
        assert_eq!(sim.generation(), 1);
        let live: Vec<_> = sim.grid().live_cells().collect();
        assert_eq!(live, vec![(0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn test_tick_interval_clamped() {
        let mut sim = simulation(2, 2);
        assert_eq!(sim.set_tick_interval(250), Duration::from_millis(250));
        assert_eq!(sim.set_tick_interval(0), Duration::from_millis(MIN_TICK_INTERVAL_MS));
        assert_eq!(sim.set_tick_interval(u64::MAX), Duration::from_millis(MAX_TICK_INTERVAL_MS));
    }

    #[test]
    fn test_speed_controls() {
        let mut sim = simulation(2, 2);
        sim.set_tick_interval(100);
        assert_eq!(sim.speed_up(), Duration::from_millis(100 - TICK_INTERVAL_STEP_MS));
        assert_eq!(sim.slow_down(), Duration::from_millis(100));

        sim.set_tick_interval(MIN_TICK_INTERVAL_MS);
        assert_eq!(sim.speed_up(), Duration::from_millis(MIN_TICK_INTERVAL_MS));
    }

    #[test]
    fn test_load_forces_stop() {
        let mut sim = simulation(2, 2);
        sim.start();
        sim.step_once();
        sim.load_from_encoded_string("100001", 3, 2).unwrap();
        assert_eq!(sim.state(), RunState::Stopped);
        assert_eq!(sim.generation(), 0);
        assert_eq!((sim.grid().width(), sim.grid().height()), (3, 2));
        let live: Vec<_> = sim.grid().live_cells().collect();
        assert_eq!(live, vec![(0, 0), (2, 1)]);
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let mut sim = simulation(2, 2);
        sim.begin_edit(1, 1, true).unwrap();
        sim.start();
        let err = sim.load_from_encoded_string("10", 2, 2).unwrap_err();
        assert!(matches!(err, GridError::MalformedData(_)));
        assert!(sim.is_running());
        assert_eq!(sim.paint_value(), Some(true));
        assert!(sim.grid().cell(1, 1).unwrap().active);
    }

    #[test]
    fn test_drag_paint_diagonal() {
        let mut sim = simulation(6, 6);
        // Mixed prior states along the path
        sim.begin_edit(2, 2, true).unwrap();
        sim.begin_edit(4, 4, false).unwrap();
        sim.end_edit();

        sim.begin_edit(0, 0, true).unwrap();
        for i in 1..6 {
            assert!(sim.continue_edit(i, i).unwrap());
        }
        sim.end_edit();

        for i in 0..6 {
            assert!(sim.grid().cell(i, i).unwrap().active, "cell ({}, {})", i, i);
        }
        assert_eq!(sim.grid().population(), 6);
    }

    #[test]
    fn test_drag_paint_does_not_toggle() {
        let mut sim = simulation(4, 1);
        sim.begin_edit(1, 0, true).unwrap();
        sim.end_edit();

        // First cell is dead, so the gesture paints alive over the already-live cell
        assert!(sim.begin_toggle_edit(0, 0).unwrap());
        sim.continue_edit(1, 0).unwrap();
        sim.continue_edit(2, 0).unwrap();
        sim.end_edit();
        let live: Vec<_> = sim.grid().live_cells().collect();
        assert_eq!(live, vec![(0, 0), (1, 0), (2, 0)]);

        // First cell is alive, so the gesture erases
        assert!(!sim.begin_toggle_edit(2, 0).unwrap());
        sim.continue_edit(1, 0).unwrap();
        sim.end_edit();
        let live: Vec<_> = sim.grid().live_cells().collect();
        assert_eq!(live, vec![(0, 0)]);
    }

    #[test]
    fn test_continue_without_gesture_is_noop() {
        let mut sim = simulation(3, 3);
        assert!(!sim.continue_edit(1, 1).unwrap());
        assert_eq!(sim.grid().population(), 0);

        sim.begin_edit(0, 0, true).unwrap();
        assert!(!sim.continue_edit(0, 0).unwrap());
        sim.end_edit();
        assert!(!sim.continue_edit(2, 2).unwrap());
        assert_eq!(sim.grid().population(), 1);
    }

    #[test]
    fn test_edit_out_of_bounds() {
        let mut sim = simulation(3, 3);
        assert!(matches!(
            sim.begin_edit(3, 0, true),
            Err(GridError::OutOfBounds { .. })
        ));
        assert_eq!(sim.paint_value(), None);

        sim.begin_edit(0, 0, true).unwrap();
        assert!(sim.continue_edit(0, 5).is_err());
        assert_eq!(sim.paint_value(), Some(true));
    }
}
