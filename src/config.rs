/// Default grid dimensions in cells (800x600 px window at 8 px per cell)
pub const GRID_WIDTH: usize = 100;
pub const GRID_HEIGHT: usize = 75;

/// Pixels per cell on screen
pub const CELL_SIZE: u32 = 8;

// ============================================
// Simulation Cadence
// ============================================

/// Delay between generations while running
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 80;

/// Fastest allowed cadence
pub const MIN_TICK_INTERVAL_MS: u64 = 10;

/// Slowest allowed cadence
pub const MAX_TICK_INTERVAL_MS: u64 = 1000;

/// Change applied by a single speed up / slow down request
pub const TICK_INTERVAL_STEP_MS: u64 = 10;

/// Fraction of cells alive after a random fill
pub const RANDOM_DENSITY: f64 = 0.25;

// ============================================
// Rendering
// ============================================

/// Live cell color (#FF0066)
pub const CELL_COLOR: [f32; 4] = [1.0, 0.0, 0.4, 1.0];

/// Dead cell / background color
pub const BACKGROUND_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Grid overlay line color
pub const GRID_LINE_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

// ============================================
// Persistence
// ============================================

/// Default file name used for saving and loading
pub const SAVE_FILE_NAME: &str = "cells.sav";

/// Content type of a save file
pub const SAVE_MIME_TYPE: &str = "text/json";
