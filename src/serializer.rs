//! `cells.sav` record: canvas pixel size, cell size and the encoded grid.

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::simulation::{Grid, Simulation};

/// Persisted grid state.
///
/// `width` and `height` are the pixel dimensions of the drawing surface;
/// the grid itself is `width / cell_size` by `height / cell_size` cells.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SaveFile {
    pub width: i64,
    pub height: i64,
    pub cell_size: i64,
    pub data: String,
}

impl SaveFile {
    /// Capture a grid drawn at `cell_size` pixels per cell
    pub fn from_grid(grid: &Grid, cell_size: u32) -> Self {
        let cell_size = i64::from(cell_size);
        let pixels = |cells: usize| i64::try_from(cells).unwrap_or(i64::MAX).saturating_mul(cell_size);

        Self {
            width: pixels(grid.width()),
            height: pixels(grid.height()),
            cell_size,
            data: grid.to_encoded_string(),
        }
    }

    pub fn encode(&self) -> Result<String, GridError> {
        serde_json::to_string(self)
            .map_err(|e| GridError::MalformedData(format!("cannot encode save file: {}", e)))
    }

    /// Parse a save record, rejecting missing fields and non-positive sizes
    pub fn decode(text: &str) -> Result<Self, GridError> {
        let save: Self = serde_json::from_str(text)
            .map_err(|e| GridError::MalformedData(format!("invalid save file: {}", e)))?;

        for (name, value) in [
            ("width", save.width),
            ("height", save.height),
            ("cellSize", save.cell_size),
        ] {
            if value <= 0 {
                return Err(GridError::MalformedData(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        Ok(save)
    }

    /// Grid size in cells, rounded down per dimension
    pub fn grid_dimensions(&self) -> Result<(usize, usize), GridError> {
        if self.cell_size <= 0 {
            return Err(GridError::MalformedData(format!(
                "cellSize must be positive, got {}",
                self.cell_size
            )));
        }

        let cells = |pixels: i64| usize::try_from(pixels / self.cell_size).unwrap_or(0);
        let (width, height) = (cells(self.width), cells(self.height));
        if width == 0 || height == 0 {
            return Err(GridError::MalformedData(format!(
                "{}x{} px at {} px per cell holds no cells",
                self.width, self.height, self.cell_size
            )));
        }

        Ok((width, height))
    }

    /// Cell size as a pixel count usable by the renderer
    pub fn cell_size_px(&self) -> Result<u32, GridError> {
        u32::try_from(self.cell_size)
            .ok()
            .filter(|&size| size > 0)
            .ok_or_else(|| GridError::MalformedData(format!("unusable cellSize {}", self.cell_size)))
    }

    pub fn to_grid(&self) -> Result<Grid, GridError> {
        let (width, height) = self.grid_dimensions()?;
        Grid::from_encoded_string(&self.data, width, height)
    }

    /// Load into a simulation, which stops it
    pub fn apply_to(&self, simulation: &mut Simulation) -> Result<(), GridError> {
        let (width, height) = self.grid_dimensions()?;
        simulation.load_from_encoded_string(&self.data, width, height)
    }
}
