use rand::Rng;

use crate::error::GridError;
use crate::simulation::cell::Cell;

/// Relative offsets of the Moore neighborhood
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Dense, bounded (non-wrapping) Life grid.
///
/// Cells live in a single `Vec` of length `width * height`, indexed
/// `y * width + x`. The vector is only ever built in full, so every
/// in-bounds coordinate always has a cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every cell dead
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        let cell_count = checked_area(width, height)?;
        let mut cells = Vec::with_capacity(cell_count);

        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::new(x, y));
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a grid from the output of [`Grid::to_encoded_string`]
    pub fn from_encoded_string(data: &str, width: usize, height: usize) -> Result<Self, GridError> {
        let states = decode_states(data, width, height)?;
        let mut grid = Self::new(width, height)?;
        grid.apply_states(&states);
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// All cells in row-major (`y * width + x`) order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Coordinates of every live cell, row-major
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .filter(|cell| cell.active)
            .map(|cell| (cell.x(), cell.y()))
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.active).count()
    }

    pub fn cell(&self, x: usize, y: usize) -> Result<&Cell, GridError> {
        let index = self.index(x, y)?;
        Ok(&self.cells[index])
    }

    pub fn set_cell(&mut self, x: usize, y: usize, active: bool) -> Result<(), GridError> {
        let index = self.index(x, y)?;
        self.cells[index].active = active;
        Ok(())
    }

    /// Count live cells among the in-bounds Moore neighbors of `(x, y)`.
    ///
    /// The grid does not wrap: edge and corner cells have fewer neighbors.
    pub fn count_live_neighbors(&self, x: usize, y: usize) -> Result<u8, GridError> {
        self.index(x, y)?;
        Ok(self.live_neighbors_unchecked(x, y))
    }

    /// Advance one generation.
    ///
    /// Flips are collected against the current state of every cell and
    /// applied together afterwards, so processing order never matters.
    /// Returns the number of cells that changed.
    pub fn step(&mut self) -> usize {
        let flips: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.should_flip(self.live_neighbors_unchecked(cell.x(), cell.y())))
            .map(|(index, _)| index)
            .collect();

        for &index in &flips {
            let cell = &mut self.cells[index];
            cell.active = !cell.active;
        }

        log::trace!("step flipped {} cells", flips.len());
        flips.len()
    }

    /// Encode as one `'1'`/`'0'` per cell, outer index x, inner index y
    pub fn to_encoded_string(&self) -> String {
        let mut encoded = String::with_capacity(self.cells.len());

        for x in 0..self.width {
            for y in 0..self.height {
                let active = self.cells[y * self.width + x].active;
                encoded.push(if active { '1' } else { '0' });
            }
        }

        encoded
    }

    /// Rebuild the grid at the given dimensions from encoded data.
    ///
    /// The data is validated completely before anything is changed; on
    /// error the grid keeps its previous size and contents.
    pub fn load_from_encoded_string(
        &mut self,
        data: &str,
        width: usize,
        height: usize,
    ) -> Result<(), GridError> {
        *self = Self::from_encoded_string(data, width, height)?;
        log::debug!(
            "loaded {}x{} grid with {} live cells",
            width,
            height,
            self.population()
        );
        Ok(())
    }

    /// Kill every cell
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.active = false;
        }
    }

    /// Replace every cell with a random state, alive with probability `density`
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, density: f64) {
        // NaN survives clamp and would panic in gen_bool
        let density = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
        for cell in &mut self.cells {
            cell.active = rng.gen_bool(density);
        }
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, GridError> {
        if x >= self.width || y >= self.height {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.width + x)
    }

    fn live_neighbors_unchecked(&self, x: usize, y: usize) -> u8 {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| {
                let nx = x.checked_add_signed(dx)?;
                let ny = y.checked_add_signed(dy)?;
                if nx < self.width && ny < self.height {
                    Some(u8::from(self.cells[ny * self.width + nx].active))
                } else {
                    None
                }
            })
            .sum()
    }

    /// Apply states given in encoded (x-major) order
    fn apply_states(&mut self, states: &[bool]) {
        for (k, &active) in states.iter().enumerate() {
            let x = k / self.height;
            let y = k % self.height;
            self.cells[y * self.width + x].active = active;
        }
    }
}

/// Cell count for a grid, rejecting empty grids and ones too large to allocate
fn checked_area(width: usize, height: usize) -> Result<usize, GridError> {
    let area = width.checked_mul(height).filter(|&area| area > 0);
    let bytes = area.and_then(|area| area.checked_mul(std::mem::size_of::<Cell>()));
    match (area, bytes) {
        (Some(area), Some(bytes)) if bytes <= isize::MAX as usize => Ok(area),
        _ => Err(GridError::InvalidDimensions { width, height }),
    }
}

fn decode_states(data: &str, width: usize, height: usize) -> Result<Vec<bool>, GridError> {
    let expected = checked_area(width, height)?;
    if data.len() != expected {
        return Err(GridError::MalformedData(format!(
            "expected {} cells for a {}x{} grid, got {}",
            expected,
            width,
            height,
            data.len()
        )));
    }

    data.chars()
        .enumerate()
        .map(|(position, c)| match c {
            '1' => Ok(true),
            '0' => Ok(false),
            other => Err(GridError::MalformedData(format!(
                "unexpected character {:?} at position {}",
                other, position
            ))),
        })
        .collect()
}
