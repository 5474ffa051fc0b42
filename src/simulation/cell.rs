/// A single grid position.
///
/// Coordinates are fixed when the owning [`Grid`](super::Grid) is built;
/// only the alive/dead state changes afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    x: usize,
    y: usize,
    /// Whether the cell is alive
    pub active: bool,
}

impl Cell {
    /// Create a dead cell at the given coordinates
    pub fn new(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            active: false,
        }
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    /// Whether the cell flips this generation given its live neighbor count.
    ///
    /// Live cells die with fewer than 2 or more than 3 neighbors, dead cells
    /// are born with exactly 3.
    pub fn should_flip(&self, live_neighbors: u8) -> bool {
        if self.active {
            !(2..=3).contains(&live_neighbors)
        } else {
            live_neighbors == 3
        }
    }

    /// State as uploaded to the renderer's storage buffer (1 = alive)
    pub fn gpu_state(&self) -> u32 {
        u32::from(self.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cell_is_dead() {
        let cell = Cell::new(3, 4);
        assert_eq!((cell.x(), cell.y()), (3, 4));
        assert!(!cell.active);
        assert_eq!(cell.gpu_state(), 0);
    }

    #[test]
    fn test_live_cell_rules() {
        let cell = Cell {
            x: 0,
            y: 0,
            active: true,
        };
        assert!(cell.should_flip(0));
        assert!(cell.should_flip(1));
        assert!(!cell.should_flip(2));
        assert!(!cell.should_flip(3));
        assert!(cell.should_flip(4));
        assert!(cell.should_flip(8));
    }

    #[test]
    fn test_dead_cell_rules() {
        let cell = Cell::new(0, 0);
        for n in 0..=8u8 {
            assert_eq!(cell.should_flip(n), n == 3, "neighbors = {}", n);
        }
    }
}
