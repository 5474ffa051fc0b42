//! Reading and writing `cells.sav` files on disk.

use std::fs;
use std::path::Path;

use crate::config::SAVE_MIME_TYPE;
use crate::error::PersistenceError;
use crate::serializer::SaveFile;
use crate::simulation::Grid;

/// Write the grid to `path` as a save record
pub fn save(path: &Path, grid: &Grid, cell_size: u32) -> Result<(), PersistenceError> {
    let text = SaveFile::from_grid(grid, cell_size).encode()?;
    fs::write(path, text)?;
    log::info!(
        "Saved {}x{} grid to {} ({})",
        grid.width(),
        grid.height(),
        path.display(),
        SAVE_MIME_TYPE
    );
    Ok(())
}

/// Read and validate a save record from `path`
pub fn load(path: &Path) -> Result<SaveFile, PersistenceError> {
    let text = fs::read_to_string(path)?;
    let save = SaveFile::decode(&text)?;
    log::info!(
        "Read save file {} ({}x{} px, {} px cells)",
        path.display(),
        save.width,
        save.height,
        save.cell_size
    );
    Ok(save)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("life-canvas-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip.sav");
        let mut grid = Grid::new(6, 4).unwrap();
        grid.set_cell(5, 3, true).unwrap();
        grid.set_cell(0, 1, true).unwrap();

        save(&path, &grid, 8).unwrap();
        let loaded = load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!((loaded.width, loaded.height, loaded.cell_size), (48, 32, 8));
        assert_eq!(loaded.to_grid().unwrap(), grid);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(&temp_path("does-not-exist.sav")).unwrap_err();
        assert!(matches!(err, PersistenceError::Io(_)));
    }

    #[test]
    fn test_load_malformed_file() {
        let path = temp_path("malformed.sav");
        fs::write(&path, r#"{"width":8,"height":8}"#).unwrap();
        let err = load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, PersistenceError::Grid(GridError::MalformedData(_))));
    }
}
