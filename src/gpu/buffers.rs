use wgpu::{Buffer, BufferUsages, Device, Queue};

use life_canvas::config::{BACKGROUND_COLOR, CELL_COLOR, GRID_LINE_COLOR};
use life_canvas::Grid;

/// Cell-state storage buffer plus the render uniform
pub struct GridBuffers {
    /// One u32 per cell, row-major (`y * width + x`), 1 = alive
    pub cells_buffer: Buffer,
    pub render_params_buffer: Buffer,
    /// Grid dimensions the cell buffer was sized for
    pub width: usize,
    pub height: usize,
    staging: Vec<u32>,
}

/// Render parameters passed to the fragment shader (80 bytes, aligned to 16)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderParams {
    pub grid_width: u32,
    pub grid_height: u32,
    pub surface_width: f32,
    pub surface_height: f32,

    /// 1 = draw the grid overlay
    pub show_grid: u32,
    pub _padding: [u32; 3],

    pub cell_color: [f32; 4],
    pub background_color: [f32; 4],
    pub line_color: [f32; 4],
}

impl GridBuffers {
    pub fn new(device: &Device, grid: &Grid) -> Self {
        let cell_count = grid.cells().len();

        let cells_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cell-state-buffer"),
            size: (cell_count * std::mem::size_of::<u32>()) as u64,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let render_params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("render-params-buffer"),
            size: std::mem::size_of::<RenderParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            cells_buffer,
            render_params_buffer,
            width: grid.width(),
            height: grid.height(),
            staging: Vec::with_capacity(cell_count),
        }
    }

    /// Whether the cell buffer still matches the grid's dimensions
    pub fn fits(&self, grid: &Grid) -> bool {
        self.width == grid.width() && self.height == grid.height()
    }

    /// Copy the current cell states to the GPU
    pub fn upload_cells(&mut self, queue: &Queue, grid: &Grid) {
        debug_assert!(self.fits(grid), "cell buffer sized for a different grid");
        self.staging.clear();
        self.staging.extend(grid.cells().iter().map(|cell| cell.gpu_state()));
        queue.write_buffer(&self.cells_buffer, 0, bytemuck::cast_slice(&self.staging));
    }

    pub fn update_render_params(&self, queue: &Queue, surface_size: (u32, u32), show_grid: bool) {
        let params = RenderParams {
            grid_width: self.width as u32,
            grid_height: self.height as u32,
            surface_width: surface_size.0 as f32,
            surface_height: surface_size.1 as f32,
            show_grid: u32::from(show_grid),
            _padding: [0; 3],
            cell_color: CELL_COLOR,
            background_color: BACKGROUND_COLOR,
            line_color: GRID_LINE_COLOR,
        };
        queue.write_buffer(&self.render_params_buffer, 0, bytemuck::bytes_of(&params));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_params_size() {
        assert_eq!(std::mem::size_of::<RenderParams>(), 80);
    }
}
