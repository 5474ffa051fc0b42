use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use life_canvas::config::RANDOM_DENSITY;
use life_canvas::{persistence, Grid, RunState, Simulation, Tick};

use crate::gpu::{GpuContext, GridBuffers, RenderPipeline};

/// Translate a cursor position to grid coordinates, `None` outside the grid
pub fn cell_at(
    position: PhysicalPosition<f64>,
    scale_factor: f64,
    cell_size: u32,
    grid: &Grid,
) -> Option<(usize, usize)> {
    let logical = position.to_logical::<f64>(scale_factor);
    if logical.x < 0.0 || logical.y < 0.0 {
        return None;
    }
    let x = (logical.x / f64::from(cell_size)).floor() as usize;
    let y = (logical.y / f64::from(cell_size)).floor() as usize;
    (x < grid.width() && y < grid.height()).then_some((x, y))
}

/// Logical window size for a grid, saturating instead of wrapping on huge grids
pub fn surface_size(grid_width: usize, grid_height: usize, cell_size: u32) -> LogicalSize<u32> {
    let pixels = |cells: usize| u32::try_from(cells).unwrap_or(u32::MAX).saturating_mul(cell_size);
    LogicalSize::new(pixels(grid_width), pixels(grid_height))
}

/// Pointer state tracked between events
#[derive(Default)]
struct Pointer {
    position: Option<PhysicalPosition<f64>>,
    pressed: bool,
}

/// Application state
pub struct App {
    simulation: Simulation,
    cell_size: u32,
    save_path: PathBuf,
    show_grid: bool,
    next_tick: Instant,
    pointer: Pointer,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    grid_buffers: Option<GridBuffers>,
    render_pipeline: Option<RenderPipeline>,
}

impl App {
    pub fn new(simulation: Simulation, cell_size: u32, save_path: PathBuf) -> Self {
        Self {
            simulation,
            cell_size,
            save_path,
            show_grid: true,
            next_tick: Instant::now(),
            pointer: Pointer::default(),
            window: None,
            gpu: None,
            grid_buffers: None,
            render_pipeline: None,
        }
    }

    /// Window size in logical pixels for the current grid
    fn surface_size(&self) -> LogicalSize<u32> {
        let grid = self.simulation.grid();
        surface_size(grid.width(), grid.height(), self.cell_size)
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn update_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let state = match self.simulation.state() {
            RunState::Running => "running",
            RunState::Stopped => "stopped",
        };
        window.set_title(&format!(
            "Life - generation {} - population {} - {} @ {} ms",
            self.simulation.generation(),
            self.simulation.grid().population(),
            state,
            self.simulation.tick_interval().as_millis()
        ));
    }

    fn render(&mut self) {
        let (Some(gpu), Some(render)) = (self.gpu.as_ref(), self.render_pipeline.as_ref()) else {
            return;
        };
        let grid = self.simulation.grid();

        // A load may have changed the grid size
        let buffers = match self.grid_buffers.take() {
            Some(buffers) if buffers.fits(grid) => buffers,
            _ => {
                log::debug!("Allocating cell buffer for {}x{} grid", grid.width(), grid.height());
                GridBuffers::new(&gpu.device, grid)
            }
        };
        let buffers = self.grid_buffers.insert(buffers);
        buffers.upload_cells(&gpu.queue, grid);
        buffers.update_render_params(&gpu.queue, gpu.surface_size(), self.show_grid);

        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        let bind_group = render.create_bind_group(
            &gpu.device,
            &buffers.cells_buffer,
            &buffers.render_params_buffer,
        );
        render.draw(&mut encoder, &view, &bind_group);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.update_title();
    }

    /// Run the scheduler: tick once the deadline has passed, then sleep until the next one
    fn drive_ticks(&mut self, event_loop: &ActiveEventLoop) {
        if !self.simulation.is_running() {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }

        let now = Instant::now();
        if now >= self.next_tick {
            if self.simulation.tick() == Tick::Redraw {
                self.request_redraw();
            }
            self.next_tick = now + self.simulation.tick_interval();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }

    fn pointer_cell(&self) -> Option<(usize, usize)> {
        let window = self.window.as_ref()?;
        let position = self.pointer.position?;
        cell_at(
            position,
            window.scale_factor(),
            self.cell_size,
            self.simulation.grid(),
        )
    }

    fn handle_mouse_button(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pointer.pressed = true;
                let Some((x, y)) = self.pointer_cell() else {
                    return;
                };
                match self.simulation.begin_toggle_edit(x, y) {
                    Ok(paint) => {
                        log::trace!("Paint {} from ({}, {})", paint, x, y);
                        self.request_redraw();
                    }
                    Err(e) => log::warn!("Edit rejected: {}", e),
                }
            }
            ElementState::Released => {
                self.pointer.pressed = false;
                self.simulation.end_edit();
            }
        }
    }

    fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.pointer.position = Some(position);
        if !self.pointer.pressed {
            return;
        }
        let Some((x, y)) = self.pointer_cell() else {
            return;
        };

        // Drag started outside the grid: the first cell reached picks the paint value
        if self.simulation.paint_value().is_none() {
            if self.simulation.begin_toggle_edit(x, y).is_ok() {
                self.request_redraw();
            }
            return;
        }

        match self.simulation.continue_edit(x, y) {
            Ok(true) => self.request_redraw(),
            Ok(false) => {}
            Err(e) => log::warn!("Edit rejected: {}", e),
        }
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::Space => {
                let state = self.simulation.toggle();
                self.next_tick = Instant::now() + self.simulation.tick_interval();
                log::info!("Simulation {:?}", state);
            }

            // Single generation while stopped
            KeyCode::KeyN => {
                if !self.simulation.is_running() {
                    self.simulation.step_once();
                    self.request_redraw();
                }
            }

            KeyCode::Equal | KeyCode::NumpadAdd => {
                let interval = self.simulation.speed_up();
                log::info!("Tick interval: {} ms", interval.as_millis());
            }
            KeyCode::Minus | KeyCode::NumpadSubtract => {
                let interval = self.simulation.slow_down();
                log::info!("Tick interval: {} ms", interval.as_millis());
            }

            KeyCode::KeyC => {
                self.simulation.clear();
                log::info!("Grid cleared");
                self.request_redraw();
            }
            KeyCode::KeyR => {
                self.simulation.randomize(&mut rand::thread_rng(), RANDOM_DENSITY);
                log::info!("Grid randomized, population {}", self.simulation.grid().population());
                self.request_redraw();
            }

            KeyCode::KeyG => {
                self.show_grid = !self.show_grid;
                self.request_redraw();
            }

            KeyCode::KeyS => self.save(),
            KeyCode::KeyL => self.load(),

            _ => {}
        }

        self.update_title();
    }

    fn save(&self) {
        if let Err(e) = persistence::save(&self.save_path, self.simulation.grid(), self.cell_size) {
            log::error!("Save to {} failed: {}", self.save_path.display(), e);
        }
    }

    /// Replace the grid from the save file; a rejected file leaves everything as it was
    fn load(&mut self) {
        let result = persistence::load(&self.save_path).and_then(|save| {
            let cell_size = save.cell_size_px()?;
            save.apply_to(&mut self.simulation)?;
            Ok(cell_size)
        });

        match result {
            Ok(cell_size) => {
                self.cell_size = cell_size;
                self.pointer.pressed = false;
                let size = self.surface_size();
                log::info!(
                    "Loaded {}x{} grid, simulation stopped",
                    self.simulation.grid().width(),
                    self.simulation.grid().height()
                );
                if let Some(window) = &self.window {
                    let _ = window.request_inner_size(size);
                }
                self.request_redraw();
            }
            Err(e) => log::warn!("Load from {} rejected: {}", self.save_path.display(), e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let grid = self.simulation.grid();
        log::info!(
            "Grid size: {}x{} cells at {} px",
            grid.width(),
            grid.height(),
            self.cell_size
        );

        let window_attrs = Window::default_attributes()
            .with_title("Life")
            .with_inner_size(self.surface_size())
            .with_resizable(false);

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        log::info!("Creating GPU context...");
        let gpu = pollster::block_on(GpuContext::new(window.clone()));
        let grid_buffers = GridBuffers::new(&gpu.device, self.simulation.grid());
        let render_pipeline = RenderPipeline::new(&gpu.device, gpu.format());

        log::info!("Controls:");
        log::info!("  Mouse drag: Paint cells");
        log::info!("  Space: Start/stop");
        log::info!("  N: Single step");
        log::info!("  +/-: Faster/slower");
        log::info!("  C: Clear, R: Random fill");
        log::info!("  G: Toggle grid lines");
        log::info!("  S/L: Save/load {}", self.save_path.display());
        log::info!("  Escape: Quit");

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.grid_buffers = Some(grid_buffers);
        self.render_pipeline = Some(render_pipeline);
        self.next_tick = Instant::now() + self.simulation.tick_interval();
        self.update_title();
        self.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() && !event.repeat {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.handle_mouse_button(state),
            WindowEvent::CursorMoved { position, .. } => self.handle_cursor_moved(position),
            WindowEvent::CursorLeft { .. } => {
                self.pointer.position = None;
                self.pointer.pressed = false;
                self.simulation.end_edit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                }
                self.request_redraw();
            }
            WindowEvent::RedrawRequested => self.render(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.drive_ticks(event_loop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_at_floors_pixels() {
        let grid = Grid::new(10, 5).unwrap();
        assert_eq!(cell_at(PhysicalPosition::new(0.0, 0.0), 1.0, 8, &grid), Some((0, 0)));
        assert_eq!(cell_at(PhysicalPosition::new(7.9, 8.0), 1.0, 8, &grid), Some((0, 1)));
        assert_eq!(cell_at(PhysicalPosition::new(79.0, 39.0), 1.0, 8, &grid), Some((9, 4)));
    }

    #[test]
    fn test_cell_at_outside_grid() {
        let grid = Grid::new(10, 5).unwrap();
        assert_eq!(cell_at(PhysicalPosition::new(80.0, 0.0), 1.0, 8, &grid), None);
        assert_eq!(cell_at(PhysicalPosition::new(0.0, 40.0), 1.0, 8, &grid), None);
        assert_eq!(cell_at(PhysicalPosition::new(-1.0, 3.0), 1.0, 8, &grid), None);
    }

    #[test]
    fn test_cell_at_hidpi() {
        let grid = Grid::new(10, 5).unwrap();
        // 2x scale: 32 physical px = 16 logical px = cell 2
        assert_eq!(cell_at(PhysicalPosition::new(32.0, 16.0), 2.0, 8, &grid), Some((2, 1)));
    }

    #[test]
    fn test_surface_size() {
        assert_eq!(surface_size(100, 75, 8), LogicalSize::new(800, 600));
        assert_eq!(surface_size(100_000_000, 2, 64), LogicalSize::new(u32::MAX, 128));
        assert_eq!(surface_size(usize::MAX, 1, 1).width, u32::MAX);
    }
}
