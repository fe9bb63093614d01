use crate::error::ExportError;
use crate::render::{Renderer, SurfaceRenderer};
use crate::simulation::ForestFire;
use std::path::PathBuf;

/// Main application state
pub struct App {
    pub simulation: ForestFire,
    pub show_help: bool,
    pub help_scroll: u16,
    /// One-line feedback shown in the sidebar (exports, errors)
    pub status_message: Option<String>,
}

impl App {
    pub fn with_simulation(simulation: ForestFire) -> Self {
        Self {
            simulation,
            show_help: false,
            help_scroll: 0,
            status_message: None,
        }
    }

    /// Run whatever ticks came due since the last frame
    pub fn tick(&mut self) {
        self.simulation.pump();
    }

    /// Toggle between playing and paused
    pub fn toggle_play(&mut self) {
        self.simulation.toggle_play();
    }

    /// Advance exactly one tick
    pub fn step(&mut self) {
        self.simulation.step();
    }

    /// Reset simulation with a new ignition point
    pub fn reset(&mut self) {
        self.status_message = match self.simulation.reset() {
            Ok(()) => None,
            Err(err) => Some(err.to_string()),
        };
    }

    /// Save the current frame as `forest-fire-tick-NNNN.png` in the working directory
    pub fn export_frame(&mut self) {
        let path = PathBuf::from(format!("forest-fire-tick-{:04}.png", self.simulation.tick()));
        self.status_message = Some(match self.write_frame(&path) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(err) => {
                log::warn!("Frame export failed: {}", err);
                format!("Export failed: {}", err)
            }
        });
    }

    fn write_frame(&self, path: &std::path::Path) -> Result<(), ExportError> {
        let settings = self.simulation.settings();
        let mut renderer = SurfaceRenderer::new(settings.surface_width, settings.surface_height);
        renderer.render(self.simulation.grid());
        renderer.save_png(path)
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }
}
