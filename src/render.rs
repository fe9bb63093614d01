use crate::error::ExportError;
use crate::grid::Grid;
use crate::palette::{self, Rgb, WHITE};
use image::RgbImage;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Draws committed grid states. Only ever sees a fully committed grid.
pub trait Renderer {
    fn render(&mut self, grid: &Grid);
}

/// Lets a caller keep a handle to a renderer it hands to the simulation
impl<R: Renderer + ?Sized> Renderer for Rc<RefCell<R>> {
    fn render(&mut self, grid: &Grid) {
        self.borrow_mut().render(grid);
    }
}

/// Pixel geometry of a rendered surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLayout {
    pub width: u32,
    pub height: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl SurfaceLayout {
    /// Cells are `surface / grid` pixels on each axis (at least one pixel).
    /// Leftover pixels on the right and bottom stay background.
    pub fn new(surface_width: u32, surface_height: u32, grid_width: usize, grid_height: usize) -> Self {
        let cell_width = (surface_width / grid_width as u32).max(1);
        let cell_height = (surface_height / grid_height as u32).max(1);
        Self {
            width: surface_width.max(cell_width * grid_width as u32),
            height: surface_height.max(cell_height * grid_height as u32),
            cell_width,
            cell_height,
        }
    }

    /// Colour of every pixel, row-major, for the given grid
    pub fn paint(&self, grid: &Grid, mut put: impl FnMut(u32, u32, Rgb)) {
        for py in 0..self.height {
            for px in 0..self.width {
                put(px, py, self.pixel(grid, px, py));
            }
        }
    }

    fn pixel(&self, grid: &Grid, px: u32, py: u32) -> Rgb {
        let x = (px / self.cell_width) as usize;
        let y = (py / self.cell_height) as usize;
        if x >= grid.width() || y >= grid.height() {
            return WHITE;
        }

        let style = palette::style(grid.get(x, y));
        let lx = px % self.cell_width;
        let ly = py % self.cell_height;
        let on_outline =
            lx == 0 || ly == 0 || lx == self.cell_width - 1 || ly == self.cell_height - 1;
        if on_outline && self.cell_width > 2 && self.cell_height > 2 {
            style.outline
        } else {
            style.fill
        }
    }
}

/// Renders the grid to an in-memory RGB surface, like a canvas
pub struct SurfaceRenderer {
    surface_width: u32,
    surface_height: u32,
    image: Option<RgbImage>,
    frames: usize,
}

impl SurfaceRenderer {
    pub fn new(surface_width: u32, surface_height: u32) -> Self {
        Self {
            surface_width,
            surface_height,
            image: None,
            frames: 0,
        }
    }

    /// Write the last rendered surface as PNG
    pub fn save_png(&self, path: &Path) -> Result<(), ExportError> {
        let image = self.image.as_ref().ok_or(ExportError::NothingRendered)?;
        image.save(path)?;
        log::info!("Wrote frame to {}", path.display());
        Ok(())
    }
}

impl Renderer for SurfaceRenderer {
    fn render(&mut self, grid: &Grid) {
        let layout = SurfaceLayout::new(
            self.surface_width,
            self.surface_height,
            grid.width(),
            grid.height(),
        );
        let mut image = RgbImage::new(layout.width, layout.height);
        layout.paint(grid, |x, y, rgb| image.put_pixel(x, y, image::Rgb(rgb)));
        self.image = Some(image);
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{BLACK, GRAY, GREEN, RED};
    use tempfile::TempDir;

    #[test]
    fn test_layout_matches_reference_canvas() {
        let layout = SurfaceLayout::new(300, 300, 20, 20);
        assert_eq!((layout.cell_width, layout.cell_height), (15, 15));
        assert_eq!((layout.width, layout.height), (300, 300));
    }

    #[test]
    fn test_layout_grows_tiny_surfaces() {
        let layout = SurfaceLayout::new(10, 10, 20, 30);
        assert_eq!((layout.cell_width, layout.cell_height), (1, 1));
        assert_eq!((layout.width, layout.height), (20, 30));
    }

    #[test]
    fn test_cells_are_filled_and_outlined() {
        let grid = Grid::initialize(5, 5, 2, 2).unwrap();
        let mut renderer = SurfaceRenderer::new(50, 50);
        renderer.render(&grid);
        let image = renderer.image.as_ref().unwrap();

        // Cells are 10x10; sample centres and edges
        assert_eq!(image.get_pixel(5, 5).0, GRAY); // border cell
        assert_eq!(image.get_pixel(25, 25).0, RED); // ignition cell
        assert_eq!(image.get_pixel(15, 15).0, GREEN);
        assert_eq!(image.get_pixel(20, 25).0, BLACK); // outline of (2, 2)
        assert_eq!(image.get_pixel(29, 25).0, BLACK);
        assert_eq!(renderer.frames, 1);
    }

    #[test]
    fn test_leftover_pixels_are_background() {
        let grid = Grid::initialize(3, 3, 1, 1).unwrap();
        let mut renderer = SurfaceRenderer::new(32, 32);
        renderer.render(&grid);
        let image = renderer.image.as_ref().unwrap();
        assert_eq!(image.dimensions(), (32, 32));
        assert_eq!(image.get_pixel(31, 31).0, WHITE);
    }

    #[test]
    fn test_save_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frame.png");

        let mut renderer = SurfaceRenderer::new(40, 40);
        assert!(matches!(
            renderer.save_png(&path),
            Err(ExportError::NothingRendered)
        ));

        renderer.render(&Grid::initialize(4, 4, 1, 2).unwrap());
        renderer.save_png(&path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (40, 40));
        assert_eq!(loaded.get_pixel(15, 25).0, RED);
    }

    #[test]
    fn test_shared_handle_renders_through() {
        let shared = Rc::new(RefCell::new(SurfaceRenderer::new(30, 30)));
        let mut handle: Box<dyn Renderer> = Box::new(Rc::clone(&shared));
        handle.render(&Grid::initialize(3, 3, 1, 1).unwrap());
        assert_eq!(shared.borrow().frames, 1);
    }
}
