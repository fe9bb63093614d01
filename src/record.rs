use crate::error::ExportError;
use crate::grid::Grid;
use crate::palette::{Rgb, SURFACE_COLORS};
use crate::render::{Renderer, SurfaceLayout};
use std::borrow::Cow;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Records every rendered frame into an animated GIF.
///
/// Surfaces only ever contain palette colours, so frames are written as
/// indices into one global colour table instead of being quantized.
pub struct GifRecorder {
    path: PathBuf,
    layout: SurfaceLayout,
    delay: u16,
    encoder: Option<gif::Encoder<BufWriter<File>>>,
    error: Option<ExportError>,
    frames: usize,
}

impl GifRecorder {
    pub fn create(
        path: &Path,
        layout: SurfaceLayout,
        frame_interval: Duration,
    ) -> Result<Self, ExportError> {
        let width = u16::try_from(layout.width).map_err(|_| ExportError::SurfaceTooLarge)?;
        let height = u16::try_from(layout.height).map_err(|_| ExportError::SurfaceTooLarge)?;

        let global_palette: Vec<u8> = SURFACE_COLORS.iter().flatten().copied().collect();
        let file = BufWriter::new(File::create(path)?);
        let mut encoder = gif::Encoder::new(file, width, height, &global_palette)?;
        encoder.set_repeat(gif::Repeat::Infinite)?;

        // GIF delays are in hundredths of a second
        let delay = (frame_interval.as_millis() / 10).clamp(1, u16::MAX as u128) as u16;
        log::info!("Recording to {} ({}x{} px)", path.display(), width, height);

        Ok(Self {
            path: path.to_path_buf(),
            layout,
            delay,
            encoder: Some(encoder),
            error: None,
            frames: 0,
        })
    }

    /// Write the trailer and close the file. Reports the first error hit
    /// while recording, if any.
    pub fn finish(&mut self) -> Result<usize, ExportError> {
        if let Some(err) = self.error.take() {
            self.encoder = None;
            return Err(err);
        }
        let encoder = self.encoder.take().ok_or(ExportError::Finished)?;
        encoder.into_inner()?;
        log::info!("Wrote {} frames to {}", self.frames, self.path.display());
        Ok(self.frames)
    }

    fn write_frame(&mut self, grid: &Grid) -> Result<(), ExportError> {
        let Some(encoder) = self.encoder.as_mut() else {
            return Err(ExportError::Finished);
        };

        let mut indices = Vec::with_capacity((self.layout.width * self.layout.height) as usize);
        self.layout
            .paint(grid, |_, _, rgb| indices.push(palette_index(rgb)));

        let frame = gif::Frame {
            width: self.layout.width as u16,
            height: self.layout.height as u16,
            delay: self.delay,
            buffer: Cow::Owned(indices),
            ..Default::default()
        };
        encoder.write_frame(&frame)?;
        Ok(())
    }
}

fn palette_index(rgb: Rgb) -> u8 {
    SURFACE_COLORS
        .iter()
        .position(|c| *c == rgb)
        .unwrap_or(0) as u8
}

impl Renderer for GifRecorder {
    fn render(&mut self, grid: &Grid) {
        if self.error.is_some() || self.encoder.is_none() {
            return;
        }
        match self.write_frame(grid) {
            Ok(()) => self.frames += 1,
            Err(err) => {
                log::warn!("Stopped recording {}: {}", self.path.display(), err);
                self.error = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellState;
    use tempfile::TempDir;

    fn decode_frames(path: &Path) -> Vec<Vec<u8>> {
        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::Indexed);
        let mut decoder = options.read_info(File::open(path).unwrap()).unwrap();
        let mut frames = Vec::new();
        while let Some(frame) = decoder.read_next_frame().unwrap() {
            frames.push(frame.buffer.to_vec());
        }
        frames
    }

    #[test]
    fn test_records_each_render_as_a_frame() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fire.gif");
        let layout = SurfaceLayout::new(30, 30, 3, 3);
        let mut recorder = GifRecorder::create(&path, layout, Duration::from_millis(100)).unwrap();

        let mut grid = Grid::initialize(3, 3, 1, 1).unwrap();
        recorder.render(&grid);
        grid.stage_next(1, 1, CellState::Burnt);
        grid.commit();
        recorder.render(&grid);

        assert_eq!(recorder.finish().unwrap(), 2);
        let frames = decode_frames(&path);
        assert_eq!(frames.len(), 2);

        // Centre pixel of the middle cell: red, then gray
        let centre = 15 * 30 + 15;
        assert_eq!(frames[0][centre], palette_index(crate::palette::RED));
        assert_eq!(frames[1][centre], palette_index(crate::palette::GRAY));
    }

    #[test]
    fn test_finish_twice_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.gif");
        let layout = SurfaceLayout::new(9, 9, 3, 3);
        let mut recorder = GifRecorder::create(&path, layout, Duration::from_millis(100)).unwrap();

        assert_eq!(recorder.finish().unwrap(), 0);
        assert!(matches!(recorder.finish(), Err(ExportError::Finished)));

        // Rendering after finish is silently ignored
        recorder.render(&Grid::initialize(3, 3, 1, 1).unwrap());
        assert_eq!(recorder.frames, 0);
    }

    #[test]
    fn test_unwritable_path_fails_at_create() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("fire.gif");
        let layout = SurfaceLayout::new(9, 9, 3, 3);
        assert!(matches!(
            GifRecorder::create(&path, layout, Duration::from_millis(100)),
            Err(ExportError::Io(_))
        ));
    }
}
