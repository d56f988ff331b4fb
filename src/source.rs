//! The currently loaded image and the scale it is drawn at

use crate::error::{Result, ViewerError};
use crate::graphics::{self, HalfBlockRenderer, PixelBuffer};
use crate::terminal::Viewport;
use image::ImageReader;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Holds one decoded image and draws it fitted to a viewport
///
/// The decoded buffer is kept at its native resolution; every draw resamples
/// from it, so repeated resizes never compound interpolation loss.
pub struct ImageSource {
    pixels: Option<PixelBuffer>,
    path: Option<PathBuf>,
    file_size: u64,
    scale: f64,
    rendered_rows: u32,
    renderer: HalfBlockRenderer,
}

impl ImageSource {
    pub fn new(scale: f64) -> Self {
        ImageSource {
            pixels: None,
            path: None,
            file_size: 0,
            scale,
            rendered_rows: 0,
            renderer: HalfBlockRenderer::new(),
        }
    }

    /// Read and decode `path`, replacing the held image
    ///
    /// On failure the previously held image is left as it was.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let open_error = |source| ViewerError::Open {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(open_error)?;
        let file_size = file.metadata().map_err(open_error)?.len();
        let decoded = ImageReader::new(BufReader::new(file))
            .with_guessed_format()
            .map_err(open_error)?
            .decode()
            .map_err(|source| ViewerError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        let pixels = decoded.to_rgb8();
        log::debug!(
            "loaded {} ({}x{}, {} bytes)",
            path.display(),
            pixels.width(),
            pixels.height(),
            file_size
        );

        self.pixels = Some(pixels);
        self.path = Some(path.to_path_buf());
        self.file_size = file_size;
        Ok(())
    }

    /// Fit, resample, and draw the held image into `writer`
    ///
    /// Returns the number of pixel rows drawn (0 when nothing is loaded or the
    /// fit collapses an axis).
    pub fn render_to<W: Write>(&mut self, writer: &mut W, viewport: Viewport) -> Result<u32> {
        let Some(pixels) = &self.pixels else {
            self.rendered_rows = 0;
            return Ok(0);
        };

        let (width, height) = graphics::fit(pixels.width(), pixels.height(), viewport, self.scale);
        let resized = graphics::resize(pixels, width, height);
        let rows = self.renderer.render(writer, &resized)?;

        self.rendered_rows = rows;
        Ok(rows)
    }

    /// Native dimensions of the held image
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.pixels.as_ref().map(|p| p.dimensions())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Size on disk at load time, in bytes
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// Pixel rows drawn by the last `render_to`
    pub fn rendered_rows(&self) -> u32 {
        self.rendered_rows
    }

    /// Terminal lines occupied by the last `render_to`
    pub fn rendered_lines(&self) -> u32 {
        self.rendered_rows.div_ceil(2)
    }
}
