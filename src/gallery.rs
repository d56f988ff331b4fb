//! Gallery - browse a directory of images one at a time
//!
//! State is the cursor into the path list, the scale, and whether the
//! metadata line is showing. Navigation reloads the image from disk every
//! time, which keeps the metadata current and lets a file that vanished since
//! the directory was listed drop out of the list on its own.

use crate::error::{Result, ViewerError};
use crate::event::Command;
use crate::render::Renderer;
use crate::source::ImageSource;
use crate::terminal::Viewport;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Extensions picked up by the directory scan (compared case-insensitively)
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Status line shown while metadata is hidden
pub const HELP_LINE: &str =
    "[Q] quit\t[\u{2190}] [\u{2192}] navigation\t[\u{2191}] [\u{2193}] scale\t[Space] toggle info";

/// Scale limits and defaults for interactive use
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalleryConfig {
    /// Scale the gallery opens with
    pub initial_scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Amount added or removed per scale key press
    pub scale_step: f64,
    /// Scale restored by the reset key
    pub reset_scale: f64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        GalleryConfig {
            initial_scale: 0.8,
            min_scale: 0.05,
            max_scale: 1.0,
            scale_step: 0.05,
            reset_scale: 1.0,
        }
    }
}

/// Whether the gallery keeps running after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Gallery {
    dir: PathBuf,
    paths: Vec<PathBuf>,
    cursor: usize,
    show_metadata: bool,
    source: ImageSource,
    config: GalleryConfig,
}

impl Gallery {
    /// Scan `dir` for images and load the first readable one
    pub fn load(dir: &Path, config: GalleryConfig) -> Result<Self> {
        let paths = scan_dir(dir)?;
        log::info!("found {} images in {}", paths.len(), dir.display());
        Self::from_paths(dir, paths, config)
    }

    /// Build a gallery over an explicit path list and load the first readable entry
    pub fn from_paths(
        dir: impl Into<PathBuf>,
        paths: Vec<PathBuf>,
        config: GalleryConfig,
    ) -> Result<Self> {
        let dir = dir.into();
        if paths.is_empty() {
            return Err(ViewerError::EmptyDirectory { dir });
        }

        let mut gallery = Gallery {
            dir,
            paths,
            cursor: 0,
            show_metadata: false,
            source: ImageSource::new(config.initial_scale),
            config,
        };
        gallery.reload()?;
        Ok(gallery)
    }

    /// Apply one command; navigation reloads, everything else only changes view state
    pub fn handle(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Next => self.next()?,
            Command::Prev => self.prev()?,
            Command::ScaleUp => self.scale_up(),
            Command::ScaleDown => self.scale_down(),
            Command::ResetScale => self.reset_scale(),
            Command::ToggleMetadata => self.toggle_metadata(),
        }
        Ok(Flow::Continue)
    }

    pub fn next(&mut self) -> Result<()> {
        self.cursor = (self.cursor + 1) % self.paths.len();
        self.reload()
    }

    pub fn prev(&mut self) -> Result<()> {
        let len = self.paths.len();
        self.cursor = (self.cursor + len - 1) % len;
        self.reload()
    }

    pub fn scale_up(&mut self) {
        self.set_scale(self.scale() + self.config.scale_step);
    }

    pub fn scale_down(&mut self) {
        self.set_scale(self.scale() - self.config.scale_step);
    }

    pub fn reset_scale(&mut self) {
        self.source.set_scale(self.config.reset_scale);
    }

    pub fn toggle_metadata(&mut self) {
        self.show_metadata = !self.show_metadata;
    }

    fn set_scale(&mut self, scale: f64) {
        let scale = scale.clamp(self.config.min_scale, self.config.max_scale);
        log::debug!("scale {:.2}", scale);
        self.source.set_scale(scale);
    }

    /// Load the image under the cursor from disk
    ///
    /// An entry that cannot be opened or decoded is removed and the cursor
    /// lands on the entry that followed it, wrapping at the end. Fails with
    /// [`ViewerError::EmptyDirectory`] once nothing is left.
    pub fn reload(&mut self) -> Result<()> {
        loop {
            let path = &self.paths[self.cursor];
            match self.source.load(path) {
                Ok(()) => return Ok(()),
                Err(err) if err.is_file_error() => {
                    log::warn!("dropping {} from gallery: {}", path.display(), err);
                    self.paths.remove(self.cursor);
                    if self.paths.is_empty() {
                        return Err(ViewerError::EmptyDirectory {
                            dir: self.dir.clone(),
                        });
                    }
                    self.cursor %= self.paths.len();
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Clear the screen, draw the image, and put the status line under it
    pub fn redraw<W: Write>(&mut self, screen: &mut Renderer<W>, viewport: Viewport) -> Result<()> {
        screen.clear()?;
        screen.move_cursor(0, 0)?;
        screen.write_text("\r\n")?;

        let rows = self.source.render_to(screen.writer(), viewport)?;

        screen.move_cursor(0, status_row(rows) - 1)?;
        screen.write_text(&self.status_line())?;
        screen.flush()?;
        Ok(())
    }

    /// Metadata line when enabled, otherwise the key help
    pub fn status_line(&self) -> String {
        if self.show_metadata {
            self.metadata_line()
        } else {
            HELP_LINE.to_string()
        }
    }

    /// `name (WxH, size)` for the loaded image
    pub fn metadata_line(&self) -> String {
        let path = self.current_path();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let (width, height) = self.source.dimensions().unwrap_or((0, 0));

        format!(
            "{} ({}x{}, {})",
            name,
            width,
            height,
            human_bytes(self.source.file_size())
        )
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_path(&self) -> &Path {
        &self.paths[self.cursor]
    }

    pub fn scale(&self) -> f64 {
        self.source.scale()
    }

    pub fn metadata_visible(&self) -> bool {
        self.show_metadata
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }
}

/// 1-based terminal row for the status line after drawing `pixel_rows`
///
/// The image starts on row 2 and takes one row per two pixel rows.
pub fn status_row(pixel_rows: u32) -> u16 {
    let row = pixel_rows / 2 + pixel_rows % 2 + 2;
    row.min(u16::MAX as u32) as u16
}

/// `1023 B`, `1.5 KiB`, `2.0 MiB`, ...
pub fn human_bytes(n: u64) -> String {
    const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

    if n < 1024 {
        return format!("{} B", n);
    }

    let mut value = n as f64;
    let mut prefix = 0;
    value /= 1024.0;
    while value >= 1024.0 && prefix < PREFIXES.len() - 1 {
        value /= 1024.0;
        prefix += 1;
    }
    format!("{:.1} {}iB", value, PREFIXES[prefix])
}

/// Whether `path` has one of the gallery's image extensions
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Regular files in `dir` with a supported extension, sorted by name
fn scan_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| ViewerError::DirectoryUnreadable {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| is_supported(p))
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(paths)
}
