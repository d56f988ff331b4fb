//! sketch - true-color images in the terminal, two pixels per character cell
//!
//! Each cell draws an upper half block whose foreground is one pixel and
//! whose background is the pixel below it, doubling vertical resolution.
//! - One-shot rendering of image files fitted to the terminal
//! - Interactive gallery over a directory with live rescaling
//! - Raw-mode session that always restores the terminal on the way out

pub mod app;
pub mod cli;
pub mod error;
pub mod event;
pub mod gallery;
pub mod graphics;
pub mod render;
pub mod source;
pub mod terminal;

// Re-export commonly used types
pub use error::{Result, ViewerError};
pub use event::{AppEvent, Command, InputDriver};
pub use gallery::{Flow, Gallery, GalleryConfig};
pub use graphics::{fit, HalfBlockRenderer, PixelBuffer};
pub use render::Renderer;
pub use source::ImageSource;
pub use terminal::{TerminalSession, Viewport};
