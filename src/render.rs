//! Screen output - buffered writes, clearing, and cursor placement
//!
//! Performance optimizations:
//! - Write buffering to minimize syscalls
//! - One flush per frame

use anyhow::Result;
use std::io::{self, BufWriter, Write};

/// Default buffer capacity for write batching (64KB; a full-screen image frame
/// is mostly escape sequences)
const WRITE_BUFFER_CAPACITY: usize = 64 * 1024;

/// Buffered terminal writer
///
/// Call `flush()` after a batch of operations to ensure output is displayed.
pub struct Renderer<W: Write> {
    writer: BufWriter<W>,
}

impl Renderer<io::Stdout> {
    /// Renderer on standard output
    pub fn stdout() -> Self {
        Renderer::new(io::stdout())
    }
}

impl<W: Write> Renderer<W> {
    pub fn new(inner: W) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(WRITE_BUFFER_CAPACITY, inner),
        }
    }

    /// Clear the screen
    pub fn clear(&mut self) -> io::Result<()> {
        self.writer.write_all(b"\x1b[2J")
    }

    /// Move cursor to position (0-indexed)
    #[inline]
    pub fn move_cursor(&mut self, col: u16, row: u16) -> io::Result<()> {
        write!(self.writer, "\x1b[{};{}H", row as u32 + 1, col as u32 + 1)
    }

    /// Write text at current cursor position
    #[inline]
    pub fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())
    }

    /// Direct access for bulk writers such as the image encoder
    pub fn writer(&mut self) -> &mut BufWriter<W> {
        &mut self.writer
    }

    /// Flush output buffer to terminal
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::Error::new(e.into_error()))
    }
}
