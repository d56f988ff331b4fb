//! Half-block cell encoding: two vertically stacked pixels per character

use super::{HalfBlockRenderer, PixelBuffer};
use std::fmt::Write as _;
use std::io::{self, Write};

/// Upper half block; foreground paints the top pixel, background the bottom
pub const HALF_BLOCK: char = '▀';

const RESET: &str = "\x1b[0m";

impl HalfBlockRenderer {
    /// Write `buffer` as true-color half blocks, one line per pair of pixel rows
    ///
    /// Each line starts with a carriage return so output lands at column 0
    /// even after a resize left the cursor elsewhere. An odd final row is
    /// drawn with the same color on top and bottom. Returns the number of
    /// pixel rows written; an empty buffer writes nothing.
    ///
    /// Lines are assembled in the reusable line buffer and written once each.
    pub fn render<W: Write>(&mut self, writer: &mut W, buffer: &PixelBuffer) -> io::Result<u32> {
        let (width, height) = buffer.dimensions();
        if width == 0 || height == 0 {
            return Ok(0);
        }

        for top_y in (0..height).step_by(2) {
            let bottom_y = if top_y + 1 < height { top_y + 1 } else { top_y };

            self.line_buffer.clear();
            self.line_buffer.push('\r');
            for x in 0..width {
                let top = buffer.get_pixel(x, top_y).0;
                let bottom = buffer.get_pixel(x, bottom_y).0;
                push_cell(&mut self.line_buffer, top, bottom);
            }
            self.line_buffer.push('\n');

            writer.write_all(self.line_buffer.as_bytes())?;
        }

        Ok(height)
    }
}

fn push_cell(line: &mut String, top: [u8; 3], bottom: [u8; 3]) {
    // Writing into a String cannot fail
    let _ = write!(
        line,
        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{}{}",
        top[0], top[1], top[2], bottom[0], bottom[1], bottom[2], HALF_BLOCK, RESET
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn render_to_string(buffer: &PixelBuffer) -> (u32, String) {
        let mut renderer = HalfBlockRenderer::new();
        let mut out = Vec::new();
        let rows = renderer.render(&mut out, buffer).unwrap();
        (rows, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_single_cell_sequence() {
        let mut buffer = PixelBuffer::new(1, 2);
        buffer.put_pixel(0, 0, Rgb([255, 0, 0]));
        buffer.put_pixel(0, 1, Rgb([0, 0, 255]));

        let (rows, out) = render_to_string(&buffer);
        assert_eq!(rows, 2);
        assert_eq!(out, "\r\x1b[38;2;255;0;0m\x1b[48;2;0;0;255m▀\x1b[0m\n");
    }

    #[test]
    fn test_two_rows_per_line() {
        let buffer = PixelBuffer::from_pixel(3, 4, Rgb([10, 20, 30]));
        let (rows, out) = render_to_string(&buffer);

        assert_eq!(rows, 4);
        let lines: Vec<&str> = out.split_terminator('\n').collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            assert!(line.starts_with('\r'));
            assert_eq!(line.matches(HALF_BLOCK).count(), 3);
            assert_eq!(line.matches(RESET).count(), 3);
        }
    }

    #[test]
    fn test_odd_height_repeats_last_row() {
        // 47 rows -> 24 lines, the last one using row 46 for both halves
        let mut buffer = PixelBuffer::from_pixel(2, 47, Rgb([0, 0, 0]));
        buffer.put_pixel(0, 46, Rgb([1, 2, 3]));
        buffer.put_pixel(1, 46, Rgb([4, 5, 6]));

        let (rows, out) = render_to_string(&buffer);
        assert_eq!(rows, 47);

        let lines: Vec<&str> = out.split_terminator('\n').collect();
        assert_eq!(lines.len(), 24);
        assert_eq!(
            lines[23],
            "\r\x1b[38;2;1;2;3m\x1b[48;2;1;2;3m▀\x1b[0m\x1b[38;2;4;5;6m\x1b[48;2;4;5;6m▀\x1b[0m"
        );
    }

    #[test]
    fn test_empty_buffer_writes_nothing() {
        let (rows, out) = render_to_string(&PixelBuffer::new(0, 0));
        assert_eq!(rows, 0);
        assert!(out.is_empty());

        let (rows, out) = render_to_string(&PixelBuffer::new(0, 5));
        assert_eq!(rows, 0);
        assert!(out.is_empty());
    }
}
