//! Aspect-preserving fit of an image into the terminal's half-block pixel grid

use crate::terminal::Viewport;

/// Target pixel resolution for `content` drawn into `viewport` at `scale`
///
/// Each cell carries two stacked pixels, and one row is left for the status
/// line, so the box is `cols` wide and `2 * rows - 1` tall. The content is
/// clamped to the box width first, then re-clamped to its height using the
/// already-narrowed width; it is never enlarged. `scale` multiplies both axes
/// before rounding. Either axis may come out as 0.
pub fn fit(content_width: u32, content_height: u32, viewport: Viewport, scale: f64) -> (u32, u32) {
    let mut x = content_width as f64;
    let mut y = content_height as f64;
    let box_width = viewport.cols as f64;
    let box_height = viewport.usable_pixel_height() as f64;

    if x > box_width {
        y = y * box_width / x;
        x = box_width;
    }
    if y > box_height {
        x = x * box_height / y;
        y = box_height;
    }

    (scaled(x, scale), scaled(y, scale))
}

fn scaled(value: f64, scale: f64) -> u32 {
    (value * scale).round().max(0.0) as u32
}
