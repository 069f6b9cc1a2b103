//! Pixel-buffer surface the animation renders onto.

use std::ops::RangeInclusive;

pub type Color = [u8; 3];

/// Dots, anchors and segments are drawn in ink.
pub const INK: Color = [0, 0, 0];
/// The chosen start point gets a red marker so it stands out.
pub const MARKER: Color = [255, 0, 0];
const BACKGROUND: Color = [255, 255, 255];

pub const PIXEL_SIZE_RANGE: RangeInclusive<u32> = 1..=5;
pub const DEFAULT_PIXEL_SIZE: u32 = 3;

/// Rendering collaborator for the animation driver. Exactly one of the two
/// drawing methods runs per step; `clear` runs when a run is reinitialized.
pub trait Surface {
    /// Fills a square of the configured pixel size whose top-left corner is
    /// the rounded coordinate.
    fn draw_point(&mut self, x: f64, y: f64, color: Color);
    /// Strokes a one-pixel ink line between two points.
    fn draw_segment(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);
    /// Resets every pixel to the background.
    fn clear(&mut self);
}

/// RGBA8 buffer sized to the canvas widget. Drawing accumulates; nothing
/// outside `clear` ever erases earlier points.
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixel_size: u32,
    pixels: Vec<u8>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut surface = Self {
            width,
            height,
            pixel_size: DEFAULT_PIXEL_SIZE,
            pixels: vec![0; (width * height * 4) as usize],
        };
        surface.clear();
        surface
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Side length of the square painted per point, clamped to 1..=5.
    pub fn set_pixel_size(&mut self, size: u32) {
        self.pixel_size = size.clamp(*PIXEL_SIZE_RANGE.start(), *PIXEL_SIZE_RANGE.end());
    }

    pub fn rgba(&self) -> &[u8] {
        &self.pixels
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = ((y as u32 * self.width + x as u32) * 4) as usize;
        self.pixels[idx] = color[0];
        self.pixels[idx + 1] = color[1];
        self.pixels[idx + 2] = color[2];
        self.pixels[idx + 3] = 0xFF;
    }
}

impl Surface for PixelSurface {
    fn draw_point(&mut self, x: f64, y: f64, color: Color) {
        let left = x.round() as i32;
        let top = y.round() as i32;
        let size = self.pixel_size as i32;
        for dy in 0..size {
            for dx in 0..size {
                self.set_pixel(left + dx, top + dy, color);
            }
        }
    }

    fn draw_segment(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        // Bresenham, clipped per pixel.
        let mut x = x1.round() as i32;
        let mut y = y1.round() as i32;
        let x_end = x2.round() as i32;
        let y_end = y2.round() as i32;

        let dx = (x_end - x).abs();
        let sx = if x < x_end { 1 } else { -1 };
        let dy = -(y_end - y).abs();
        let sy = if y < y_end { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel(x, y, INK);
            if x == x_end && y == y_end {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn clear(&mut self) {
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel[..3].copy_from_slice(&BACKGROUND);
            pixel[3] = 0xFF;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(surface: &PixelSurface, x: u32, y: u32) -> Color {
        let idx = ((y * surface.width() + x) * 4) as usize;
        let rgba = surface.rgba();
        [rgba[idx], rgba[idx + 1], rgba[idx + 2]]
    }

    fn count_ink(surface: &PixelSurface) -> usize {
        surface
            .rgba()
            .chunks_exact(4)
            .filter(|px| [px[0], px[1], px[2]] != BACKGROUND)
            .count()
    }

    #[test]
    fn new_surface_is_background() {
        let surface = PixelSurface::new(16, 16);
        assert_eq!(count_ink(&surface), 0);
        assert_eq!(surface.rgba().len(), 16 * 16 * 4);
    }

    #[test]
    fn point_fills_square_at_rounded_coordinate() {
        let mut surface = PixelSurface::new(20, 20);
        surface.set_pixel_size(3);
        surface.draw_point(5.4, 6.6, INK);

        // Rounds to (5, 7); the square spans 3 pixels right and down.
        for dy in 0..3 {
            for dx in 0..3 {
                assert_eq!(pixel(&surface, 5 + dx, 7 + dy), INK);
            }
        }
        assert_eq!(pixel(&surface, 4, 7), BACKGROUND);
        assert_eq!(pixel(&surface, 8, 7), BACKGROUND);
        assert_eq!(pixel(&surface, 5, 6), BACKGROUND);
        assert_eq!(count_ink(&surface), 9);
    }

    #[test]
    fn pixel_size_clamps_to_supported_range() {
        let mut surface = PixelSurface::new(20, 20);
        surface.set_pixel_size(99);
        surface.draw_point(0.0, 0.0, INK);
        assert_eq!(count_ink(&surface), 25);

        surface.clear();
        surface.set_pixel_size(0);
        surface.draw_point(0.0, 0.0, INK);
        assert_eq!(count_ink(&surface), 1);
    }

    #[test]
    fn out_of_bounds_drawing_is_clipped() {
        let mut surface = PixelSurface::new(10, 10);
        surface.draw_point(-20.0, -20.0, INK);
        surface.draw_point(50.0, 50.0, INK);
        surface.draw_segment(-5.0, 3.0, 30.0, 3.0);

        // The segment crosses the surface; only its on-surface span lands.
        for x in 0..10 {
            assert_eq!(pixel(&surface, x, 3), INK);
        }
        assert_eq!(count_ink(&surface), 10);
    }

    #[test]
    fn segment_covers_both_endpoints() {
        let mut surface = PixelSurface::new(16, 16);
        surface.draw_segment(2.0, 2.0, 9.0, 9.0);
        assert_eq!(pixel(&surface, 2, 2), INK);
        assert_eq!(pixel(&surface, 9, 9), INK);

        surface.draw_segment(12.0, 1.0, 12.0, 6.0);
        for y in 1..=6 {
            assert_eq!(pixel(&surface, 12, y), INK);
        }
    }

    #[test]
    fn drawing_accumulates_until_cleared() {
        let mut surface = PixelSurface::new(12, 12);
        surface.set_pixel_size(1);
        surface.draw_point(2.0, 2.0, INK);
        surface.draw_point(8.0, 8.0, MARKER);
        assert_eq!(pixel(&surface, 2, 2), INK);
        assert_eq!(pixel(&surface, 8, 8), MARKER);

        surface.clear();
        assert_eq!(count_ink(&surface), 0);
    }
}
