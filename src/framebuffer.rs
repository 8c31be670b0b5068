//! Per-pixel colour storage handed to display and export collaborators.
//!
//! Storage is row-major with `row` the vertical index and `col` the
//! horizontal one. Row 0 is the bottom of the viewport, matching the camera's
//! pixel mapping; [`Framebuffer::to_image`] flips rows so the exported image
//! has +y up.

use crate::algebra::Vec3;
use image::{Rgb, RgbImage};
use std::path::Path;

#[derive(Clone, Debug, PartialEq)]
pub struct Framebuffer {
    rows: usize,
    cols: usize,
    pixels: Vec<Vec3>,
}

impl Framebuffer {
    /// New buffer cleared to white.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols, pixels: vec![Vec3::ONE; rows * cols] }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Clamps each channel into `[0, 1]` before storing.
    pub fn write(&mut self, row: usize, col: usize, color: Vec3) {
        let i = self.index(row, col);
        self.pixels[i] = clamp_color(color);
    }

    pub fn get(&self, row: usize, col: usize) -> Vec3 {
        self.pixels[self.index(row, col)]
    }

    /// Read-only row-major view of every pixel.
    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Vec3] {
        &mut self.pixels
    }

    /// Column-major `(col, row, channel)` copy for displays indexed `[x][y]`.
    pub fn transposed(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for col in 0..self.cols {
            for row in 0..self.rows {
                out.extend_from_slice(&self.get(row, col).to_array());
            }
        }
        out
    }

    pub fn to_image(&self) -> RgbImage {
        let mut img = RgbImage::new(self.cols as u32, self.rows as u32);
        for row in 0..self.rows {
            let y = (self.rows - 1 - row) as u32;
            for col in 0..self.cols {
                img.put_pixel(col as u32, y, Rgb(to_rgb8(self.get(row, col))));
            }
        }
        img
    }

    pub fn save(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        self.to_image().save(path)
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(row < self.rows && col < self.cols, "pixel ({row}, {col}) out of bounds");
        row * self.cols + col
    }
}

pub(crate) fn clamp_color(c: Vec3) -> Vec3 {
    c.clamp(0.0, 1.0)
}

fn to_rgb8(c: Vec3) -> [u8; 3] {
    let c = clamp_color(c).scale(255.0);
    [c.0.round() as u8, c.1.round() as u8, c.2.round() as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_clamps() {
        let mut fb = Framebuffer::new(2, 3);
        fb.write(1, 2, Vec3(1.5, -0.2, 0.25));
        assert_eq!(fb.get(1, 2), Vec3(1.0, 0.0, 0.25));
        assert_eq!(fb.get(0, 0), Vec3::ONE);
    }

    #[test]
    fn test_transposed_is_column_major() {
        let mut fb = Framebuffer::new(2, 3);
        fb.write(0, 1, Vec3(0.1, 0.2, 0.3));
        fb.write(1, 0, Vec3(0.4, 0.5, 0.6));
        let t = fb.transposed();
        assert_eq!(t.len(), 2 * 3 * 3);
        // (col 0, row 1)
        assert_eq!(&t[3..6], &[0.4, 0.5, 0.6]);
        // (col 1, row 0)
        assert_eq!(&t[6..9], &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_image_export_puts_row_zero_at_bottom() {
        let mut fb = Framebuffer::new(2, 2);
        fb.write(0, 0, Vec3::ZERO);
        let img = fb.to_image();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(0, 1).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_write_panics() {
        Framebuffer::new(2, 2).write(2, 0, Vec3::ZERO);
    }
}
