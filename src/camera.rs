//! Pinhole camera with a cached table of per-pixel primary-ray directions.
//!
//! Pixel `(row, col)` maps to the viewport point
//! `u = (col − cols/2)/cols · width`, `v = (row − rows/2)/rows · height`
//! at depth `focal_distance`, so row 0 is the bottom edge of the view and
//! column 0 the left edge. Directions are unnormalised; a primary ray reaches
//! the viewport plane at `t = 1`.

use crate::{
    algebra::{Mat3, Vec3},
    error::CameraError,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    pub origin: Vec3,
    /// Radians.
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    pub viewport_height: f32,
    pub rows: usize,
    pub cols: usize,
    pub focal_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            origin: Vec3(-1.35, -0.29, 0.0),
            yaw: 0.0,
            pitch: -std::f32::consts::FRAC_PI_2,
            roll: 0.0,
            viewport_height: 0.5,
            rows: 1080,
            cols: 1920,
            focal_distance: 1.0,
        }
    }
}

impl CameraConfig {
    /// Width follows the pixel aspect ratio.
    pub fn viewport_width(&self) -> f32 {
        self.viewport_height * self.cols as f32 / self.rows as f32
    }
}

#[derive(Clone, Debug)]
pub struct Camera {
    config: CameraConfig,
    rotation: Mat3,
    directions: Vec<Vec3>,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Result<Self, CameraError> {
        let mut camera = Self { config, rotation: Mat3::IDENTITY, directions: Vec::new() };
        camera.rebuild()?;
        Ok(camera)
    }

    /// Replace every parameter and recompute the direction table.
    pub fn reconfigure(&mut self, config: CameraConfig) -> Result<(), CameraError> {
        if config == self.config && !self.directions.is_empty() {
            return Ok(());
        }
        let previous = std::mem::replace(&mut self.config, config);
        if let Err(e) = self.rebuild() {
            self.config = previous;
            self.rebuild()?;
            return Err(e);
        }
        Ok(())
    }

    fn rebuild(&mut self) -> Result<(), CameraError> {
        let c = &self.config;
        if c.rows == 0 || c.cols == 0 {
            return Err(CameraError::EmptyResolution { rows: c.rows, cols: c.cols });
        }
        if !(c.viewport_height > 0.0 && c.viewport_height.is_finite()) {
            return Err(CameraError::InvalidViewport(c.viewport_height));
        }
        if !(c.focal_distance > 0.0 && c.focal_distance.is_finite()) {
            return Err(CameraError::InvalidFocalDistance(c.focal_distance));
        }

        self.rotation = Mat3::euler(c.yaw, c.pitch, c.roll);
        let mut directions = Vec::with_capacity(c.rows * c.cols);
        for row in 0..c.rows {
            for col in 0..c.cols {
                let d = self.direction_at(row as f32, col as f32);
                if !(d.is_finite() && d.dot(d) > 0.0) {
                    return Err(CameraError::DegenerateRay { row, col });
                }
                directions.push(d);
            }
        }
        self.directions = directions;
        Ok(())
    }

    /// Direction through a fractional pixel position; used for jittered samples.
    pub fn direction_at(&self, row: f32, col: f32) -> Vec3 {
        let c = &self.config;
        let rows = c.rows as f32;
        let cols = c.cols as f32;
        let local = Vec3(
            (col - cols / 2.0) / cols * c.viewport_width(),
            (row - rows / 2.0) / rows * c.viewport_height,
            c.focal_distance,
        );
        self.rotation.apply_row(local)
    }

    /// Cached direction for pixel `(row, col)`.
    pub fn direction(&self, row: usize, col: usize) -> Vec3 {
        self.directions[row * self.config.cols + col]
    }

    pub fn origin(&self) -> Vec3 {
        self.config.origin
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn rows(&self) -> usize {
        self.config.rows
    }

    pub fn cols(&self) -> usize {
        self.config.cols
    }
}
