//! Error types for scene construction, camera setup, render passes and
//! scene-file loading.

use thiserror::Error;

/// Material or geometry problems found while building a [`crate::scene::Scene`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("sphere {id}: radius must be positive and finite, got {radius}")]
    InvalidRadius { id: usize, radius: f32 },

    #[error("sphere {id}: {name} must lie in [0, 1], got {value}")]
    CoefficientOutOfRange { id: usize, name: &'static str, value: f32 },

    /// Reflected plus refracted weight would leave a negative local weight.
    #[error("sphere {id}: reflectivity + refractivity = {sum} exceeds 1")]
    EnergyExceeded { id: usize, sum: f32 },

    #[error("sphere {id}: refraction index must be positive, got {value}")]
    InvalidRefractionIndex { id: usize, value: f32 },

    #[error("sphere {id}: specular exponent must be positive, got {value}")]
    InvalidSpecular { id: usize, value: f32 },

    #[error("sphere {id}: checkerboard stripe length must be positive, got {value}")]
    InvalidStripe { id: usize, value: f32 },
}

/// Camera parameters that cannot produce a usable set of primary rays.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("resolution must be non-zero, got {rows}x{cols}")]
    EmptyResolution { rows: usize, cols: usize },

    #[error("viewport height must be positive, got {0}")]
    InvalidViewport(f32),

    #[error("focal distance must be positive, got {0}")]
    InvalidFocalDistance(f32),

    /// Zero-length or non-finite primary ray, e.g. from non-finite Euler
    /// angles or a viewport so large its width overflows.
    #[error("primary ray for pixel ({row}, {col}) is zero-length or not finite")]
    DegenerateRay { row: usize, col: usize },
}

/// Invalid arguments to a render pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("progressive fraction must lie in (0, 1], got {0}")]
    InvalidFraction(f32),
}

/// Errors raised while reading a scene file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scene file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),

    #[error("invalid camera: {0}")]
    Camera(#[from] CameraError),

    #[error("invalid render settings: {0}")]
    InvalidRender(String),

    #[error("invalid lights: {0}")]
    InvalidLights(String),
}
