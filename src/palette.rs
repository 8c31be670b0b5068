//! Scalar → colour mapping used to tint spheres by radius when a scene file
//! gives no explicit colour.

use crate::algebra::Vec3;
use std::f32::consts::PI;

/// Rainbow colormap: violet at 0, red at 1. Input is clamped into `[0, 1]`.
pub fn rainbow(x: f32) -> Vec3 {
    let x = x.clamp(0.0, 1.0);
    Vec3(
        (2.0 * x - 0.5).abs().min(1.0),
        (PI * x).sin().max(0.0),
        (0.5 * PI * x).cos().max(0.0),
    )
}

/// One colour per radius, spreading the radius range over the colormap.
pub fn radius_colors(radii: &[f32]) -> Vec<Vec3> {
    let Some(min) = radii.iter().copied().reduce(f32::min) else {
        return Vec::new();
    };
    let max = radii.iter().copied().fold(min, f32::max);
    // widen the range slightly so neither end lands exactly on the extremes
    let span = max * 1.02 - min * 0.98;
    radii
        .iter()
        .map(|&r| if span > 0.0 { rainbow((r - min) / span) } else { rainbow(0.0) })
        .collect()
}
