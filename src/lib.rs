//! Whitted-style ray tracer for scenes made of spheres.
//!
//! Primary rays come from a [`camera::Camera`], are intersected against a
//! [`scene::Scene`], shaded by a [`light::LightModel`] with hard shadows and
//! recursively extended through reflection and refraction by
//! [`renderer::Tracer`]. [`renderer::Renderer`] drives full, supersampled and
//! progressive passes into a [`framebuffer::Framebuffer`].

pub mod algebra;
pub mod camera;
pub mod config;
pub mod error;
pub mod framebuffer;
pub mod light;
pub mod material;
pub mod palette;
pub mod renderer;
pub mod scene;
pub mod sphere;
