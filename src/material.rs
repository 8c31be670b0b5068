use crate::algebra::Vec3;

/// Surface colour source for a sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Texture {
    Solid,
    /// Alternating squares on the sphere's local x/z axes.
    Checkerboard { stripe: f32, even: Vec3, odd: Vec3 },
}

pub const CHECKER_STRIPE: f32 = 0.25;
pub const CHECKER_EVEN: Vec3 = Vec3(0.9, 0.9, 0.9);
pub const CHECKER_ODD: Vec3 = Vec3(0.25, 0.25, 0.3);

impl Texture {
    pub fn checkerboard() -> Self {
        Texture::Checkerboard { stripe: CHECKER_STRIPE, even: CHECKER_EVEN, odd: CHECKER_ODD }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Vec3,
    /// Phong exponent; `None` for matte surfaces.
    pub specular: Option<f32>,
    pub reflectivity: f32,
    pub refractivity: f32,
    pub refraction_index: f32,
    pub texture: Texture,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            specular: None,
            reflectivity: 0.0,
            refractivity: 0.0,
            refraction_index: 1.0,
            texture: Texture::Solid,
        }
    }
}

impl Material {
    pub fn matte(color: Vec3) -> Self {
        Self { color, ..Self::default() }
    }

    pub fn glossy(color: Vec3, exponent: f32, reflectivity: f32) -> Self {
        Self { color, specular: Some(exponent), reflectivity, ..Self::default() }
    }

    pub fn glass(color: Vec3, reflectivity: f32, refractivity: f32, refraction_index: f32) -> Self {
        Self {
            color,
            specular: Some(256.0),
            reflectivity,
            refractivity,
            refraction_index,
            texture: Texture::Solid,
        }
    }

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = texture;
        self
    }

    /// Weight left for local shading once reflection and refraction take their share.
    pub fn local_weight(&self) -> f32 {
        (1.0 - self.reflectivity - self.refractivity).max(0.0)
    }

    /// Colour at `local`, a hit point expressed relative to the sphere centre.
    pub fn color_at(&self, local: Vec3) -> Vec3 {
        match self.texture {
            Texture::Solid => self.color,
            Texture::Checkerboard { stripe, even, odd } => {
                let cell = (local.0 / stripe).floor() as i64 + (local.2 / stripe).floor() as i64;
                if cell.rem_euclid(2) == 0 { even } else { odd }
            }
        }
    }
}
