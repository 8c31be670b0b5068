//! JSON scene file: camera, render settings, lights and sphere list.
//!
//! Every section is optional. A missing `spheres` list selects the built-in
//! scene. Angles are in degrees; vectors are 3-element arrays.

use crate::{
    algebra::{option_vec3_from_array, vec3_from_array, Vec3},
    camera::{Camera, CameraConfig},
    error::ConfigError,
    light::{LightModel, DEFAULT_LIGHT_DIRECTION},
    material::{Material, Texture, CHECKER_EVEN, CHECKER_ODD, CHECKER_STRIPE},
    palette,
    renderer::RenderSettings,
    scene::{Scene, SphereRecord},
};
use log::{info, warn};
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
#[serde(default)]
pub struct CameraJson {
    #[serde(deserialize_with = "vec3_from_array")]
    pub origin: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    pub viewport_height: f32,
    /// `[rows, cols]`
    pub resolution: [usize; 2],
    pub focal_distance: f32,
}

impl Default for CameraJson {
    fn default() -> Self {
        let c = CameraConfig::default();
        Self {
            origin: c.origin,
            yaw: c.yaw.to_degrees(),
            pitch: c.pitch.to_degrees(),
            roll: c.roll.to_degrees(),
            viewport_height: c.viewport_height,
            resolution: [c.rows, c.cols],
            focal_distance: c.focal_distance,
        }
    }
}

impl CameraJson {
    fn to_config(&self) -> CameraConfig {
        CameraConfig {
            origin: self.origin,
            yaw: self.yaw.to_radians(),
            pitch: self.pitch.to_radians(),
            roll: self.roll.to_radians(),
            viewport_height: self.viewport_height,
            rows: self.resolution[0],
            cols: self.resolution[1],
            focal_distance: self.focal_distance,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct RenderJson {
    pub samples: u32,
    pub depth: u32,
    pub near: f32,
    pub seed: u64,
    /// Fraction of remaining pixels resolved per progressive pass.
    pub progressive: Option<f32>,
}

impl Default for RenderJson {
    fn default() -> Self {
        let r = RenderSettings::default();
        Self { samples: r.samples, depth: r.depth, near: r.near, seed: r.seed, progressive: None }
    }
}

impl RenderJson {
    fn to_settings(&self) -> Result<RenderSettings, ConfigError> {
        if self.samples == 0 {
            return Err(ConfigError::InvalidRender("samples must be at least 1".into()));
        }
        if !(self.near >= 0.0 && self.near.is_finite()) {
            return Err(ConfigError::InvalidRender(format!("near must be non-negative, got {}", self.near)));
        }
        if let Some(f) = self.progressive {
            if !(f > 0.0 && f <= 1.0) {
                return Err(ConfigError::InvalidRender(format!(
                    "progressive fraction must lie in (0, 1], got {f}"
                )));
            }
        }
        Ok(RenderSettings { samples: self.samples, depth: self.depth, near: self.near, seed: self.seed })
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct DirectionalJson {
    /// Points toward the light; normalised on load.
    #[serde(deserialize_with = "vec3_from_array")]
    pub direction: Vec3,
    pub intensity: f32,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct PointJson {
    #[serde(deserialize_with = "vec3_from_array")]
    pub position: Vec3,
    pub intensity: f32,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct LightsJson {
    pub ambient: f32,
    pub directional: DirectionalJson,
    pub point: PointJson,
}

impl Default for DirectionalJson {
    fn default() -> Self {
        Self { direction: DEFAULT_LIGHT_DIRECTION, intensity: LightModel::default().directional }
    }
}

impl Default for PointJson {
    fn default() -> Self {
        let l = LightModel::default();
        Self { position: l.position, intensity: l.point }
    }
}

impl Default for LightsJson {
    fn default() -> Self {
        Self {
            ambient: LightModel::default().ambient,
            directional: DirectionalJson::default(),
            point: PointJson::default(),
        }
    }
}

impl LightsJson {
    fn to_model(&self) -> Result<LightModel, ConfigError> {
        let d = self.directional.direction;
        if !(d.is_finite() && d.norm() > 0.0) {
            return Err(ConfigError::InvalidLights(format!("directional light direction {d:?} has no length")));
        }
        Ok(LightModel {
            ambient: self.ambient,
            direction: d.normalize(),
            directional: self.directional.intensity,
            position: self.point.position,
            point: self.point.intensity,
        })
    }
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextureJson {
    Solid,
    Checkerboard {
        #[serde(default)]
        stripe: Option<f32>,
        #[serde(default, deserialize_with = "option_vec3_from_array")]
        even: Option<Vec3>,
        #[serde(default, deserialize_with = "option_vec3_from_array")]
        odd: Option<Vec3>,
    },
}

impl TextureJson {
    fn to_texture(&self) -> Texture {
        match self {
            TextureJson::Solid => Texture::Solid,
            TextureJson::Checkerboard { stripe, even, odd } => Texture::Checkerboard {
                stripe: stripe.unwrap_or(CHECKER_STRIPE),
                even: even.unwrap_or(CHECKER_EVEN),
                odd: odd.unwrap_or(CHECKER_ODD),
            },
        }
    }
}

fn default_refraction_index() -> f32 { 1.0 }

#[derive(Deserialize)]
pub struct SphereJson {
    pub radius: f32,
    #[serde(deserialize_with = "vec3_from_array")]
    pub position: Vec3,
    /// Missing colour falls back to the radius palette.
    #[serde(default, deserialize_with = "option_vec3_from_array")]
    pub color: Option<Vec3>,
    #[serde(default)]
    pub texture: Option<TextureJson>,
    /// Phong exponent; absent or null means matte.
    #[serde(default)]
    pub specular: Option<f32>,
    #[serde(default)]
    pub reflectivity: f32,
    #[serde(default)]
    pub refractivity: f32,
    #[serde(default = "default_refraction_index")]
    pub refraction_index: f32,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct SceneFile {
    pub camera: CameraJson,
    pub render: RenderJson,
    pub lights: LightsJson,
    pub spheres: Option<Vec<SphereJson>>,
}

/// Where the sphere list of a [`Setup`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    File,
    Default,
}

/// Everything a render needs, resolved from a scene file or the defaults.
pub struct Setup {
    pub scene: Scene,
    pub lights: LightModel,
    pub camera: Camera,
    pub render: RenderSettings,
    pub progressive: Option<f32>,
    pub source: Source,
}

impl Setup {
    /// Built-in scene with default camera, lights and render settings.
    pub fn builtin() -> Result<Self, ConfigError> {
        build(SceneFile::default(), false)
    }
}

fn build_scene(spheres: &[SphereJson]) -> Result<Scene, ConfigError> {
    let radii: Vec<f32> = spheres.iter().map(|s| s.radius).collect();
    let palette = palette::radius_colors(&radii);

    let records = spheres.iter().zip(palette).map(|(s, fallback)| {
        let material = Material {
            color: s.color.unwrap_or(fallback),
            specular: s.specular,
            reflectivity: s.reflectivity,
            refractivity: s.refractivity,
            refraction_index: s.refraction_index,
            texture: s.texture.as_ref().map_or(Texture::Solid, TextureJson::to_texture),
        };
        SphereRecord::new(s.radius, s.position, material)
    });
    Ok(Scene::new(records)?)
}

fn build(file: SceneFile, lenient: bool) -> Result<Setup, ConfigError> {
    let camera = Camera::new(file.camera.to_config())?;
    let render = file.render.to_settings()?;
    let lights = file.lights.to_model()?;

    let (scene, source) = match &file.spheres {
        None => (Scene::default_scene(), Source::Default),
        Some(list) => match build_scene(list) {
            Ok(scene) => (scene, Source::File),
            Err(e) if lenient => {
                warn!("{e}; using the built-in scene");
                (Scene::default_scene(), Source::Default)
            }
            Err(e) => return Err(e),
        },
    };

    Ok(Setup { scene, lights, camera, render, progressive: file.render.progressive, source })
}

pub fn parse(json: &str) -> Result<Setup, ConfigError> {
    let file: SceneFile = serde_json::from_str(json)?;
    build(file, false)
}

/// Strict load: any problem with the file is an error.
pub fn load(path: impl AsRef<Path>) -> Result<Setup, ConfigError> {
    let data = std::fs::read_to_string(path)?;
    parse(&data)
}

/// Lenient load. An unreadable or malformed file, or an invalid sphere list,
/// degrades to the built-in scene with a warning. Camera, light and render
/// errors in a readable file are still returned.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<Setup, ConfigError> {
    let path = path.as_ref();
    let file = std::fs::read_to_string(path)
        .map_err(ConfigError::from)
        .and_then(|data| Ok(serde_json::from_str::<SceneFile>(&data)?));

    match file {
        Ok(file) => {
            let setup = build(file, true)?;
            info!("loaded {} ({} spheres)", path.display(), setup.scene.len());
            Ok(setup)
        }
        Err(e) => {
            warn!("{}: {e}; using the built-in scene", path.display());
            Setup::builtin()
        }
    }
}
