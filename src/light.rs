use crate::{algebra::Vec3, camera::Camera, scene::Scene};

/// Lower bound on shadow-ray roots, keeps a surface from shadowing itself.
pub const SHADOW_EPSILON: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadowMode {
    /// Ray toward the directional light, roots in `(ε, ∞)`.
    Directional,
    /// Ray `light − point` (unnormalised), roots in `(ε, 1)`; `t = 1` is the light itself.
    Point,
}

/// Scalar shading at a surface point. [`LightModel`] is the production
/// implementation; the tracer is generic over it.
pub trait Illumination: Sync {
    fn compute_intensity(&self, scene: &Scene, sphere: usize, point: Vec3, camera: &Camera) -> f32;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightModel {
    pub ambient: f32,
    /// Unit vector pointing from the scene toward the light.
    pub direction: Vec3,
    pub directional: f32,
    pub position: Vec3,
    pub point: f32,
}

/// Unnormalised direction toward the default directional light.
pub const DEFAULT_LIGHT_DIRECTION: Vec3 = Vec3(-1.0, 0.5, 0.5);

impl Default for LightModel {
    fn default() -> Self {
        Self {
            ambient: 0.42,
            direction: DEFAULT_LIGHT_DIRECTION.normalize(),
            directional: 0.36,
            position: Vec3(-2.0, 3.0, 2.0),
            point: 0.38,
        }
    }
}

impl LightModel {
    /// Ambient term only; directional and point lights switched off.
    pub fn ambient_only(ambient: f32) -> Self {
        Self { ambient, directional: 0.0, point: 0.0, ..Self::default() }
    }

    /// 0 if any sphere blocks the light from `point`, 1 otherwise.
    pub fn check_shadow(&self, point: Vec3, scene: &Scene, mode: ShadowMode) -> f32 {
        let (rd, t_max) = match mode {
            ShadowMode::Directional => (self.direction, f32::INFINITY),
            ShadowMode::Point => (self.position.sub(point), 1.0),
        };
        if scene.any_hit(point, rd, SHADOW_EPSILON, t_max) { 0.0 } else { 1.0 }
    }

    /// Unit direction toward the light and its intensity.
    fn light(&self, mode: ShadowMode, point: Vec3) -> (Vec3, f32) {
        match mode {
            ShadowMode::Directional => (self.direction.normalize(), self.directional),
            ShadowMode::Point => (self.position.sub(point).normalize(), self.point),
        }
    }

    fn diffuse(&self, scene: &Scene, normal: Vec3, point: Vec3, mode: ShadowMode) -> f32 {
        let (l, intensity) = self.light(mode, point);
        let n_dot_l = normal.dot(l);
        if intensity == 0.0 || n_dot_l < 0.0 {
            return 0.0;
        }
        n_dot_l * intensity * self.check_shadow(point, scene, mode)
    }

    fn specular(
        &self,
        scene: &Scene,
        normal: Vec3,
        view: Vec3,
        point: Vec3,
        exponent: f32,
        mode: ShadowMode,
    ) -> f32 {
        let (l, intensity) = self.light(mode, point);
        if intensity == 0.0 {
            return 0.0;
        }
        let r = normal.scale(2.0 * l.dot(normal)).sub(l);
        let r_dot_v = r.dot(view);
        if r_dot_v <= 0.0 {
            return 0.0;
        }
        intensity * r_dot_v.powf(exponent) * self.check_shadow(point, scene, mode)
    }
}

impl Illumination for LightModel {
    /// `ambient + diffuse_dir + diffuse_point + specular_dir + specular_point`,
    /// with each light term gated by its own shadow test.
    fn compute_intensity(&self, scene: &Scene, sphere: usize, point: Vec3, camera: &Camera) -> f32 {
        let s = &scene.spheres()[sphere];
        let normal = s.normal_at(point);

        let mut intensity = self.ambient;
        intensity += self.diffuse(scene, normal, point, ShadowMode::Directional);
        intensity += self.diffuse(scene, normal, point, ShadowMode::Point);

        if let Some(exp) = s.material.specular {
            let view = camera.origin().sub(point).normalize();
            intensity += self.specular(scene, normal, view, point, exp, ShadowMode::Directional);
            intensity += self.specular(scene, normal, view, point, exp, ShadowMode::Point);
        }
        intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        camera::CameraConfig,
        material::Material,
        scene::SphereRecord,
    };
    use approx::assert_abs_diff_eq;

    fn camera() -> Camera {
        Camera::new(CameraConfig {
            origin: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            viewport_height: 1.0,
            rows: 2,
            cols: 2,
            focal_distance: 1.0,
        })
        .unwrap()
    }

    fn matte_at(radius: f32, position: Vec3) -> SphereRecord {
        SphereRecord::new(radius, position, Material::matte(Vec3::ONE))
    }

    #[test]
    fn test_ambient_only() {
        let scene = Scene::new([matte_at(1.0, Vec3(0.0, 0.0, 3.0))]).unwrap();
        let lights = LightModel::ambient_only(0.7);
        let i = lights.compute_intensity(&scene, 0, Vec3(0.0, 0.0, 2.0), &camera());
        assert_abs_diff_eq!(i, 0.7);
    }

    #[test]
    fn test_directional_diffuse_facing_light() {
        let scene = Scene::new([matte_at(1.0, Vec3(0.0, 0.0, 3.0))]).unwrap();
        let lights = LightModel {
            ambient: 0.0,
            direction: Vec3(0.0, 0.0, -1.0),
            directional: 0.5,
            position: Vec3::ZERO,
            point: 0.0,
        };
        let i = lights.compute_intensity(&scene, 0, Vec3(0.0, 0.0, 2.0), &camera());
        assert_abs_diff_eq!(i, 0.5, epsilon = 1e-6);
        // back side faces away
        let i = lights.compute_intensity(&scene, 0, Vec3(0.0, 0.0, 4.0), &camera());
        assert_abs_diff_eq!(i, 0.0);
    }

    #[test]
    fn test_occluder_blocks_directional_light() {
        let scene = Scene::new([matte_at(1.0, Vec3::ZERO), matte_at(0.5, Vec3(0.0, 3.0, 0.0))]).unwrap();
        let lights = LightModel { direction: Vec3(0.0, 1.0, 0.0), ..LightModel::default() };
        let top = Vec3(0.0, 1.0, 0.0);
        assert_eq!(lights.check_shadow(top, &scene, ShadowMode::Directional), 0.0);
        let side = Vec3(1.0, 0.0, 0.0);
        assert_eq!(lights.check_shadow(side, &scene, ShadowMode::Directional), 1.0);
    }

    #[test]
    fn test_point_shadow_ignores_spheres_behind_light() {
        // occluder sits beyond the light along the shadow ray
        let scene = Scene::new([matte_at(1.0, Vec3::ZERO), matte_at(0.5, Vec3(0.0, 5.0, 0.0))]).unwrap();
        let lights = LightModel { position: Vec3(0.0, 3.0, 0.0), ..LightModel::default() };
        let top = Vec3(0.0, 1.0, 0.0);
        assert_eq!(lights.check_shadow(top, &scene, ShadowMode::Point), 1.0);

        let lights = LightModel { position: Vec3(0.0, 7.0, 0.0), ..LightModel::default() };
        assert_eq!(lights.check_shadow(top, &scene, ShadowMode::Point), 0.0);
    }

    #[test]
    fn test_shadow_is_stable_inside_umbra() {
        let scene = Scene::new([matte_at(1.0, Vec3::ZERO), matte_at(0.5, Vec3(0.0, 3.0, 0.0))]).unwrap();
        let lights = LightModel { direction: Vec3(0.0, 1.0, 0.0), ..LightModel::default() };
        for k in -5..=5 {
            let dx = k as f32 * 0.02;
            let p = Vec3(dx, (1.0 - dx * dx).sqrt(), 0.0);
            assert_eq!(lights.check_shadow(p, &scene, ShadowMode::Directional), 0.0, "dx = {dx}");
        }
    }

    #[test]
    fn test_matte_has_no_specular() {
        let scene = Scene::new([matte_at(1.0, Vec3(0.0, 0.0, 3.0))]).unwrap();
        let lights = LightModel {
            ambient: 0.0,
            direction: Vec3(0.0, 0.0, -1.0),
            directional: 1.0,
            position: Vec3::ZERO,
            point: 0.0,
        };
        // light, normal and view all aligned: a glossy surface would add the full highlight
        let i = lights.compute_intensity(&scene, 0, Vec3(0.0, 0.0, 2.0), &camera());
        assert_abs_diff_eq!(i, 1.0, epsilon = 1e-6);

        let glossy = Scene::new([SphereRecord::new(
            1.0,
            Vec3(0.0, 0.0, 3.0),
            Material::glossy(Vec3::ONE, 8.0, 0.0),
        )])
        .unwrap();
        let i = lights.compute_intensity(&glossy, 0, Vec3(0.0, 0.0, 2.0), &camera());
        assert_abs_diff_eq!(i, 2.0, epsilon = 1e-5);
    }
}
