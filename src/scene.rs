use crate::{
    algebra::Vec3,
    error::SceneError,
    material::{Material, Texture},
    palette,
    sphere::Sphere,
};

/// Input record for one sphere; the scene assigns ids in list order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereRecord {
    pub radius: f32,
    pub position: Vec3,
    pub material: Material,
}

impl SphereRecord {
    pub fn new(radius: f32, position: Vec3, material: Material) -> Self {
        Self { radius, position, material }
    }
}

/// Nearest intersection along a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub t: f32,
    pub sphere: usize,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Immutable, validated collection of spheres.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    spheres: Vec<Sphere>,
}

impl Scene {
    /// Validates every record and assigns sequential ids.
    pub fn new(records: impl IntoIterator<Item = SphereRecord>) -> Result<Self, SceneError> {
        let records: Vec<_> = records.into_iter().collect();
        for (id, r) in records.iter().enumerate() {
            validate(id, r)?;
        }
        Ok(Self { spheres: assign_ids(records) })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in scene: two glossy spheres, a glass bead in front of them and a
    /// large checkerboard sphere underneath acting as the ground. Base colours
    /// come from the radius palette.
    pub fn default_scene() -> Self {
        let mut records = [
            SphereRecord::new(0.28, Vec3(1.5, -0.3, -0.3), Material::glossy(Vec3::ONE, 16.0, 0.4)),
            SphereRecord::new(0.26, Vec3(1.5, -0.3, 0.3), Material::glossy(Vec3::ONE, 64.0, 0.4)),
            SphereRecord::new(0.12, Vec3(1.05, -0.46, 0.0), Material::glass(Vec3::ONE, 0.1, 0.8, 1.5)),
            SphereRecord::new(
                1000.0,
                Vec3(1.5, -1000.58, 0.0),
                Material::glossy(Vec3::ONE, 32.0, 0.2).with_texture(Texture::checkerboard()),
            ),
        ];
        let radii = records.map(|r| r.radius);
        for (record, color) in records.iter_mut().zip(palette::radius_colors(&radii)) {
            record.material.color = color;
        }
        Self { spheres: assign_ids(records) }
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// Globally nearest root over all spheres inside `(t_min, t_max)`.
    pub fn intersect_nearest(&self, ro: Vec3, rd: Vec3, t_min: f32, t_max: f32) -> Option<Hit> {
        let (sphere, t) = self
            .spheres
            .iter()
            .filter_map(|s| s.hit(ro, rd, t_min, t_max).map(|t| (s, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        let point = ro.add(rd.scale(t));
        Some(Hit { t, sphere: sphere.id, point, normal: sphere.normal_at(point) })
    }

    /// True if any sphere has a root inside `(t_min, t_max)` along the ray.
    pub fn any_hit(&self, ro: Vec3, rd: Vec3, t_min: f32, t_max: f32) -> bool {
        self.spheres.iter().any(|s| s.occludes(ro, rd, t_min, t_max))
    }

    /// Base or procedural colour of sphere `index` at world-space `point`.
    pub fn surface_color(&self, index: usize, point: Vec3) -> Vec3 {
        let s = &self.spheres[index];
        s.material.color_at(point.sub(s.center))
    }
}

fn assign_ids(records: impl IntoIterator<Item = SphereRecord>) -> Vec<Sphere> {
    records
        .into_iter()
        .enumerate()
        .map(|(id, r)| Sphere { id, center: r.position, radius: r.radius, material: r.material })
        .collect()
}

fn validate(id: usize, r: &SphereRecord) -> Result<(), SceneError> {
    if !(r.radius.is_finite() && r.radius > 0.0) {
        return Err(SceneError::InvalidRadius { id, radius: r.radius });
    }
    let m = &r.material;
    for (name, value) in [("reflectivity", m.reflectivity), ("refractivity", m.refractivity)] {
        if !(0.0..=1.0).contains(&value) {
            return Err(SceneError::CoefficientOutOfRange { id, name, value });
        }
    }
    let sum = m.reflectivity + m.refractivity;
    if sum > 1.0 {
        return Err(SceneError::EnergyExceeded { id, sum });
    }
    if !(m.refraction_index > 0.0) {
        return Err(SceneError::InvalidRefractionIndex { id, value: m.refraction_index });
    }
    if let Some(exp) = m.specular {
        if !(exp > 0.0) {
            return Err(SceneError::InvalidSpecular { id, value: exp });
        }
    }
    if let Texture::Checkerboard { stripe, .. } = m.texture {
        if !(stripe > 0.0) {
            return Err(SceneError::InvalidStripe { id, value: stripe });
        }
    }
    Ok(())
}
