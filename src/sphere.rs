//! Spheres and the analytic ray–sphere quadratic.

use crate::{algebra::Vec3, material::Material};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    /// Position in the owning scene, assigned by the scene builder.
    pub id: usize,
    pub center: Vec3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    /// Both roots of `|ro + t·rd − c|² = r²` as `(t1, t2)` with `t1 = (−b+√Δ)/2a`,
    /// or `None` when the discriminant is negative. `rd` need not be unit length.
    pub fn roots(&self, ro: Vec3, rd: Vec3) -> Option<(f32, f32)> {
        let oc   = ro.sub(self.center);
        let a    = rd.dot(rd);
        let b    = 2.0 * oc.dot(rd);
        let c    = oc.dot(oc) - self.radius * self.radius;
        let disc = b*b - 4.0*a*c;
        if disc < 0.0 { return None; }

        let sq = disc.sqrt();
        Some(((-b + sq) / (2.0 * a), (-b - sq) / (2.0 * a)))
    }

    /// Smallest root strictly inside `(t_min, t_max)`.
    pub fn hit(&self, ro: Vec3, rd: Vec3, t_min: f32, t_max: f32) -> Option<f32> {
        let (t1, t2) = self.roots(ro, rd)?;
        let inside = |t: f32| t_min < t && t < t_max;
        match (inside(t1), inside(t2)) {
            (true, true) => Some(t1.min(t2)),
            (true, false) => Some(t1),
            (false, true) => Some(t2),
            (false, false) => None,
        }
    }

    /// True when either root falls strictly inside `(t_min, t_max)`.
    pub fn occludes(&self, ro: Vec3, rd: Vec3, t_min: f32, t_max: f32) -> bool {
        self.hit(ro, rd, t_min, t_max).is_some()
    }

    /// Outward unit normal at a surface point.
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        point.sub(self.center).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_at(center: Vec3) -> Sphere {
        Sphere { id: 0, center, radius: 1.0, material: Material::default() }
    }

    #[test]
    fn test_ray_sphere_through_center() {
        let s = unit_at(Vec3(0.0, 0.0, 3.0));
        let t = s.hit(Vec3::ZERO, Vec3(0.0, 0.0, 1.0), 0.0, f32::INFINITY).unwrap();
        assert_abs_diff_eq!(t, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_unnormalized_direction_scales_t() {
        let s = unit_at(Vec3(0.0, 0.0, 3.0));
        let t = s.hit(Vec3::ZERO, Vec3(0.0, 0.0, 2.0), 0.0, f32::INFINITY).unwrap();
        assert_abs_diff_eq!(t, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_ray_sphere_miss() {
        let s = unit_at(Vec3(0.0, 5.0, 3.0));
        assert!(s.roots(Vec3::ZERO, Vec3(0.0, 0.0, 1.0)).is_none());
        assert!(s.hit(Vec3::ZERO, Vec3(0.0, 0.0, 1.0), 0.0, f32::INFINITY).is_none());
    }

    #[test]
    fn test_ray_from_inside_takes_exit_root() {
        let s = unit_at(Vec3::ZERO);
        let t = s.hit(Vec3::ZERO, Vec3(1.0, 0.0, 0.0), 1e-3, f32::INFINITY).unwrap();
        assert_abs_diff_eq!(t, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_interval_is_open() {
        let s = unit_at(Vec3(0.0, 0.0, 3.0));
        // near root at exactly t_max is excluded, far root is out of range
        assert!(s.hit(Vec3::ZERO, Vec3(0.0, 0.0, 1.0), 0.0, 2.0).is_none());
        // near root excluded by t_min, far root remains
        let t = s.hit(Vec3::ZERO, Vec3(0.0, 0.0, 1.0), 2.5, f32::INFINITY).unwrap();
        assert_abs_diff_eq!(t, 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normal_points_outward() {
        let s = unit_at(Vec3(0.0, 0.0, 3.0));
        let n = s.normal_at(Vec3(0.0, 0.0, 2.0));
        assert_abs_diff_eq!(n.2, -1.0, epsilon = 1e-6);
    }
}
