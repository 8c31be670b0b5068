use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3(pub f32, pub f32, pub f32);

impl Vec3 {
    pub const ZERO: Vec3 = Vec3(0.0, 0.0, 0.0);
    pub const ONE: Vec3 = Vec3(1.0, 1.0, 1.0);

    pub fn add(self, v: Self) -> Self { Self(self.0+v.0, self.1+v.1, self.2+v.2) }
    pub fn sub(self, v: Self) -> Self { Self(self.0-v.0, self.1-v.1, self.2-v.2) }
    pub fn scale(self, f: f32) -> Self { Self(self.0*f, self.1*f, self.2*f) }
    pub fn dot(self, v: Self) -> f32 { self.0*v.0 + self.1*v.1 + self.2*v.2 }
    pub fn norm(self) -> f32 { self.dot(self).sqrt() }
    pub fn normalize(self) -> Self { self.scale(1.0/self.norm()) }
    pub fn neg(self) -> Self { Self(-self.0,-self.1,-self.2) }

    pub fn map(self, f: impl Fn(f32) -> f32) -> Self { Self(f(self.0), f(self.1), f(self.2)) }

    /// Per-channel clamp into `[lo, hi]`.
    pub fn clamp(self, lo: f32, hi: f32) -> Self { self.map(|x| x.clamp(lo, hi)) }

    pub fn is_finite(self) -> bool {
        self.0.is_finite() && self.1.is_finite() && self.2.is_finite()
    }

    pub fn to_array(self) -> [f32; 3] { [self.0, self.1, self.2] }
}

impl From<[f32; 3]> for Vec3 {
    fn from(a: [f32; 3]) -> Self { Vec3(a[0], a[1], a[2]) }
}

/// Row-major 3×3 matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat3(pub [[f32; 3]; 3]);

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    /// Intrinsic yaw (ψ, about z) · pitch (θ, about y) · roll (φ, about x), radians.
    pub fn euler(yaw: f32, pitch: f32, roll: f32) -> Self {
        let (sy, cy) = yaw.sin_cos();
        let (sp, cp) = pitch.sin_cos();
        let (sr, cr) = roll.sin_cos();
        Mat3([
            [cy*cp, cy*sp*sr - sy*cr, cy*sp*cr + sy*sr],
            [sy*cp, sy*sp*sr + cy*cr, sy*sp*cr - cy*sr],
            [-sp,   cp*sr,            cp*cr],
        ])
    }

    /// `m · v` (column vector).
    pub fn apply(&self, v: Vec3) -> Vec3 {
        let m = &self.0;
        Vec3(
            m[0][0]*v.0 + m[0][1]*v.1 + m[0][2]*v.2,
            m[1][0]*v.0 + m[1][1]*v.1 + m[1][2]*v.2,
            m[2][0]*v.0 + m[2][1]*v.1 + m[2][2]*v.2,
        )
    }

    /// `vᵀ · m` (row vector), equivalently `mᵀ · v`.
    pub fn apply_row(&self, v: Vec3) -> Vec3 {
        let m = &self.0;
        Vec3(
            v.0*m[0][0] + v.1*m[1][0] + v.2*m[2][0],
            v.0*m[0][1] + v.1*m[1][1] + v.2*m[2][1],
            v.0*m[0][2] + v.1*m[1][2] + v.2*m[2][2],
        )
    }
}

/* Custom helper so Serde turns a JSON array into Vec3 */
pub fn vec3_from_array<'de, D>(d: D) -> Result<Vec3, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let arr = <[f32; 3]>::deserialize(d)?;
    Ok(arr.into())
}

pub fn option_vec3_from_array<'de, D>(d: D) -> Result<Option<Vec3>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let arr = Option::<[f32; 3]>::deserialize(d)?;
    Ok(arr.map(Vec3::from))
}
