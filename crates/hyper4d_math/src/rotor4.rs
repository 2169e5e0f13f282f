//! 4D Rotor for representing rotations in 4D space
//!
//! A rotor is an even element of the 4D geometric algebra with 8 components:
//! - 1 scalar
//! - 6 bivectors (one for each rotation plane)
//! - 1 pseudoscalar (e1234)
//!
//! A single-plane rotor has no pseudoscalar part. It shows up once rotations
//! in two orthogonal planes (XY and ZW, say) are composed.
//!
//! Rotors agree with the matrix path: `from_plane_angle(p, a).to_matrix()`
//! equals [`Mat4x4::rotation_in`]`(p, a)`, and `a * b` maps to
//! `a.to_matrix() * b.to_matrix()`, applying `b` first.

use bytemuck::{Pod, Zeroable};

use crate::{Mat4x4, RotationAngles, RotationPlane, Vec4};

/// Above this rotor dot product `slerp` switches to normalized lerp
pub const SLERP_NLERP_THRESHOLD: f64 = 0.9995;

/// 4D Rotor
///
/// R = s + b_xy*e12 + b_xz*e13 + b_yz*e23 + b_xw*e14 + b_yw*e24 + b_zw*e34 + p*e1234
///
/// Bivectors are stored in canonical plane order (XY, XZ, YZ, XW, YW, ZW).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Rotor4 {
    /// Scalar component
    pub s: f64,
    pub b_xy: f64,
    pub b_xz: f64,
    pub b_yz: f64,
    pub b_xw: f64,
    pub b_yw: f64,
    pub b_zw: f64,
    /// Pseudoscalar component
    pub p: f64,
}

impl Default for Rotor4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Rotor4 {
    /// Identity rotor (no rotation)
    pub const IDENTITY: Self = Self {
        s: 1.0,
        b_xy: 0.0,
        b_xz: 0.0,
        b_yz: 0.0,
        b_xw: 0.0,
        b_yw: 0.0,
        b_zw: 0.0,
        p: 0.0,
    };

    /// Components as `[s, xy, xz, yz, xw, yw, zw, p]`
    pub const fn from_array(a: [f64; 8]) -> Self {
        Self {
            s: a[0],
            b_xy: a[1],
            b_xz: a[2],
            b_yz: a[3],
            b_xw: a[4],
            b_yw: a[5],
            b_zw: a[6],
            p: a[7],
        }
    }

    pub const fn to_array(self) -> [f64; 8] {
        [self.s, self.b_xy, self.b_xz, self.b_yz, self.b_xw, self.b_yw, self.b_zw, self.p]
    }

    /// Rotation by `angle` radians in a single plane.
    ///
    /// R = cos(θ/2) - sin(θ/2) * B, where B is the plane's unit bivector.
    /// Positive angles turn the plane's first axis toward its second.
    pub fn from_plane_angle(plane: RotationPlane, angle: f64) -> Self {
        let (sin_h, cos_h) = (angle * 0.5).sin_cos();
        let mut r = Self::IDENTITY;
        r.s = cos_h;
        *r.bivector_mut(plane) = -sin_h;
        r
    }

    /// Compose the six plane rotors as XY * XZ * YZ * XW * YW * ZW.
    ///
    /// Same order and zero-angle skipping as [`Mat4x4::rotation_from_angles`].
    pub fn from_angles(angles: &RotationAngles) -> Self {
        let mut r = Self::IDENTITY;
        for (plane, angle) in angles.iter() {
            if angle != 0.0 {
                r *= Self::from_plane_angle(plane, angle);
            }
        }
        r
    }

    /// Bivector component for `plane`
    pub fn bivector(&self, plane: RotationPlane) -> f64 {
        match plane {
            RotationPlane::XY => self.b_xy,
            RotationPlane::XZ => self.b_xz,
            RotationPlane::YZ => self.b_yz,
            RotationPlane::XW => self.b_xw,
            RotationPlane::YW => self.b_yw,
            RotationPlane::ZW => self.b_zw,
        }
    }

    fn bivector_mut(&mut self, plane: RotationPlane) -> &mut f64 {
        match plane {
            RotationPlane::XY => &mut self.b_xy,
            RotationPlane::XZ => &mut self.b_xz,
            RotationPlane::YZ => &mut self.b_yz,
            RotationPlane::XW => &mut self.b_xw,
            RotationPlane::YW => &mut self.b_yw,
            RotationPlane::ZW => &mut self.b_zw,
        }
    }

    /// Component-wise dot product of two rotors
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    #[inline]
    pub fn magnitude_squared(&self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// True when the squared magnitude is within `epsilon` of 1
    pub fn is_normalized(&self, epsilon: f64) -> bool {
        (self.magnitude_squared() - 1.0).abs() < epsilon
    }

    /// Unit rotor in the same direction. A zero rotor becomes the identity.
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            self.scaled(1.0 / mag)
        } else {
            Self::IDENTITY
        }
    }

    /// Normalize in place. A zero rotor is left unchanged.
    pub fn normalize_in_place(&mut self) -> &mut Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            *self = self.scaled(1.0 / mag);
        }
        self
    }

    /// Reverse: negates the bivectors, keeps scalar and pseudoscalar.
    /// For unit rotors this is the inverse rotation.
    pub fn reverse(&self) -> Self {
        Self {
            s: self.s,
            b_xy: -self.b_xy,
            b_xz: -self.b_xz,
            b_yz: -self.b_yz,
            b_xw: -self.b_xw,
            b_yw: -self.b_yw,
            b_zw: -self.b_zw,
            p: self.p,
        }
    }

    /// Reverse divided by the squared magnitude. A zero rotor gives the identity.
    pub fn inverse(&self) -> Self {
        let mag_sq = self.magnitude_squared();
        if mag_sq > 0.0 {
            self.reverse().scaled(1.0 / mag_sq)
        } else {
            Self::IDENTITY
        }
    }

    fn scaled(&self, k: f64) -> Self {
        Self::from_array(self.to_array().map(|v| v * k))
    }

    /// `a * wa + b * wb`, component-wise
    fn blend(a: &Self, wa: f64, b: &Self, wb: f64) -> Self {
        let (a, b) = (a.to_array(), b.to_array());
        Self::from_array(std::array::from_fn(|i| a[i] * wa + b[i] * wb))
    }

    /// Compose two rotations: result = self * other
    /// The composed rotation applies `other` first, then `self`
    pub fn compose(&self, other: &Self) -> Self {
        // Geometric product restricted to the even subalgebra
        let a = self;
        let b = other;

        let s = a.s * b.s
            - a.b_xy * b.b_xy
            - a.b_xz * b.b_xz
            - a.b_yz * b.b_yz
            - a.b_xw * b.b_xw
            - a.b_yw * b.b_yw
            - a.b_zw * b.b_zw
            + a.p * b.p;

        let b_xy = a.s * b.b_xy + a.b_xy * b.s
            - a.b_xz * b.b_yz + a.b_yz * b.b_xz
            - a.b_xw * b.b_yw + a.b_yw * b.b_xw
            - a.b_zw * b.p - a.p * b.b_zw;

        let b_xz = a.s * b.b_xz + a.b_xz * b.s
            + a.b_xy * b.b_yz - a.b_yz * b.b_xy
            - a.b_xw * b.b_zw + a.b_zw * b.b_xw
            + a.b_yw * b.p + a.p * b.b_yw;

        let b_yz = a.s * b.b_yz + a.b_yz * b.s
            - a.b_xy * b.b_xz + a.b_xz * b.b_xy
            - a.b_yw * b.b_zw + a.b_zw * b.b_yw
            - a.b_xw * b.p - a.p * b.b_xw;

        let b_xw = a.s * b.b_xw + a.b_xw * b.s
            + a.b_xy * b.b_yw - a.b_yw * b.b_xy
            + a.b_xz * b.b_zw - a.b_zw * b.b_xz
            - a.b_yz * b.p - a.p * b.b_yz;

        let b_yw = a.s * b.b_yw + a.b_yw * b.s
            - a.b_xy * b.b_xw + a.b_xw * b.b_xy
            + a.b_yz * b.b_zw - a.b_zw * b.b_yz
            + a.b_xz * b.p + a.p * b.b_xz;

        let b_zw = a.s * b.b_zw + a.b_zw * b.s
            - a.b_xz * b.b_xw + a.b_xw * b.b_xz
            - a.b_yz * b.b_yw + a.b_yw * b.b_yz
            - a.b_xy * b.p - a.p * b.b_xy;

        let p = a.s * b.p + a.p * b.s
            + a.b_xy * b.b_zw + a.b_zw * b.b_xy
            - a.b_xz * b.b_yw - a.b_yw * b.b_xz
            + a.b_xw * b.b_yz + a.b_yz * b.b_xw;

        Self {
            s,
            b_xy,
            b_xz,
            b_yz,
            b_xw,
            b_yw,
            b_zw,
            p,
        }
    }

    /// Rotate a 4D vector using the sandwich product: v' = R * v * R†
    ///
    /// Expects a unit rotor; a rotor of magnitude m also scales by m².
    pub fn rotate(&self, v: Vec4) -> Vec4 {
        let s = self.s;
        let xy = self.b_xy;
        let xz = self.b_xz;
        let yz = self.b_yz;
        let xw = self.b_xw;
        let yw = self.b_yw;
        let zw = self.b_zw;
        let ps = self.p;

        let (x, y, z, w) = (v.x, v.y, v.z, v.w);

        let s2 = s * s;
        let xy2 = xy * xy;
        let xz2 = xz * xz;
        let yz2 = yz * yz;
        let xw2 = xw * xw;
        let yw2 = yw * yw;
        let zw2 = zw * zw;
        let ps2 = ps * ps;

        let new_x = x * (s2 - xy2 - xz2 - xw2 + yz2 + yw2 + zw2 - ps2)
            + 2.0 * y * (s * xy - xz * yz - xw * yw + zw * ps)
            + 2.0 * z * (s * xz + xy * yz - xw * zw - yw * ps)
            + 2.0 * w * (s * xw + xy * yw + xz * zw + yz * ps);

        let new_y = 2.0 * x * (-s * xy - xz * yz - xw * yw - zw * ps)
            + y * (s2 - xy2 + xz2 + xw2 - yz2 - yw2 + zw2 - ps2)
            + 2.0 * z * (s * yz - xy * xz + xw * ps - yw * zw)
            + 2.0 * w * (s * yw - xy * xw - xz * ps + yz * zw);

        let new_z = 2.0 * x * (-s * xz + xy * yz - xw * zw + yw * ps)
            + 2.0 * y * (-s * yz - xy * xz - xw * ps - yw * zw)
            + z * (s2 + xy2 - xz2 + xw2 - yz2 + yw2 - zw2 - ps2)
            + 2.0 * w * (s * zw + xy * ps - xz * xw - yz * yw);

        let new_w = 2.0 * x * (-s * xw + xy * yw + xz * zw - yz * ps)
            + 2.0 * y * (-s * yw - xy * xw + xz * ps + yz * zw)
            + 2.0 * z * (-s * zw - xy * ps - xz * xw - yz * yw)
            + w * (s2 + xy2 + xz2 - xw2 + yz2 - yw2 - zw2 - ps2);

        Vec4::new(new_x, new_y, new_z, new_w)
    }

    /// Normalized linear interpolation, unclamped in `t`
    pub fn nlerp(&self, other: &Self, t: f64) -> Self {
        Self::blend(self, 1.0 - t, other, t).normalized()
    }

    /// Spherical linear interpolation along the shorter arc.
    ///
    /// `R` and `-R` are the same rotation, so a negative dot product flips
    /// `other` first. Nearly parallel rotors fall back to [`Rotor4::nlerp`].
    pub fn slerp(&self, other: &Self, t: f64) -> Self {
        let mut d = self.dot(other);
        let mut end = *other;
        if d < 0.0 {
            d = -d;
            end = -end;
        }

        if d > SLERP_NLERP_THRESHOLD {
            return self.nlerp(&end, t);
        }

        let theta = d.acos();
        let sin_theta = theta.sin();
        let w0 = ((1.0 - t) * theta).sin() / sin_theta;
        let w1 = (t * theta).sin() / sin_theta;
        Self::blend(self, w0, &end, w1)
    }

    /// Convert rotor to a 4x4 rotation matrix
    ///
    /// The rotor is normalized first, so the result is always orthogonal.
    pub fn to_matrix(&self) -> Mat4x4 {
        let n = self.normalized();
        Mat4x4::from_columns(
            n.rotate(Vec4::X),
            n.rotate(Vec4::Y),
            n.rotate(Vec4::Z),
            n.rotate(Vec4::W),
        )
    }
}

impl std::ops::Mul for Rotor4 {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        self.compose(&other)
    }
}

impl std::ops::MulAssign for Rotor4 {
    fn mul_assign(&mut self, other: Self) {
        *self = self.compose(&other);
    }
}

impl std::ops::Neg for Rotor4 {
    type Output = Self;

    fn neg(self) -> Self {
        self.scaled(-1.0)
    }
}

impl From<Rotor4> for Mat4x4 {
    fn from(r: Rotor4) -> Self {
        r.to_matrix()
    }
}
