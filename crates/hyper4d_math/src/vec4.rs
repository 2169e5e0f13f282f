//! 4D Vector type

use bytemuck::{Pod, Zeroable};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::MathError;

/// Lengths below this normalize to the zero vector
pub const NORMALIZE_EPSILON: f64 = 1e-10;

/// 4D Vector with x, y, z, w components
/// The w component is the 4th spatial axis, not a homogeneous coordinate.
///
/// Serializes as a plain `[x, y, z, w]` array.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Vec4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vec4 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0, z: 1.0, w: 1.0 };
    pub const X: Self = Self { x: 1.0, y: 0.0, z: 0.0, w: 0.0 };
    pub const Y: Self = Self { x: 0.0, y: 1.0, z: 0.0, w: 0.0 };
    pub const Z: Self = Self { x: 0.0, y: 0.0, z: 1.0, w: 0.0 };
    pub const W: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Create a new Vec4
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub const fn from_array(a: [f64; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    /// Build from a slice that must hold exactly four values
    pub fn from_slice(values: &[f64]) -> Result<Self, MathError> {
        match values {
            [x, y, z, w] => Ok(Self::new(*x, *y, *z, *w)),
            _ => Err(MathError::InvalidLength { expected: 4, actual: values.len() }),
        }
    }

    #[inline]
    pub const fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Single-precision copy for GPU upload
    #[inline]
    pub fn to_f32_array(self) -> [f32; 4] {
        [self.x as f32, self.y as f32, self.z as f32, self.w as f32]
    }

    /// Overwrite all four components
    #[inline]
    pub fn set(&mut self, x: f64, y: f64, z: f64, w: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self.w = w;
        self
    }

    // Random factories

    /// Random vector with components in [0, 1)
    pub fn random() -> Self {
        Self::random_with(&mut rand::thread_rng())
    }

    pub fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen(), rng.gen(), rng.gen(), rng.gen())
    }

    /// Random vector with components in [-1, 1)
    pub fn random_signed() -> Self {
        Self::random_signed_with(&mut rand::thread_rng())
    }

    pub fn random_signed_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        )
    }

    /// Random point uniformly distributed on the unit hypersphere S³
    pub fn random_unit() -> Self {
        Self::random_unit_with(&mut rand::thread_rng())
    }

    /// Normalizes four independent standard normals (Box–Muller).
    /// Normalizing a uniform cube sample instead would bias toward the corners.
    pub fn random_unit_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let (x, y) = gaussian_pair(rng);
            let (z, w) = gaussian_pair(rng);
            let v = Self::new(x, y, z, w);
            let len = v.length();
            if len >= NORMALIZE_EPSILON {
                return v / len;
            }
        }
    }

    // Queries

    /// Dot product
    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Length squared (faster than length)
    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Length (magnitude)
    #[inline]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn distance_to(self, other: Self) -> f64 {
        (self - other).length()
    }

    #[inline]
    pub fn distance_squared_to(self, other: Self) -> f64 {
        (self - other).length_squared()
    }

    /// True when the length is below `epsilon`
    #[inline]
    pub fn is_zero(self, epsilon: f64) -> bool {
        self.length_squared() < epsilon * epsilon
    }

    #[inline]
    pub fn is_normalized(self, epsilon: f64) -> bool {
        (self.length_squared() - 1.0).abs() < epsilon
    }

    /// Extract the xyz components as an array (for 3D rendering)
    #[inline]
    pub fn xyz(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    // Pure arithmetic

    /// Unit vector in the same direction.
    ///
    /// Returns `Vec4::ZERO` when the length is below [`NORMALIZE_EPSILON`],
    /// so degenerate input never produces NaN.
    #[inline]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len < NORMALIZE_EPSILON {
            Self::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    #[inline]
    pub fn scale(self, s: f64) -> Self {
        self * s
    }

    #[inline]
    pub fn negate(self) -> Self {
        -self
    }

    /// Component-wise multiplication (Hadamard product)
    #[inline]
    pub fn component_mul(self, other: Self) -> Self {
        Self::new(
            self.x * other.x,
            self.y * other.y,
            self.z * other.z,
            self.w * other.w,
        )
    }

    /// Linear interpolation toward `other`. `t` is not clamped.
    #[inline]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self * (1.0 - t) + other * t
    }

    /// Projection of `self` onto `other`; zero if `other` is zero
    pub fn project_onto(self, other: Self) -> Self {
        let d = other.length_squared();
        if d > 0.0 {
            other * (self.dot(other) / d)
        } else {
            Self::ZERO
        }
    }

    /// Reflect across the hyperplane with unit normal `normal`
    #[inline]
    pub fn reflect(self, normal: Self) -> Self {
        self - normal * (2.0 * self.dot(normal))
    }

    /// Clamp each component between corresponding min and max values
    #[inline]
    pub fn clamp_components(self, min: Self, max: Self) -> Self {
        self.max_components(min).min_components(max)
    }

    /// Component-wise minimum
    #[inline]
    pub fn min_components(self, other: Self) -> Self {
        Self::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
            self.w.min(other.w),
        )
    }

    /// Component-wise maximum
    #[inline]
    pub fn max_components(self, other: Self) -> Self {
        Self::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
            self.w.max(other.w),
        )
    }

    /// Component-wise absolute value
    #[inline]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs(), self.w.abs())
    }

    // In-place arithmetic. Each mutates the receiver and returns it for chaining.

    #[inline]
    pub fn add_in_place(&mut self, other: Self) -> &mut Self {
        *self += other;
        self
    }

    #[inline]
    pub fn sub_in_place(&mut self, other: Self) -> &mut Self {
        *self -= other;
        self
    }

    #[inline]
    pub fn scale_in_place(&mut self, s: f64) -> &mut Self {
        *self *= s;
        self
    }

    #[inline]
    pub fn component_mul_in_place(&mut self, other: Self) -> &mut Self {
        self.x *= other.x;
        self.y *= other.y;
        self.z *= other.z;
        self.w *= other.w;
        self
    }

    #[inline]
    pub fn negate_in_place(&mut self) -> &mut Self {
        self.x = -self.x;
        self.y = -self.y;
        self.z = -self.z;
        self.w = -self.w;
        self
    }

    /// Same zero-vector policy as [`Vec4::normalized`]
    #[inline]
    pub fn normalize_in_place(&mut self) -> &mut Self {
        *self = self.normalized();
        self
    }
}

/// Two independent standard normal samples
fn gaussian_pair<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    // (0, 1] keeps ln() finite
    let u1 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    let r = (-2.0 * u1.ln()).sqrt();
    let theta = TAU * u2;
    (r * theta.cos(), r * theta.sin())
}

impl From<[f64; 4]> for Vec4 {
    #[inline]
    fn from(a: [f64; 4]) -> Self {
        Self::from_array(a)
    }
}

impl From<Vec4> for [f64; 4] {
    #[inline]
    fn from(v: Vec4) -> Self {
        v.to_array()
    }
}

impl std::ops::Index<usize> for Vec4 {
    type Output = f64;
    #[inline]
    fn index(&self, i: usize) -> &f64 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Vec4 index out of range: {}", i),
        }
    }
}

impl std::ops::IndexMut<usize> for Vec4 {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("Vec4 index out of range: {}", i),
        }
    }
}

// Operator overloads

impl std::ops::Add for Vec4 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.w + other.w,
        )
    }
}

impl std::ops::AddAssign for Vec4 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
        self.w += other.w;
    }
}

impl std::ops::Sub for Vec4 {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
            self.w - other.w,
        )
    }
}

impl std::ops::SubAssign for Vec4 {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
        self.w -= other.w;
    }
}

impl std::ops::Mul<f64> for Vec4 {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Self::new(
            self.x * scalar,
            self.y * scalar,
            self.z * scalar,
            self.w * scalar,
        )
    }
}

impl std::ops::Mul<Vec4> for f64 {
    type Output = Vec4;
    #[inline]
    fn mul(self, v: Vec4) -> Vec4 {
        v * self
    }
}

impl std::ops::MulAssign<f64> for Vec4 {
    #[inline]
    fn mul_assign(&mut self, scalar: f64) {
        self.x *= scalar;
        self.y *= scalar;
        self.z *= scalar;
        self.w *= scalar;
    }
}

impl std::ops::Neg for Vec4 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl std::ops::Div<f64> for Vec4 {
    type Output = Self;
    #[inline]
    fn div(self, scalar: f64) -> Self {
        Self::new(
            self.x / scalar,
            self.y / scalar,
            self.z / scalar,
            self.w / scalar,
        )
    }
}

impl std::ops::DivAssign<f64> for Vec4 {
    #[inline]
    fn div_assign(&mut self, scalar: f64) {
        self.x /= scalar;
        self.y /= scalar;
        self.z /= scalar;
        self.w /= scalar;
    }
}
