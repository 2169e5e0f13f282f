//! 4x4 Matrix for 4D linear transforms
//!
//! Storage is column-major: `element(row, col)` lives at `col * 4 + row`,
//! which matches what a GPU uniform expects.
//!
//! Every operation has a pure form returning a new matrix. The hot-loop
//! forms (`multiply_in_place`, `transpose_in_place`, `rotate_xy` and the
//! other per-plane rotations) overwrite the receiver, so the previous state
//! is gone once they return.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::{MathError, RotationAngles, RotationPlane, Vec4};

/// Determinants smaller than this make a matrix singular
pub const SINGULAR_EPSILON: f64 = 1e-10;

/// 4x4 matrix (column-major)
///
/// Serializes as a plain array of 16 numbers in storage order.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[f64; 16]", into = "[f64; 16]")]
pub struct Mat4x4 {
    data: [f64; 16],
}

impl Default for Mat4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4x4 {
    pub const IDENTITY: Self = Self {
        data: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub const ZERO: Self = Self { data: [0.0; 16] };

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// All-zero matrix. Only useful as a write target; it is not a transform.
    #[inline]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Wrap 16 values already in column-major order
    #[inline]
    pub const fn from_cols_array(data: [f64; 16]) -> Self {
        Self { data }
    }

    /// Build from a slice of exactly 16 column-major values
    pub fn from_slice(values: &[f64]) -> Result<Self, MathError> {
        let data: [f64; 16] = values
            .try_into()
            .map_err(|_| MathError::InvalidLength { expected: 16, actual: values.len() })?;
        Ok(Self { data })
    }

    pub fn from_columns(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        let mut m = Self::ZERO;
        m.set_column(0, c0);
        m.set_column(1, c1);
        m.set_column(2, c2);
        m.set_column(3, c3);
        m
    }

    /// Diagonal scale matrix
    pub fn scale(sx: f64, sy: f64, sz: f64, sw: f64) -> Self {
        let mut m = Self::ZERO;
        m.set(0, 0, sx);
        m.set(1, 1, sy);
        m.set(2, 2, sz);
        m.set(3, 3, sw);
        m
    }

    pub fn uniform_scale(s: f64) -> Self {
        Self::scale(s, s, s, s)
    }

    // Element access

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[col * 4 + row]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[col * 4 + row] = value;
    }

    #[inline]
    pub fn column(&self, col: usize) -> Vec4 {
        let b = col * 4;
        Vec4::new(self.data[b], self.data[b + 1], self.data[b + 2], self.data[b + 3])
    }

    #[inline]
    pub fn set_column(&mut self, col: usize, v: Vec4) {
        let b = col * 4;
        self.data[b..b + 4].copy_from_slice(&v.to_array());
    }

    #[inline]
    pub fn row(&self, row: usize) -> Vec4 {
        Vec4::new(self.get(row, 0), self.get(row, 1), self.get(row, 2), self.get(row, 3))
    }

    pub fn set_row(&mut self, row: usize, v: Vec4) {
        for col in 0..4 {
            self.set(row, col, v[col]);
        }
    }

    /// The 16 values in column-major order
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn to_cols_array(&self) -> [f64; 16] {
        self.data
    }

    /// Single-precision copy for GPU upload
    pub fn to_f32_array(&self) -> [f32; 16] {
        self.data.map(|v| v as f32)
    }

    // Rotations

    /// Rotation by `angle` radians in a single plane.
    ///
    /// The identity with the block `[[cos, -sin], [sin, cos]]` written at the
    /// plane's two axes; every other axis is left alone.
    pub fn rotation_in(plane: RotationPlane, angle: f64) -> Self {
        let (a, b) = plane.axes();
        let (s, c) = angle.sin_cos();

        let mut m = Self::IDENTITY;
        m.set(a, a, c);
        m.set(a, b, -s);
        m.set(b, a, s);
        m.set(b, b, c);
        m
    }

    /// Rotation in the XY plane (around Z in 3D)
    pub fn rotation_xy(angle: f64) -> Self {
        Self::rotation_in(RotationPlane::XY, angle)
    }

    /// Rotation in the XZ plane (around Y in 3D)
    pub fn rotation_xz(angle: f64) -> Self {
        Self::rotation_in(RotationPlane::XZ, angle)
    }

    /// Rotation in the YZ plane (around X in 3D)
    pub fn rotation_yz(angle: f64) -> Self {
        Self::rotation_in(RotationPlane::YZ, angle)
    }

    pub fn rotation_xw(angle: f64) -> Self {
        Self::rotation_in(RotationPlane::XW, angle)
    }

    pub fn rotation_yw(angle: f64) -> Self {
        Self::rotation_in(RotationPlane::YW, angle)
    }

    pub fn rotation_zw(angle: f64) -> Self {
        Self::rotation_in(RotationPlane::ZW, angle)
    }

    /// Rotation in the plane named `plane` ("XY", "XZ", "YZ", "XW", "YW", "ZW").
    ///
    /// # Errors
    /// [`MathError::UnsupportedPlane`] for any other name.
    pub fn rotation(plane: &str, angle: f64) -> Result<Self, MathError> {
        let plane: RotationPlane = plane.parse()?;
        Ok(Self::rotation_in(plane, angle))
    }

    /// General 4D rotation: XY * XZ * YZ * XW * YW * ZW.
    ///
    /// The order is fixed and never rearranged. Planes whose angle is exactly
    /// zero are skipped rather than multiplied in as identity.
    pub fn rotation_from_angles(angles: &RotationAngles) -> Self {
        let mut m = Self::IDENTITY;
        for (plane, angle) in angles.iter() {
            if angle != 0.0 {
                m.rotate_plane(plane, angle);
            }
        }
        m
    }

    /// [`Mat4x4::rotation_from_angles`] over named `(plane, angle)` pairs.
    ///
    /// Absent planes count as zero.
    ///
    /// # Errors
    /// [`MathError::UnsupportedPlane`] if any name is not a rotation plane.
    pub fn rotation_from_parameters<'a, I>(params: I) -> Result<Self, MathError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let angles = RotationAngles::from_named(params)?;
        Ok(Self::rotation_from_angles(&angles))
    }

    /// Post-multiply in place by a single-plane rotation: `self = self * R`.
    ///
    /// Only the two columns spanning the plane change, so this touches 8
    /// elements instead of doing a full 4x4 product.
    pub fn rotate_plane(&mut self, plane: RotationPlane, angle: f64) -> &mut Self {
        let (a, b) = plane.axes();
        let (s, c) = angle.sin_cos();
        for row in 0..4 {
            let ma = self.get(row, a);
            let mb = self.get(row, b);
            self.set(row, a, ma * c + mb * s);
            self.set(row, b, -ma * s + mb * c);
        }
        self
    }

    pub fn rotate_xy(&mut self, angle: f64) -> &mut Self {
        self.rotate_plane(RotationPlane::XY, angle)
    }

    pub fn rotate_xz(&mut self, angle: f64) -> &mut Self {
        self.rotate_plane(RotationPlane::XZ, angle)
    }

    pub fn rotate_yz(&mut self, angle: f64) -> &mut Self {
        self.rotate_plane(RotationPlane::YZ, angle)
    }

    pub fn rotate_xw(&mut self, angle: f64) -> &mut Self {
        self.rotate_plane(RotationPlane::XW, angle)
    }

    pub fn rotate_yw(&mut self, angle: f64) -> &mut Self {
        self.rotate_plane(RotationPlane::YW, angle)
    }

    pub fn rotate_zw(&mut self, angle: f64) -> &mut Self {
        self.rotate_plane(RotationPlane::ZW, angle)
    }

    // Products

    /// `self * other`: applies `other` first, then `self`
    pub fn multiply(&self, other: &Self) -> Self {
        let mut out = [0.0f64; 16];
        for col in 0..4 {
            for row in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.get(row, k) * other.get(k, col);
                }
                out[col * 4 + row] = sum;
            }
        }
        Self { data: out }
    }

    /// `self = self * other`
    pub fn multiply_in_place(&mut self, other: &Self) -> &mut Self {
        *self = self.multiply(other);
        self
    }

    /// `self * v`
    #[inline]
    pub fn multiply_vec4(&self, v: Vec4) -> Vec4 {
        let d = &self.data;
        Vec4::new(
            d[0] * v.x + d[4] * v.y + d[8] * v.z + d[12] * v.w,
            d[1] * v.x + d[5] * v.y + d[9] * v.z + d[13] * v.w,
            d[2] * v.x + d[6] * v.y + d[10] * v.z + d[14] * v.w,
            d[3] * v.x + d[7] * v.y + d[11] * v.z + d[15] * v.w,
        )
    }

    /// Transform every point, returning new values
    pub fn transform_points(&self, points: &[Vec4]) -> Vec<Vec4> {
        points.iter().map(|&p| self.multiply_vec4(p)).collect()
    }

    pub fn transform_points_in_place(&self, points: &mut [Vec4]) {
        for p in points.iter_mut() {
            *p = self.multiply_vec4(*p);
        }
    }

    /// Transform a packed `[x0, y0, z0, w0, x1, ...]` buffer into a new buffer.
    ///
    /// # Errors
    /// [`MathError::PackedLength`] if `input.len()` is not a multiple of 4.
    pub fn multiply_vec4_packed(&self, input: &[f64]) -> Result<Vec<f64>, MathError> {
        let mut output = vec![0.0; input.len()];
        self.multiply_vec4_packed_into(input, &mut output)?;
        Ok(output)
    }

    /// Transform a packed buffer into a caller-owned `output`.
    ///
    /// `output` must hold at least `input.len()` values; anything past that is
    /// left untouched. The output is only borrowed for the call. To transform
    /// a buffer onto itself use [`Mat4x4::multiply_vec4_packed_in_place`].
    pub fn multiply_vec4_packed_into(&self, input: &[f64], output: &mut [f64]) -> Result<(), MathError> {
        check_packed(input.len(), 4)?;
        if output.len() < input.len() {
            return Err(MathError::OutputTooSmall { required: input.len(), actual: output.len() });
        }
        for (src, dst) in input.chunks_exact(4).zip(output.chunks_exact_mut(4)) {
            let v = self.multiply_vec4(Vec4::new(src[0], src[1], src[2], src[3]));
            dst.copy_from_slice(&v.to_array());
        }
        Ok(())
    }

    /// Transform a packed buffer onto itself.
    ///
    /// Each group of four is read into locals before any of it is written,
    /// so no partially transformed value feeds back into the product.
    pub fn multiply_vec4_packed_in_place(&self, buffer: &mut [f64]) -> Result<(), MathError> {
        check_packed(buffer.len(), 4)?;
        for group in buffer.chunks_exact_mut(4) {
            let v = Vec4::new(group[0], group[1], group[2], group[3]);
            let out = self.multiply_vec4(v);
            group.copy_from_slice(&out.to_array());
        }
        Ok(())
    }

    // Transpose, determinant, inverse

    pub fn transpose(&self) -> Self {
        let mut out = Self::ZERO;
        for row in 0..4 {
            for col in 0..4 {
                out.set(col, row, self.get(row, col));
            }
        }
        out
    }

    pub fn transpose_in_place(&mut self) -> &mut Self {
        for row in 0..4 {
            for col in (row + 1)..4 {
                self.data.swap(col * 4 + row, row * 4 + col);
            }
        }
        self
    }

    /// Determinant by cofactor expansion over 2x2 minors
    pub fn determinant(&self) -> f64 {
        let b = minors(&self.data);
        det_from_minors(&b)
    }

    /// Inverse via adjugate over determinant.
    ///
    /// Returns `None` when `|det| < SINGULAR_EPSILON`. A singular transform is
    /// an expected state while editing geometry, not a bug.
    pub fn inverse(&self) -> Option<Self> {
        let b = minors(&self.data);
        let det = det_from_minors(&b);
        if det.abs() < SINGULAR_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let [a00, a01, a02, a03, a10, a11, a12, a13, a20, a21, a22, a23, a30, a31, a32, a33] = self.data;
        let [b00, b01, b02, b03, b04, b05, b06, b07, b08, b09, b10, b11] = b;

        let adj = [
            a11 * b11 - a12 * b10 + a13 * b09,
            a02 * b10 - a01 * b11 - a03 * b09,
            a31 * b05 - a32 * b04 + a33 * b03,
            a22 * b04 - a21 * b05 - a23 * b03,
            a12 * b08 - a10 * b11 - a13 * b07,
            a00 * b11 - a02 * b08 + a03 * b07,
            a32 * b02 - a30 * b05 - a33 * b01,
            a20 * b05 - a22 * b02 + a23 * b01,
            a10 * b10 - a11 * b08 + a13 * b06,
            a01 * b08 - a00 * b10 - a03 * b06,
            a30 * b04 - a31 * b02 + a33 * b00,
            a21 * b02 - a20 * b04 - a23 * b00,
            a11 * b07 - a10 * b09 - a12 * b06,
            a00 * b09 - a01 * b07 + a02 * b06,
            a31 * b01 - a30 * b03 - a32 * b00,
            a20 * b03 - a21 * b01 + a22 * b00,
        ];

        Some(Self { data: adj.map(|v| v * inv_det) })
    }

    // Self-checks (tests and debug assertions, not the hot path)

    /// True when `self * transpose(self)` is the identity within `epsilon`
    pub fn is_orthogonal(&self, epsilon: f64) -> bool {
        self.multiply(&self.transpose()).is_identity(epsilon)
    }

    pub fn is_identity(&self, epsilon: f64) -> bool {
        self.approx_eq(&Self::IDENTITY, epsilon)
    }

    /// Element-wise comparison within `epsilon`
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

fn check_packed(len: usize, stride: usize) -> Result<(), MathError> {
    if len % stride == 0 {
        Ok(())
    } else {
        Err(MathError::PackedLength { stride, actual: len })
    }
}

/// The twelve 2x2 minors shared by the determinant and the adjugate
#[inline]
fn minors(d: &[f64; 16]) -> [f64; 12] {
    let [a00, a01, a02, a03, a10, a11, a12, a13, a20, a21, a22, a23, a30, a31, a32, a33] = *d;
    [
        a00 * a11 - a01 * a10,
        a00 * a12 - a02 * a10,
        a00 * a13 - a03 * a10,
        a01 * a12 - a02 * a11,
        a01 * a13 - a03 * a11,
        a02 * a13 - a03 * a12,
        a20 * a31 - a21 * a30,
        a20 * a32 - a22 * a30,
        a20 * a33 - a23 * a30,
        a21 * a32 - a22 * a31,
        a21 * a33 - a23 * a31,
        a22 * a33 - a23 * a32,
    ]
}

#[inline]
fn det_from_minors(b: &[f64; 12]) -> f64 {
    b[0] * b[11] - b[1] * b[10] + b[2] * b[9] + b[3] * b[8] - b[4] * b[7] + b[5] * b[6]
}

impl From<[f64; 16]> for Mat4x4 {
    fn from(data: [f64; 16]) -> Self {
        Self { data }
    }
}

impl From<Mat4x4> for [f64; 16] {
    fn from(m: Mat4x4) -> Self {
        m.data
    }
}

impl std::ops::Mul for Mat4x4 {
    type Output = Self;
    #[inline]
    fn mul(self, other: Self) -> Self {
        self.multiply(&other)
    }
}

impl std::ops::MulAssign for Mat4x4 {
    #[inline]
    fn mul_assign(&mut self, other: Self) {
        self.multiply_in_place(&other);
    }
}

impl std::ops::Mul<Vec4> for Mat4x4 {
    type Output = Vec4;
    #[inline]
    fn mul(self, v: Vec4) -> Vec4 {
        self.multiply_vec4(v)
    }
}

impl std::ops::Mul<f64> for Mat4x4 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self { data: self.data.map(|v| v * scalar) }
    }
}

impl std::ops::Add for Mat4x4 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        let mut data = self.data;
        for (a, b) in data.iter_mut().zip(other.data) {
            *a += b;
        }
        Self { data }
    }
}

impl std::ops::Sub for Mat4x4 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        let mut data = self.data;
        for (a, b) in data.iter_mut().zip(other.data) {
            *a -= b;
        }
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6, PI};

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec_approx_eq(a: Vec4, b: Vec4) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z) && approx_eq(a.w, b.w)
    }

    fn sample_matrix() -> Mat4x4 {
        Mat4x4::from_cols_array([
            2.0, 1.0, 0.0, 3.0,
            0.5, 4.0, 1.0, 0.0,
            1.0, 0.0, 3.0, 2.0,
            0.0, 2.0, 1.0, 5.0,
        ])
    }

    #[test]
    fn test_default_is_identity() {
        let m = Mat4x4::default();
        assert_eq!(m, Mat4x4::identity());
        assert!(m.is_identity(0.0));
        for row in 0..4 {
            for col in 0..4 {
                assert_eq!(m.get(row, col), if row == col { 1.0 } else { 0.0 });
            }
        }
        assert!(Mat4x4::zero().as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_column_major_layout() {
        let mut m = Mat4x4::zero();
        m.set(1, 2, 7.0);
        assert_eq!(m.as_slice()[2 * 4 + 1], 7.0);
        assert_eq!(m.column(2), Vec4::new(0.0, 7.0, 0.0, 0.0));
        assert_eq!(m.row(1), Vec4::new(0.0, 0.0, 7.0, 0.0));

        m.set_row(3, Vec4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(m.get(3, 0), 1.0);
        assert_eq!(m.get(3, 3), 4.0);
    }

    #[test]
    fn test_from_slice() {
        let values: Vec<f64> = (0..16).map(|i| i as f64).collect();
        let m = Mat4x4::from_slice(&values).unwrap();
        assert_eq!(m.get(1, 0), 1.0);
        assert_eq!(m.get(0, 1), 4.0);

        assert_eq!(
            Mat4x4::from_slice(&values[..9]),
            Err(MathError::InvalidLength { expected: 16, actual: 9 })
        );
    }

    #[test]
    fn test_from_columns() {
        let m = Mat4x4::from_columns(Vec4::X, Vec4::Y, Vec4::Z, Vec4::W);
        assert_eq!(m, Mat4x4::IDENTITY);
    }

    #[test]
    fn test_rotation_xy_quarter_turn() {
        let m = Mat4x4::rotation_xy(FRAC_PI_2);
        let result = m.multiply_vec4(Vec4::X);
        assert!(vec_approx_eq(result, Vec4::Y), "X should become Y, got {:?}", result);

        let result = m * Vec4::Y;
        assert!(vec_approx_eq(result, -Vec4::X), "Y should become -X, got {:?}", result);

        assert_eq!(m * Vec4::Z, Vec4::Z);
        assert_eq!(m * Vec4::W, Vec4::W);
    }

    #[test]
    fn test_hyperspace_rotation_moves_into_w() {
        let result = Mat4x4::rotation_zw(FRAC_PI_2) * Vec4::Z;
        assert!(vec_approx_eq(result, Vec4::W), "Z should become W, got {:?}", result);

        let result = Mat4x4::rotation_xw(FRAC_PI_2) * Vec4::X;
        assert!(vec_approx_eq(result, Vec4::W), "X should become W, got {:?}", result);

        let result = Mat4x4::rotation_yw(FRAC_PI_2) * Vec4::W;
        assert!(vec_approx_eq(result, -Vec4::Y), "W should become -Y, got {:?}", result);
    }

    #[test]
    fn test_rotation_block_placement() {
        let angle: f64 = 0.3;
        let (s, c) = angle.sin_cos();
        for plane in RotationPlane::ALL {
            let m = Mat4x4::rotation_in(plane, angle);
            let (a, b) = plane.axes();
            assert_eq!(m.get(a, a), c);
            assert_eq!(m.get(a, b), -s);
            assert_eq!(m.get(b, a), s);
            assert_eq!(m.get(b, b), c);
            for axis in (0..4).filter(|&i| i != a && i != b) {
                assert_eq!(m.column(axis), Mat4x4::IDENTITY.column(axis), "{} moved axis {}", plane, axis);
            }
        }
    }

    #[test]
    fn test_rotations_orthogonal_with_unit_determinant() {
        let angles = [-PI, -1.0, 0.0, 0.1, FRAC_PI_6, FRAC_PI_3, 2.5, PI, 7.0];
        for plane in RotationPlane::ALL {
            for &angle in &angles {
                let r = Mat4x4::rotation_in(plane, angle);
                assert!(r.is_orthogonal(EPSILON), "{} at {} not orthogonal", plane, angle);
                assert!(r.multiply(&r.transpose()).is_identity(EPSILON));
                assert!(approx_eq(r.determinant(), 1.0), "{} at {}: det {}", plane, angle, r.determinant());
                let inv = r.inverse().unwrap();
                assert!(inv.approx_eq(&r.transpose(), EPSILON));
            }
        }
    }

    #[test]
    fn test_rotation_by_name() {
        for plane in RotationPlane::ALL {
            let named = Mat4x4::rotation(plane.name(), 0.7).unwrap();
            assert_eq!(named, Mat4x4::rotation_in(plane, 0.7));
        }
        assert_eq!(Mat4x4::rotation("XY", 1.0).unwrap(), Mat4x4::rotation_xy(1.0));
    }

    #[test]
    fn test_rotation_unknown_plane_is_error() {
        let err = Mat4x4::rotation("XX", 1.0).unwrap_err();
        assert_eq!(err, MathError::UnsupportedPlane("XX".to_string()));
        assert!(Mat4x4::rotation("WV", 0.0).is_err());
    }

    #[test]
    fn test_composition_not_commutative() {
        let a = Mat4x4::rotation_xy(0.6);
        let b = Mat4x4::rotation_xw(0.9);
        let ab = a.multiply(&b);
        let ba = b.multiply(&a);
        assert!(!ab.approx_eq(&ba, 1e-3), "XY*XW should differ from XW*XY");
    }

    #[test]
    fn test_multiply_identity() {
        let m = sample_matrix();
        assert_eq!(m.multiply(&Mat4x4::IDENTITY), m);
        assert_eq!(Mat4x4::IDENTITY.multiply(&m), m);
    }

    #[test]
    fn test_multiply_applies_right_operand_first() {
        let s = Mat4x4::scale(2.0, 1.0, 1.0, 1.0);
        let r = Mat4x4::rotation_xy(FRAC_PI_2);
        // r first: X -> Y, then scaling X leaves Y alone
        let result = s.multiply(&r) * Vec4::X;
        assert!(vec_approx_eq(result, Vec4::Y));
        // s first: X -> 2X, then rotate -> 2Y
        let result = r.multiply(&s) * Vec4::X;
        assert!(vec_approx_eq(result, Vec4::Y * 2.0));
    }

    #[test]
    fn test_multiply_composition() {
        let r45 = Mat4x4::rotation_xy(FRAC_PI_4);
        let r90 = Mat4x4::rotation_xy(FRAC_PI_2);
        assert!((r45 * r45).approx_eq(&r90, EPSILON));
    }

    #[test]
    fn test_multiply_in_place_matches_pure() {
        let a = sample_matrix();
        let b = Mat4x4::rotation_yz(0.4);
        let mut m = a;
        m.multiply_in_place(&b);
        assert_eq!(m, a.multiply(&b));

        let mut m2 = a;
        m2 *= b;
        assert_eq!(m2, a * b);
    }

    #[test]
    fn test_rotate_plane_matches_multiply() {
        let base = sample_matrix();
        for plane in RotationPlane::ALL {
            let mut m = base;
            m.rotate_plane(plane, 0.8);
            let expected = base.multiply(&Mat4x4::rotation_in(plane, 0.8));
            assert!(m.approx_eq(&expected, 1e-12), "{} in-place rotation mismatch", plane);
        }

        let mut chained = Mat4x4::identity();
        chained.rotate_xy(0.1).rotate_xz(0.2).rotate_yz(0.3).rotate_xw(0.4).rotate_yw(0.5).rotate_zw(0.6);
        let composed = Mat4x4::rotation_from_angles(&RotationAngles::from_array([0.1, 0.2, 0.3, 0.4, 0.5, 0.6]));
        assert!(chained.approx_eq(&composed, 1e-12));
    }

    #[test]
    fn test_rotation_from_angles_canonical_order() {
        let angles = RotationAngles::from_array([0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        let expected = Mat4x4::rotation_xy(0.1)
            * Mat4x4::rotation_xz(0.2)
            * Mat4x4::rotation_yz(0.3)
            * Mat4x4::rotation_xw(0.4)
            * Mat4x4::rotation_yw(0.5)
            * Mat4x4::rotation_zw(0.6);
        let m = Mat4x4::rotation_from_angles(&angles);
        assert!(m.approx_eq(&expected, 1e-12));
        assert!(m.is_orthogonal(EPSILON));
        assert!(approx_eq(m.determinant(), 1.0));

        let reversed = Mat4x4::rotation_zw(0.6)
            * Mat4x4::rotation_yw(0.5)
            * Mat4x4::rotation_xw(0.4)
            * Mat4x4::rotation_yz(0.3)
            * Mat4x4::rotation_xz(0.2)
            * Mat4x4::rotation_xy(0.1);
        assert!(!m.approx_eq(&reversed, 1e-3));
    }

    #[test]
    fn test_rotation_from_angles_sparse() {
        assert_eq!(Mat4x4::rotation_from_angles(&RotationAngles::NONE), Mat4x4::IDENTITY);

        let only_xw = RotationAngles::NONE.with(RotationPlane::XW, 0.5);
        assert!(Mat4x4::rotation_from_angles(&only_xw).approx_eq(&Mat4x4::rotation_xw(0.5), 1e-15));
    }

    #[test]
    fn test_rotation_from_parameters() {
        let m = Mat4x4::rotation_from_parameters([("XW", FRAC_PI_6), ("XY", FRAC_PI_4)]).unwrap();
        let expected = Mat4x4::rotation_xy(FRAC_PI_4) * Mat4x4::rotation_xw(FRAC_PI_6);
        assert!(m.approx_eq(&expected, 1e-12));

        assert_eq!(
            Mat4x4::rotation_from_parameters([("XY", 0.1), ("AB", 0.2)]),
            Err(MathError::UnsupportedPlane("AB".to_string()))
        );
        assert_eq!(Mat4x4::rotation_from_parameters(std::iter::empty()), Ok(Mat4x4::IDENTITY));
    }

    #[test]
    fn test_transpose() {
        let m = sample_matrix();
        let t = m.transpose();
        for row in 0..4 {
            for col in 0..4 {
                assert_eq!(t.get(row, col), m.get(col, row));
            }
        }
        assert_eq!(t.transpose(), m);

        let mut in_place = m;
        in_place.transpose_in_place();
        assert_eq!(in_place, t);
    }

    #[test]
    fn test_determinant() {
        assert_eq!(Mat4x4::IDENTITY.determinant(), 1.0);
        assert_eq!(Mat4x4::scale(2.0, 3.0, 4.0, 5.0).determinant(), 120.0);
        assert_eq!(Mat4x4::ZERO.determinant(), 0.0);

        // Swapping two columns flips the sign
        let m = sample_matrix();
        let mut swapped = m;
        swapped.set_column(0, m.column(1));
        swapped.set_column(1, m.column(0));
        assert!(approx_eq(swapped.determinant(), -m.determinant()));
        assert!(approx_eq(m.transpose().determinant(), m.determinant()));
    }

    #[test]
    fn test_inverse() {
        let m = sample_matrix();
        let inv = m.inverse().expect("sample matrix is invertible");
        assert!(m.multiply(&inv).is_identity(1e-9));
        assert!(inv.multiply(&m).is_identity(1e-9));

        let back = inv.inverse().unwrap();
        assert!(back.approx_eq(&m, 1e-9));
    }

    #[test]
    fn test_inverse_of_scale() {
        let inv = Mat4x4::scale(2.0, 4.0, 0.5, 10.0).inverse().unwrap();
        assert!(inv.approx_eq(&Mat4x4::scale(0.5, 0.25, 2.0, 0.1), 1e-12));
    }

    #[test]
    fn test_inverse_singular_is_none() {
        assert_eq!(Mat4x4::ZERO.inverse(), None);
        assert_eq!(Mat4x4::scale(1.0, 1.0, 0.0, 1.0).inverse(), None);

        // Two equal columns
        let mut m = sample_matrix();
        m.set_column(3, m.column(0));
        assert!(m.inverse().is_none());

        // Tiny but nonzero determinant still counts as singular
        assert!(Mat4x4::uniform_scale(1e-3).inverse().is_none());
    }

    #[test]
    fn test_packed_transform() {
        let m = Mat4x4::rotation_xy(FRAC_PI_2);
        let input = [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 5.0];
        let out = m.multiply_vec4_packed(&input).unwrap();
        let expected = [0.0, 1.0, 0.0, 0.0, -1.0, 0.0, 0.0, 5.0];
        for (a, b) in out.iter().zip(expected.iter()) {
            assert!(approx_eq(*a, *b), "{:?}", out);
        }
    }

    #[test]
    fn test_packed_transform_into_caller_buffer() {
        let m = sample_matrix();
        let input = [1.0, 2.0, 3.0, 4.0, -1.0, 0.5, 0.0, 2.0];
        let mut output = [99.0; 10];
        m.multiply_vec4_packed_into(&input, &mut output).unwrap();
        assert_eq!(&output[..4], &(m * Vec4::new(1.0, 2.0, 3.0, 4.0)).to_array());
        assert_eq!(&output[4..8], &(m * Vec4::new(-1.0, 0.5, 0.0, 2.0)).to_array());
        // Tail beyond the input length is untouched
        assert_eq!(&output[8..], &[99.0, 99.0]);
    }

    #[test]
    fn test_packed_transform_in_place_matches_out_of_place() {
        let m = sample_matrix() * Mat4x4::rotation_yw(0.3);
        let original: Vec<f64> = (0..24).map(|i| (i as f64) * 0.37 - 3.0).collect();
        let expected = m.multiply_vec4_packed(&original).unwrap();

        let mut buffer = original.clone();
        m.multiply_vec4_packed_in_place(&mut buffer).unwrap();
        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_packed_transform_rejects_bad_lengths() {
        let m = Mat4x4::IDENTITY;
        assert_eq!(
            m.multiply_vec4_packed(&[1.0, 2.0, 3.0]),
            Err(MathError::PackedLength { stride: 4, actual: 3 })
        );
        let mut small = [0.0; 4];
        assert_eq!(
            m.multiply_vec4_packed_into(&[0.0; 8], &mut small),
            Err(MathError::OutputTooSmall { required: 8, actual: 4 })
        );
        let mut odd = [0.0; 5];
        assert!(m.multiply_vec4_packed_in_place(&mut odd).is_err());
    }

    #[test]
    fn test_transform_points() {
        let m = Mat4x4::rotation_xy(FRAC_PI_2);
        let pts = [Vec4::X, Vec4::Z];
        let out = m.transform_points(&pts);
        assert!(vec_approx_eq(out[0], Vec4::Y));
        assert_eq!(out[1], Vec4::Z);

        let mut in_place = pts;
        m.transform_points_in_place(&mut in_place);
        assert_eq!(in_place.to_vec(), out);
    }

    #[test]
    fn test_arithmetic_operators() {
        let m = sample_matrix();
        let doubled = m * 2.0;
        assert_eq!(doubled.get(0, 0), 4.0);
        assert_eq!(m + m, doubled);
        assert_eq!(doubled - m, m);
    }

    #[test]
    fn test_is_orthogonal_rejects_scale() {
        assert!(!Mat4x4::uniform_scale(2.0).is_orthogonal(1e-5));
        assert!(!sample_matrix().is_identity(1e-5));
    }

    #[test]
    fn test_to_f32_array() {
        let m = Mat4x4::scale(1.5, 2.0, 0.25, 1.0);
        let f = m.to_f32_array();
        assert_eq!(f[0], 1.5f32);
        assert_eq!(f[5], 2.0f32);
        assert_eq!(f[10], 0.25f32);
        assert_eq!(f[15], 1.0f32);
    }
}
