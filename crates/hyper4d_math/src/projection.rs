//! 4D to 3D projections
//!
//! Four rules for collapsing a 4D point into 3D:
//!
//! - perspective: `xyz / (d - w)`, as if viewed from `w = d`
//! - stereographic: `xyz / (1 - w)`, conformal from the unit hypersphere
//! - orthographic: drop `w`
//! - oblique: `xyz + shear * w`
//!
//! Each comes in three shapes: a single point, a slice of [`Vec4`]
//! (`*_array`), and a packed `[x, y, z, w, ...]` buffer producing
//! `[x, y, z, ...]` (`*_packed`, `*_packed_into`). The plain-array
//! functions (`project_perspective` and friends) are the one implementation
//! every other shape calls, so all forms agree bit for bit.
//!
//! Perspective and stereographic clamp a near-zero denominator to
//! `±epsilon` instead of dividing toward infinity. Geometry that rotates
//! through the singular hyperplane comes out large but finite.

use crate::{MathError, Vec4};

/// Default viewer distance along W for perspective projection
pub const DEFAULT_DISTANCE: f64 = 2.0;

/// Default denominator clamp for perspective and stereographic projection
pub const DEFAULT_EPSILON: f64 = 1e-5;

/// Default shear for oblique (cavalier) projection
pub const DEFAULT_OBLIQUE_SHEAR: [f64; 3] = [0.5, 0.5, 0.0];

/// Tunables shared by the projections that divide
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionOptions {
    /// Denominators with a smaller magnitude are clamped to `±epsilon`
    pub epsilon: f64,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self { epsilon: DEFAULT_EPSILON }
    }
}

impl ProjectionOptions {
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

/// Clamp `denom` away from zero, keeping its sign (positive when exactly zero)
#[inline]
pub fn clamp_denominator(denom: f64, epsilon: f64) -> f64 {
    if denom.abs() < epsilon {
        if denom < 0.0 {
            -epsilon
        } else {
            epsilon
        }
    } else {
        denom
    }
}

// Plain-array form

#[inline]
pub fn project_perspective(p: [f64; 4], distance: f64, options: &ProjectionOptions) -> [f64; 3] {
    let scale = 1.0 / clamp_denominator(distance - p[3], options.epsilon);
    [p[0] * scale, p[1] * scale, p[2] * scale]
}

#[inline]
pub fn project_stereographic(p: [f64; 4], options: &ProjectionOptions) -> [f64; 3] {
    let scale = 1.0 / clamp_denominator(1.0 - p[3], options.epsilon);
    [p[0] * scale, p[1] * scale, p[2] * scale]
}

#[inline]
pub fn project_orthographic(p: [f64; 4]) -> [f64; 3] {
    [p[0], p[1], p[2]]
}

#[inline]
pub fn project_oblique(p: [f64; 4], shear: [f64; 3]) -> [f64; 3] {
    [
        p[0] + shear[0] * p[3],
        p[1] + shear[1] * p[3],
        p[2] + shear[2] * p[3],
    ]
}

#[inline]
fn lift(p: [f64; 3]) -> Vec4 {
    Vec4::new(p[0], p[1], p[2], 0.0)
}

// Vec4 form. Results always have w = 0.

/// Perspective projection with the default epsilon
#[inline]
pub fn perspective(v: Vec4, distance: f64) -> Vec4 {
    perspective_with(v, distance, &ProjectionOptions::default())
}

#[inline]
pub fn perspective_with(v: Vec4, distance: f64, options: &ProjectionOptions) -> Vec4 {
    lift(project_perspective(v.to_array(), distance, options))
}

/// Stereographic projection from the pole at `w = 1`
#[inline]
pub fn stereographic(v: Vec4) -> Vec4 {
    stereographic_with(v, &ProjectionOptions::default())
}

#[inline]
pub fn stereographic_with(v: Vec4, options: &ProjectionOptions) -> Vec4 {
    lift(project_stereographic(v.to_array(), options))
}

/// Map a 3D point (the xyz of `p`) back onto the unit hypersphere.
///
/// `(2x, 2y, 2z, r² - 1) / (1 + r²)` with `r² = x² + y² + z²`; `p.w` is ignored.
pub fn stereographic_inverse(p: Vec4) -> Vec4 {
    let r2 = p.x * p.x + p.y * p.y + p.z * p.z;
    let inv = 1.0 / (1.0 + r2);
    Vec4::new(2.0 * p.x * inv, 2.0 * p.y * inv, 2.0 * p.z * inv, (r2 - 1.0) * inv)
}

#[inline]
pub fn orthographic(v: Vec4) -> Vec4 {
    lift(project_orthographic(v.to_array()))
}

#[inline]
pub fn oblique(v: Vec4, shear_x: f64, shear_y: f64, shear_z: f64) -> Vec4 {
    lift(project_oblique(v.to_array(), [shear_x, shear_y, shear_z]))
}

// Batch form

pub fn perspective_array(points: &[Vec4], distance: f64, options: &ProjectionOptions) -> Vec<Vec4> {
    points.iter().map(|&v| perspective_with(v, distance, options)).collect()
}

pub fn stereographic_array(points: &[Vec4], options: &ProjectionOptions) -> Vec<Vec4> {
    points.iter().map(|&v| stereographic_with(v, options)).collect()
}

pub fn orthographic_array(points: &[Vec4]) -> Vec<Vec4> {
    points.iter().map(|&v| orthographic(v)).collect()
}

pub fn oblique_array(points: &[Vec4], shear: [f64; 3]) -> Vec<Vec4> {
    points.iter().map(|&v| lift(project_oblique(v.to_array(), shear))).collect()
}

// Packed form

/// Number of output values a packed 4-wide input of `len` values produces
#[inline]
pub fn packed_output_len(len: usize) -> usize {
    len / 4 * 3
}

/// Run `project` over every 4-wide group of `input`, writing 3-wide groups
/// to the front of `output`. Values past the written range are untouched.
fn project_packed_into<F>(input: &[f64], output: &mut [f64], project: F) -> Result<(), MathError>
where
    F: Fn([f64; 4]) -> [f64; 3],
{
    if input.len() % 4 != 0 {
        return Err(MathError::PackedLength { stride: 4, actual: input.len() });
    }
    let required = packed_output_len(input.len());
    if output.len() < required {
        return Err(MathError::OutputTooSmall { required, actual: output.len() });
    }
    for (src, dst) in input.chunks_exact(4).zip(output.chunks_exact_mut(3)) {
        let p = project([src[0], src[1], src[2], src[3]]);
        dst.copy_from_slice(&p);
    }
    Ok(())
}

fn project_packed<F>(input: &[f64], project: F) -> Result<Vec<f64>, MathError>
where
    F: Fn([f64; 4]) -> [f64; 3],
{
    let mut output = vec![0.0; packed_output_len(input.len())];
    project_packed_into(input, &mut output, project)?;
    Ok(output)
}

pub fn perspective_packed(input: &[f64], distance: f64, options: &ProjectionOptions) -> Result<Vec<f64>, MathError> {
    project_packed(input, |p| project_perspective(p, distance, options))
}

/// Perspective over a packed buffer into a caller-owned `output` of at
/// least `input.len() / 4 * 3` values
pub fn perspective_packed_into(
    input: &[f64],
    distance: f64,
    options: &ProjectionOptions,
    output: &mut [f64],
) -> Result<(), MathError> {
    project_packed_into(input, output, |p| project_perspective(p, distance, options))
}

pub fn stereographic_packed(input: &[f64], options: &ProjectionOptions) -> Result<Vec<f64>, MathError> {
    project_packed(input, |p| project_stereographic(p, options))
}

pub fn stereographic_packed_into(
    input: &[f64],
    options: &ProjectionOptions,
    output: &mut [f64],
) -> Result<(), MathError> {
    project_packed_into(input, output, |p| project_stereographic(p, options))
}

pub fn orthographic_packed(input: &[f64]) -> Result<Vec<f64>, MathError> {
    project_packed(input, project_orthographic)
}

pub fn orthographic_packed_into(input: &[f64], output: &mut [f64]) -> Result<(), MathError> {
    project_packed_into(input, output, project_orthographic)
}

pub fn oblique_packed(input: &[f64], shear: [f64; 3]) -> Result<Vec<f64>, MathError> {
    project_packed(input, |p| project_oblique(p, shear))
}

pub fn oblique_packed_into(input: &[f64], shear: [f64; 3], output: &mut [f64]) -> Result<(), MathError> {
    project_packed_into(input, output, |p| project_oblique(p, shear))
}

/// A projection rule with its parameters, for callers that pick one at runtime
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectionKind {
    Perspective { distance: f64 },
    Stereographic,
    Orthographic,
    Oblique { shear: [f64; 3] },
}

impl Default for ProjectionKind {
    fn default() -> Self {
        ProjectionKind::Perspective { distance: DEFAULT_DISTANCE }
    }
}

impl ProjectionKind {
    /// Project plain `[x, y, z, w]` to `[x, y, z]`
    #[inline]
    pub fn project_xyzw(&self, p: [f64; 4], options: &ProjectionOptions) -> [f64; 3] {
        match *self {
            ProjectionKind::Perspective { distance } => project_perspective(p, distance, options),
            ProjectionKind::Stereographic => project_stereographic(p, options),
            ProjectionKind::Orthographic => project_orthographic(p),
            ProjectionKind::Oblique { shear } => project_oblique(p, shear),
        }
    }

    #[inline]
    pub fn project(&self, v: Vec4, options: &ProjectionOptions) -> Vec4 {
        lift(self.project_xyzw(v.to_array(), options))
    }

    pub fn project_array(&self, points: &[Vec4], options: &ProjectionOptions) -> Vec<Vec4> {
        points.iter().map(|&v| self.project(v, options)).collect()
    }

    pub fn project_packed(&self, input: &[f64], options: &ProjectionOptions) -> Result<Vec<f64>, MathError> {
        project_packed(input, |p| self.project_xyzw(p, options))
    }

    pub fn project_packed_into(
        &self,
        input: &[f64],
        options: &ProjectionOptions,
        output: &mut [f64],
    ) -> Result<(), MathError> {
        project_packed_into(input, output, |p| self.project_xyzw(p, options))
    }
}
