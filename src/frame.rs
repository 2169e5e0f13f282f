//! Per-frame 4D to 3D reduction for upload
//!
//! [`FrameProjector`] is what a renderer drives once per frame: set the
//! current rotation angles, hand over the 4D vertices, and get back a flat
//! `[x, y, z, ...]` buffer of `f32` ready for a vertex buffer.
//!
//! All math stays in `f64`. The conversion to `f32` happens in exactly one
//! place, [`downcast_into`], at the very end of each path.

use hyper4d_math::projection::packed_output_len;
use hyper4d_math::slice::{self, SlicePoint};
use hyper4d_math::{Mat4x4, MathError, ProjectionKind, ProjectionOptions, RotationAngles, Vec4};

use crate::config::{AppConfig, SliceConfig};

/// Write `src` into `dst` as single precision, replacing its contents
pub fn downcast_into(src: &[f64], dst: &mut Vec<f32>) {
    dst.clear();
    dst.extend(src.iter().map(|&v| v as f32));
}

/// Reusable rotate-then-project state.
///
/// Scratch buffers are kept between frames so steady-state frames don't
/// allocate once they have seen their largest vertex count.
pub struct FrameProjector {
    rotation: Mat4x4,
    kind: ProjectionKind,
    options: ProjectionOptions,
    slice: SliceConfig,
    /// Packed 4-wide vertices, transformed in place
    packed: Vec<f64>,
    /// Packed 3-wide projection output
    projected: Vec<f64>,
    rotated: Vec<Vec4>,
    section: Vec<Vec4>,
    gpu: Vec<f32>,
}

impl FrameProjector {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            rotation: Mat4x4::rotation_from_angles(&config.rotation),
            kind: config.projection.kind(),
            options: config.projection.options(),
            slice: config.slice.clone(),
            packed: Vec::new(),
            projected: Vec::new(),
            rotated: Vec::new(),
            section: Vec::new(),
            gpu: Vec::new(),
        }
    }

    /// Rebuild the rotation from per-plane angles (canonical plane order)
    pub fn set_angles(&mut self, angles: &RotationAngles) {
        self.rotation = Mat4x4::rotation_from_angles(angles);
        log::debug!("Rotation rebuilt from angles {:?}", angles.to_array());
    }

    /// Use an externally composed rotation as is
    pub fn set_rotation(&mut self, rotation: Mat4x4) {
        self.rotation = rotation;
    }

    pub fn rotation(&self) -> &Mat4x4 {
        &self.rotation
    }

    pub fn set_projection(&mut self, kind: ProjectionKind) {
        self.kind = kind;
    }

    pub fn projection(&self) -> ProjectionKind {
        self.kind
    }

    /// Rotate and project `vertices`, returning packed `f32` xyz triples
    pub fn project(&mut self, vertices: &[Vec4]) -> Result<&[f32], MathError> {
        self.packed.clear();
        self.packed.extend(vertices.iter().flat_map(|v| v.to_array()));
        self.project_scratch()
    }

    /// Same as [`FrameProjector::project`] for an already packed `[x, y, z, w, ...]` buffer
    pub fn project_packed(&mut self, vertices: &[f64]) -> Result<&[f32], MathError> {
        self.packed.clear();
        self.packed.extend_from_slice(vertices);
        self.project_scratch()
    }

    fn project_scratch(&mut self) -> Result<&[f32], MathError> {
        self.rotation.multiply_vec4_packed_in_place(&mut self.packed)?;
        self.projected.resize(packed_output_len(self.packed.len()), 0.0);
        self.kind.project_packed_into(&self.packed, &self.options, &mut self.projected)?;
        downcast_into(&self.projected, &mut self.gpu);
        Ok(&self.gpu)
    }

    /// Rotate, then cut the wireframe at the configured W plane.
    ///
    /// Returns packed `f32` xyz triples, one per crossing edge.
    pub fn slice_outline(&mut self, vertices: &[Vec4], edges: &[[usize; 2]]) -> Result<&[f32], MathError> {
        self.rotated.clear();
        self.rotated.extend(vertices.iter().map(|&v| self.rotation.multiply_vec4(v)));
        slice::slice_edges_into(&self.rotated, edges, self.slice.w_plane, &mut self.section)?;
        log::debug!(
            "Slice at w = {} cut {} of {} edges",
            self.slice.w_plane,
            self.section.len(),
            edges.len()
        );

        self.projected.clear();
        self.projected.extend(self.section.iter().flat_map(|p| p.xyz()));
        downcast_into(&self.projected, &mut self.gpu);
        Ok(&self.gpu)
    }

    /// Rotated vertices that fall inside the configured slab, with fade alpha
    pub fn slab_points(&self, vertices: &[Vec4]) -> Vec<SlicePoint> {
        vertices
            .iter()
            .filter_map(|&v| {
                slice::project_slice(
                    self.rotation.multiply_vec4(v),
                    self.slice.w_plane,
                    self.slice.thickness,
                    self.slice.fade,
                )
            })
            .collect()
    }

    /// Rotated vertices within `tolerance` of the slice plane
    pub fn count_in_slice(&self, vertices: &[Vec4]) -> usize {
        vertices
            .iter()
            .filter(|&&v| slice::is_in_slice(self.rotation.multiply_vec4(v), self.slice.w_plane, self.slice.tolerance))
            .count()
    }

    /// The last output buffer as raw bytes
    pub fn gpu_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.gpu)
    }
}
