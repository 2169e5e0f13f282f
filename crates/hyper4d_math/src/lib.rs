//! 4D Mathematics Library
//!
//! Vector, matrix, projection and slicing primitives for hyper4d. Everything
//! here computes numbers; rendering and geometry generation live elsewhere.
//!
//! ## Core Types
//!
//! - [`Vec4`] - 4D vector with x, y, z, w components
//! - [`Mat4x4`] - column-major 4x4 matrix with rotations in all six planes
//! - [`RotationPlane`] / [`RotationAngles`] - the six planes and one angle per plane
//! - [`Rotor4`] - 8-component rotor; composes and interpolates rotations (`slerp`)
//!
//! ## Reducing 4D to 3D
//!
//! - [`projection`] - perspective, stereographic, orthographic and oblique projection
//! - [`slice`] - cross-sections at a constant-W hyperplane
//!
//! ## Precision
//!
//! All math is `f64`. [`Vec4::to_f32_array`] and [`Mat4x4::to_f32_array`]
//! produce single precision for upload; callers should convert once, at
//! that boundary, and nowhere else.

mod error;
mod vec4;
mod plane;
pub mod mat4;
mod rotor4;
pub mod projection;
pub mod slice;

pub use error::MathError;
pub use vec4::{Vec4, NORMALIZE_EPSILON};
pub use plane::{RotationAngles, RotationPlane};
pub use mat4::{Mat4x4, SINGULAR_EPSILON};
pub use rotor4::{Rotor4, SLERP_NLERP_THRESHOLD};
pub use projection::{ProjectionKind, ProjectionOptions};
pub use slice::{edge_crossing, is_in_slice, slice_edges, SlicePoint};
