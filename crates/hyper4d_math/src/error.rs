//! Error types for invalid caller input
//!
//! Degenerate numeric conditions (singular matrices, zero-length vectors,
//! projection singularities, edges parallel to a slice) are not errors and
//! never show up here. They have their own fallbacks at each call site.

use std::fmt;

/// Error type for math operations given malformed input
#[derive(Debug, Clone, PartialEq)]
pub enum MathError {
    /// Plane name outside XY, XZ, YZ, XW, YW, ZW
    UnsupportedPlane(String),
    /// Slice handed to a fixed-size constructor had the wrong length
    InvalidLength { expected: usize, actual: usize },
    /// Packed buffer length is not a multiple of its group width
    PackedLength { stride: usize, actual: usize },
    /// Caller-supplied output buffer cannot hold the result
    OutputTooSmall { required: usize, actual: usize },
    /// Edge references a vertex that does not exist
    EdgeIndexOutOfRange { index: usize, vertex_count: usize },
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::UnsupportedPlane(name) => {
                write!(f, "Unsupported rotation plane: {}", name)
            }
            MathError::InvalidLength { expected, actual } => {
                write!(f, "Invalid length: expected {} elements, got {}", expected, actual)
            }
            MathError::PackedLength { stride, actual } => write!(
                f,
                "Packed buffer length {} is not a multiple of {}",
                actual, stride
            ),
            MathError::OutputTooSmall { required, actual } => write!(
                f,
                "Output buffer too small: need {} elements, got {}",
                required, actual
            ),
            MathError::EdgeIndexOutOfRange { index, vertex_count } => write!(
                f,
                "Edge index {} out of range for {} vertices",
                index, vertex_count
            ),
        }
    }
}

impl std::error::Error for MathError {}
