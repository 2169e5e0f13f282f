//! hyper4d - 4D geometry reduced to 3D
//!
//! Application layer over [`hyper4d_math`]: configuration loading and the
//! per-frame rotate/project/slice path a renderer calls into.

pub mod config;
pub mod frame;

pub use hyper4d_math as math;
