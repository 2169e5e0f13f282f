//! Rotation planes of 4D space
//!
//! In 4D, rotations happen in planes rather than around axes.
//! There are 6 rotation planes: XY, XZ, YZ span ordinary 3D space,
//! while XW, YW, ZW move geometry through the W axis.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::MathError;

/// The 6 rotation planes in 4D space
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RotationPlane {
    /// XY plane - rotation around Z in 3D
    XY,
    /// XZ plane - rotation around Y in 3D
    XZ,
    /// YZ plane - rotation around X in 3D
    YZ,
    /// XW plane - hyperspace rotation affecting X
    XW,
    /// YW plane - hyperspace rotation affecting Y
    YW,
    /// ZW plane - hyperspace rotation affecting Z
    ZW,
}

impl RotationPlane {
    /// All planes in canonical composition order
    pub const ALL: [RotationPlane; 6] = [
        RotationPlane::XY,
        RotationPlane::XZ,
        RotationPlane::YZ,
        RotationPlane::XW,
        RotationPlane::YW,
        RotationPlane::ZW,
    ];

    /// Axis indices spanning the plane (0=X, 1=Y, 2=Z, 3=W), lower index first
    #[inline]
    pub const fn axes(self) -> (usize, usize) {
        match self {
            RotationPlane::XY => (0, 1),
            RotationPlane::XZ => (0, 2),
            RotationPlane::YZ => (1, 2),
            RotationPlane::XW => (0, 3),
            RotationPlane::YW => (1, 3),
            RotationPlane::ZW => (2, 3),
        }
    }

    /// True for the three planes involving W
    #[inline]
    pub const fn is_hyperspace(self) -> bool {
        matches!(self, RotationPlane::XW | RotationPlane::YW | RotationPlane::ZW)
    }

    pub const fn name(self) -> &'static str {
        match self {
            RotationPlane::XY => "XY",
            RotationPlane::XZ => "XZ",
            RotationPlane::YZ => "YZ",
            RotationPlane::XW => "XW",
            RotationPlane::YW => "YW",
            RotationPlane::ZW => "ZW",
        }
    }
}

impl fmt::Display for RotationPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RotationPlane {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RotationPlane::ALL
            .into_iter()
            .find(|plane| plane.name() == s)
            .ok_or_else(|| MathError::UnsupportedPlane(s.to_string()))
    }
}

/// One angle per rotation plane, in radians.
///
/// Planes left at zero are skipped when composing, so a sparse set of
/// angles costs only the rotations actually present. Deserializes from a
/// sparse map: `{ xw = 0.5 }` leaves the other five at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationAngles {
    pub xy: f64,
    pub xz: f64,
    pub yz: f64,
    pub xw: f64,
    pub yw: f64,
    pub zw: f64,
}

impl RotationAngles {
    /// All six angles zero
    pub const NONE: Self = Self { xy: 0.0, xz: 0.0, yz: 0.0, xw: 0.0, yw: 0.0, zw: 0.0 };

    /// Angles in canonical order [XY, XZ, YZ, XW, YW, ZW]
    pub const fn from_array(a: [f64; 6]) -> Self {
        Self { xy: a[0], xz: a[1], yz: a[2], xw: a[3], yw: a[4], zw: a[5] }
    }

    pub const fn to_array(&self) -> [f64; 6] {
        [self.xy, self.xz, self.yz, self.xw, self.yw, self.zw]
    }

    /// Builder-style setter for a single plane
    pub fn with(mut self, plane: RotationPlane, angle: f64) -> Self {
        self.set(plane, angle);
        self
    }

    pub fn get(&self, plane: RotationPlane) -> f64 {
        match plane {
            RotationPlane::XY => self.xy,
            RotationPlane::XZ => self.xz,
            RotationPlane::YZ => self.yz,
            RotationPlane::XW => self.xw,
            RotationPlane::YW => self.yw,
            RotationPlane::ZW => self.zw,
        }
    }

    pub fn set(&mut self, plane: RotationPlane, angle: f64) {
        match plane {
            RotationPlane::XY => self.xy = angle,
            RotationPlane::XZ => self.xz = angle,
            RotationPlane::YZ => self.yz = angle,
            RotationPlane::XW => self.xw = angle,
            RotationPlane::YW => self.yw = angle,
            RotationPlane::ZW => self.zw = angle,
        }
    }

    /// (plane, angle) pairs in canonical composition order, zeros included
    pub fn iter(&self) -> impl Iterator<Item = (RotationPlane, f64)> + '_ {
        RotationPlane::ALL.into_iter().map(move |plane| (plane, self.get(plane)))
    }

    /// Build from named pairs such as `("XW", 0.5)`.
    ///
    /// Missing planes stay zero; a repeated name keeps the last angle.
    /// Any name outside the six planes is rejected.
    pub fn from_named<'a, I>(params: I) -> Result<Self, MathError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut angles = Self::NONE;
        for (name, angle) in params {
            let plane: RotationPlane = name.parse()?;
            angles.set(plane, angle);
        }
        Ok(angles)
    }

    pub fn is_zero(&self) -> bool {
        self.to_array().iter().all(|&a| a == 0.0)
    }
}
