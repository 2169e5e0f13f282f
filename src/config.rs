//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`H4D_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use hyper4d_math::projection::{DEFAULT_DISTANCE, DEFAULT_EPSILON, DEFAULT_OBLIQUE_SHEAR};
use hyper4d_math::{ProjectionKind, ProjectionOptions, RotationAngles};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// How 4D points are reduced to 3D
    #[serde(default)]
    pub projection: ProjectionConfig,
    /// Rotation angles per plane, in radians (missing planes are zero)
    #[serde(default)]
    pub rotation: RotationAngles,
    /// Cross-section settings
    #[serde(default)]
    pub slice: SliceConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`H4D_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // H4D_PROJECTION__DISTANCE=3.5 -> projection.distance = 3.5
        figment = figment.merge(Env::prefixed("H4D_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Projection rule selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    Perspective,
    Stereographic,
    Orthographic,
    Oblique,
}

/// Projection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Which projection to use
    pub mode: ProjectionMode,
    /// Viewer distance along W (perspective only)
    pub distance: f64,
    /// Denominator clamp for perspective and stereographic
    pub epsilon: f64,
    /// Shear applied per unit of W (oblique only)
    pub shear: [f64; 3],
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            mode: ProjectionMode::Perspective,
            distance: DEFAULT_DISTANCE,
            epsilon: DEFAULT_EPSILON,
            shear: DEFAULT_OBLIQUE_SHEAR,
        }
    }
}

impl ProjectionConfig {
    pub fn kind(&self) -> ProjectionKind {
        match self.mode {
            ProjectionMode::Perspective => ProjectionKind::Perspective { distance: self.distance },
            ProjectionMode::Stereographic => ProjectionKind::Stereographic,
            ProjectionMode::Orthographic => ProjectionKind::Orthographic,
            ProjectionMode::Oblique => ProjectionKind::Oblique { shear: self.shear },
        }
    }

    pub fn options(&self) -> ProjectionOptions {
        ProjectionOptions::with_epsilon(self.epsilon)
    }
}

/// Slice configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceConfig {
    /// W value of the slicing hyperplane
    pub w_plane: f64,
    /// Membership tolerance for points
    pub tolerance: f64,
    /// Half-thickness for faded point slices
    pub thickness: f64,
    /// Fade points toward the slice edges
    pub fade: bool,
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            w_plane: 0.0,
            tolerance: 0.1,
            thickness: 0.1,
            fade: true,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
