//! Overlay configuration.
//!
//! Stored in `~/.gridlens/config.toml`. Every section is optional; missing
//! values fall back to the defaults below.

use std::path::{Path, PathBuf};

use gridlens_core::Meters;
use gridlens_geom::{
    CoordinateTransform, DelaunayOptions, DEFAULT_DENSIFY_SCALE, DEFAULT_ZONE_COLS,
    DEFAULT_ZONE_ROWS, PREVIEW_OFFSET_METERS,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub densify: DensifyConfig,
    pub conflict: ConflictConfig,
    pub triangulation: TriangulationConfig,
    pub zones: ZonesConfig,
    pub layers: LayersConfig,
}

/// Visual compression toward the network centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensifyConfig {
    pub enabled: bool,
    /// Compression factor in (0, 1); smaller is denser.
    pub scale: f64,
}

impl Default for DensifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scale: DEFAULT_DENSIFY_SCALE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflictConfig {
    /// Sideways shift for previews that duplicate an existing line.
    pub offset_meters: f64,
}

impl Default for ConflictConfig {
    fn default() -> Self {
        Self {
            offset_meters: PREVIEW_OFFSET_METERS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangulationConfig {
    /// Tolerance band for the circumcircle test; 0 is exact.
    pub in_circle_epsilon: f64,
    pub super_triangle_scale: f64,
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        let options = DelaunayOptions::default();
        Self {
            in_circle_epsilon: options.in_circle_epsilon,
            super_triangle_scale: options.super_triangle_scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZonesConfig {
    pub rows: usize,
    pub cols: usize,
}

impl Default for ZonesConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ZONE_ROWS,
            cols: DEFAULT_ZONE_COLS,
        }
    }
}

/// Initial visibility of the optional layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayersConfig {
    /// Baseline stations and lines.
    pub grid: bool,
    pub triangles: bool,
    pub zones: bool,
}

impl Default for LayersConfig {
    fn default() -> Self {
        Self {
            grid: true,
            triangles: false,
            zones: false,
        }
    }
}

impl OverlayConfig {
    /// Get the default config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".gridlens"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load from the default location, or defaults when no file exists.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load and validate a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// `path` when given, otherwise the default location.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the geometry cannot work with.
    pub fn validate(&self) -> Result<()> {
        let scale = self.densify.scale;
        if !scale.is_finite() || scale <= 0.0 || scale >= 1.0 {
            return Err(Error::Config(format!(
                "densify.scale must be in (0, 1), got {scale}"
            )));
        }
        let offset = self.conflict.offset_meters;
        if !offset.is_finite() || offset <= 0.0 {
            return Err(Error::Config(format!(
                "conflict.offset_meters must be positive, got {offset}"
            )));
        }
        let epsilon = self.triangulation.in_circle_epsilon;
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(Error::Config(format!(
                "triangulation.in_circle_epsilon must be non-negative, got {epsilon}"
            )));
        }
        let expansion = self.triangulation.super_triangle_scale;
        if !expansion.is_finite() || expansion < 1.0 {
            return Err(Error::Config(format!(
                "triangulation.super_triangle_scale must be at least 1, got {expansion}"
            )));
        }
        if self.zones.rows == 0 || self.zones.cols == 0 {
            return Err(Error::Config("zones.rows and zones.cols must be at least 1".into()));
        }
        Ok(())
    }

    pub fn transform(&self) -> Result<CoordinateTransform> {
        CoordinateTransform::new(self.densify.enabled, self.densify.scale).map_err(Error::from)
    }

    pub fn delaunay_options(&self) -> DelaunayOptions {
        DelaunayOptions::default()
            .with_epsilon(self.triangulation.in_circle_epsilon)
            .with_super_triangle_scale(self.triangulation.super_triangle_scale)
    }

    pub fn offset(&self) -> Meters {
        Meters(self.conflict.offset_meters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = OverlayConfig::default();
        assert!(config.densify.enabled);
        assert_eq!(config.densify.scale, 0.35);
        assert_eq!(config.conflict.offset_meters, 140.0);
        assert_eq!(config.triangulation.in_circle_epsilon, 0.0);
        assert_eq!((config.zones.rows, config.zones.cols), (6, 10));
        assert!(config.layers.grid && !config.layers.triangles);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_parsing() {
        let toml = r#"
            [densify]
            scale = 0.5

            [layers]
            zones = true
        "#;

        let config: OverlayConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.densify.scale, 0.5);
        assert!(config.densify.enabled);
        assert!(config.layers.zones);
        assert!(config.layers.grid);
        assert_eq!(config.conflict.offset_meters, 140.0);
    }

    #[test]
    fn test_save_and_load() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut config = OverlayConfig::default();
        config.zones.rows = 3;
        config.triangulation.in_circle_epsilon = 1e-9;
        config.save_to(&path).unwrap();

        let loaded = OverlayConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = OverlayConfig::default();
        config.densify.scale = 1.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = OverlayConfig::default();
        config.conflict.offset_meters = -5.0;
        assert!(config.validate().is_err());

        let mut config = OverlayConfig::default();
        config.zones.cols = 0;
        assert!(config.validate().is_err());

        let mut config = OverlayConfig::default();
        config.triangulation.super_triangle_scale = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_rejects_invalid_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[densify]\nscale = 2.0\n").unwrap();
        assert!(OverlayConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn test_resolve_missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            OverlayConfig::resolve(Some(&missing)),
            Err(Error::Io(_))
        ));
    }
}
