//! Validation configuration
//!
//! Thresholds are read from a TOML file whose keys use the upper-snake names
//! that the zone tooling has always used (`MAX_CONVEX_DEVIATION`, ...). Keys
//! that are absent fall back to the production defaults below.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How areas and perimeters are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaMetric {
    /// Euclidean measure in the units of the coordinates.
    Planar,
    /// Ellipsoidal measure on WGS84, in square metres and metres.
    #[default]
    Geodesic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ValidationConfig {
    /// Largest accepted convex hull deviation, in [0, 1].
    #[serde(default = "default_max_convex_deviation")]
    pub max_convex_deviation: f64,

    /// Holes smaller than this are ignored by gap detection.
    #[serde(default = "default_min_area_holes")]
    pub min_area_holes: f64,

    /// Holes whose compactness (`4πA/P²`) is below this ratio are slivers.
    #[serde(default = "default_sliver_ratio")]
    pub sliver_ratio: f64,

    /// Overlaps up to this area are tolerated.
    #[serde(default = "default_min_area_intersection")]
    pub min_area_intersection: f64,

    /// Directory receiving diagnostic artifacts; no artifacts when unset.
    #[serde(default)]
    pub error_path: Option<PathBuf>,

    #[serde(default)]
    pub area_metric: AreaMetric,
}

fn default_max_convex_deviation() -> f64 {
    0.708
}

fn default_min_area_holes() -> f64 {
    600_000_000.0
}

fn default_sliver_ratio() -> f64 {
    0.1
}

fn default_min_area_intersection() -> f64 {
    6_000_000.0
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_convex_deviation: default_max_convex_deviation(),
            min_area_holes: default_min_area_holes(),
            sliver_ratio: default_sliver_ratio(),
            min_area_intersection: default_min_area_intersection(),
            error_path: None,
            area_metric: AreaMetric::default(),
        }
    }
}

impl ValidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoadError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        Self::parse(&content)
    }

    /// Parse and validate a TOML document.
    pub fn parse(content: &str) -> Result<Self, LoadError> {
        let config: ValidationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds outside their meaningful range.
    pub fn validate(&self) -> Result<(), LoadError> {
        if !(0.0..=1.0).contains(&self.max_convex_deviation) {
            return Err(LoadError::InvalidConfig(format!(
                "MAX_CONVEX_DEVIATION must be within [0, 1], got {}",
                self.max_convex_deviation
            )));
        }
        if !(0.0..=1.0).contains(&self.sliver_ratio) {
            return Err(LoadError::InvalidConfig(format!(
                "SLIVER_RATIO must be within [0, 1], got {}",
                self.sliver_ratio
            )));
        }
        for (name, value) in [
            ("MIN_AREA_HOLES", self.min_area_holes),
            ("MIN_AREA_INTERSECTION", self.min_area_intersection),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LoadError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn with_max_convex_deviation(mut self, value: f64) -> Self {
        self.max_convex_deviation = value;
        self
    }

    pub fn with_min_area_holes(mut self, value: f64) -> Self {
        self.min_area_holes = value;
        self
    }

    pub fn with_sliver_ratio(mut self, value: f64) -> Self {
        self.sliver_ratio = value;
        self
    }

    pub fn with_min_area_intersection(mut self, value: f64) -> Self {
        self.min_area_intersection = value;
        self
    }

    pub fn with_error_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.error_path = Some(path.into());
        self
    }

    pub fn with_area_metric(mut self, metric: AreaMetric) -> Self {
        self.area_metric = metric;
        self
    }
}

impl FromStr for ValidationConfig {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upper_snake_keys() {
        let config = ValidationConfig::parse(
            r#"
MAX_CONVEX_DEVIATION = 0.5
MIN_AREA_HOLES = 10.0
SLIVER_RATIO = 0.2
MIN_AREA_INTERSECTION = 0.1
ERROR_PATH = "build/errors"
AREA_METRIC = "planar"
"#,
        )
        .unwrap();

        assert_eq!(config.max_convex_deviation, 0.5);
        assert_eq!(config.min_area_holes, 10.0);
        assert_eq!(config.sliver_ratio, 0.2);
        assert_eq!(config.min_area_intersection, 0.1);
        assert_eq!(config.error_path, Some(PathBuf::from("build/errors")));
        assert_eq!(config.area_metric, AreaMetric::Planar);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = ValidationConfig::parse("MIN_AREA_INTERSECTION = 1.0").unwrap();
        assert_eq!(config.max_convex_deviation, 0.708);
        assert_eq!(config.area_metric, AreaMetric::Geodesic);
        assert!(config.error_path.is_none());
    }

    #[test]
    fn test_out_of_range_deviation_rejected() {
        let err = ValidationConfig::parse("MAX_CONVEX_DEVIATION = 1.5").unwrap_err();
        assert!(matches!(err, LoadError::InvalidConfig(_)));
    }

    #[test]
    fn test_negative_area_rejected() {
        let err = ValidationConfig::parse("MIN_AREA_HOLES = -1.0").unwrap_err();
        assert!(err.to_string().contains("MIN_AREA_HOLES"));
    }

    #[test]
    fn test_missing_file() {
        let err = ValidationConfig::from_file("/nonexistent/zonelint.toml").unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(_)));
    }
}
