//! Error types for zone validation
//!
//! [`ValidationError`] carries one variant per failing check category plus the
//! artifact I/O failure. Loading the dataset, configuration or registry fails
//! with [`LoadError`] instead, so callers can tell a bad input file apart from
//! an invalid dataset.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ValidationError>;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Null geometry in {} zone(s): {}", .0.len(), .0.join(", "))]
    NullGeometry(Vec<String>),

    #[error("Missing zoneName and countryKey on feature(s) at index {}", join_indices(.0))]
    MissingProperties(Vec<usize>),

    #[error("Excessive complexity in {} zone(s): {}", .0.len(), .0.join(", "))]
    ExcessiveComplexity(Vec<String>),

    #[error("Zone(s) not found in the zone registry: {}", .0.join(", "))]
    ZoneNotRegistered(Vec<String>),

    #[error("{count} gap(s) detected in the dissolved zone coverage{}", artifact_suffix(.artifact))]
    GapDetected {
        count: usize,
        artifact: Option<PathBuf>,
    },

    #[error("Adjacent or overlapping polygons share a zoneName: {}", .0.join(", "))]
    DuplicateAdjacentZone(Vec<String>),

    #[error("Zones '{first}' and '{second}' overlap by {area}")]
    OverlapDetected {
        first: String,
        second: String,
        area: f64,
    },

    #[error("Failed to write diagnostic artifact {path}: {source}")]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn artifact_suffix(artifact: &Option<PathBuf>) -> String {
    match artifact {
        Some(path) => format!(" (written to {})", path.display()),
        None => String::new(),
    }
}

impl ValidationError {
    /// The check category that raised this error, if any.
    pub fn category(&self) -> Option<Category> {
        match self {
            ValidationError::NullGeometry(_) => Some(Category::NullGeometry),
            ValidationError::MissingProperties(_) => Some(Category::MissingProperties),
            ValidationError::ExcessiveComplexity(_) => Some(Category::ExcessiveComplexity),
            ValidationError::ZoneNotRegistered(_) => Some(Category::ZoneNotRegistered),
            ValidationError::GapDetected { .. } => Some(Category::GapDetected),
            ValidationError::DuplicateAdjacentZone(_) => Some(Category::DuplicateAdjacentZone),
            ValidationError::OverlapDetected { .. } => Some(Category::OverlapDetected),
            ValidationError::Artifact { .. } => None,
        }
    }
}

/// Failure category of a validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    NullGeometry,
    MissingProperties,
    ExcessiveComplexity,
    ZoneNotRegistered,
    GapDetected,
    DuplicateAdjacentZone,
    OverlapDetected,
}

impl Category {
    /// Process exit status a command-line caller should use for this category.
    pub fn exit_code(&self) -> i32 {
        match self {
            Category::NullGeometry => 10,
            Category::MissingProperties => 11,
            Category::ExcessiveComplexity => 12,
            Category::ZoneNotRegistered => 13,
            Category::GapDetected => 14,
            Category::DuplicateAdjacentZone => 15,
            Category::OverlapDetected => 16,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::NullGeometry => write!(f, "NULL_GEOMETRY"),
            Category::MissingProperties => write!(f, "MISSING_PROPERTIES"),
            Category::ExcessiveComplexity => write!(f, "EXCESSIVE_COMPLEXITY"),
            Category::ZoneNotRegistered => write!(f, "ZONE_NOT_REGISTERED"),
            Category::GapDetected => write!(f, "GAP_DETECTED"),
            Category::DuplicateAdjacentZone => write!(f, "DUPLICATE_ADJACENT_ZONE"),
            Category::OverlapDetected => write!(f, "OVERLAP_DETECTED"),
        }
    }
}

/// Errors raised while loading validation inputs from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}
