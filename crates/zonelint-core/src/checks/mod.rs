//! The validation checks.
//!
//! Every check is a pure function of a [`CheckContext`]: it inspects the
//! dataset and returns the offenders it found, or an empty list on success.
//! Turning offenders into an error (and writing diagnostic artifacts) is the
//! pipeline's job.

mod complexity;
mod duplicates;
mod gaps;
mod null_geometry;
mod overlaps;
mod properties;
mod registry;

pub use complexity::ComplexityCheck;
pub use duplicates::DuplicateNeighborDetector;
pub use gaps::GapDetector;
pub use null_geometry::NullGeometryCheck;
pub use overlaps::OverlapDetector;
pub use properties::PropertyCompletenessCheck;
pub use registry::ZoneRegistryCheck;

use crate::config::ValidationConfig;
use crate::error::{Category, Result, ValidationError};
use crate::model::Dataset;
use crate::registry::ZoneRegistry;
use geo::Polygon;
use std::fmt;
use std::path::PathBuf;

/// Read-only inputs shared by all checks of a run.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub dataset: &'a Dataset,
    pub config: &'a ValidationConfig,
    pub registry: &'a ZoneRegistry,
}

impl<'a> CheckContext<'a> {
    pub fn new(
        dataset: &'a Dataset,
        config: &'a ValidationConfig,
        registry: &'a ZoneRegistry,
    ) -> Self {
        Self {
            dataset,
            config,
            registry,
        }
    }
}

/// Something a check objects to.
#[derive(Debug, Clone, PartialEq)]
pub enum Offender {
    /// A single feature, identified by position and label.
    Feature {
        index: usize,
        label: String,
        detail: Option<String>,
    },
    /// A zone as a whole.
    Zone { zone_name: String },
    /// An uncovered hole in the dissolved coverage.
    Gap {
        polygon: Polygon<f64>,
        area: f64,
        compactness: f64,
    },
    /// Two zones sharing more area than tolerated.
    Overlap {
        first: String,
        second: String,
        area: f64,
    },
}

impl fmt::Display for Offender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offender::Feature {
                index,
                label,
                detail: Some(detail),
            } => write!(f, "{} (feature {}): {}", label, index, detail),
            Offender::Feature { index, label, .. } => write!(f, "{} (feature {})", label, index),
            Offender::Zone { zone_name } => write!(f, "{}", zone_name),
            Offender::Gap {
                polygon,
                area,
                compactness,
            } => {
                let anchor = polygon.exterior().0.first();
                match anchor {
                    Some(c) => write!(
                        f,
                        "hole near ({:.4}, {:.4}) with area {:.3} and compactness {:.3}",
                        c.x, c.y, area, compactness
                    ),
                    None => write!(f, "hole with area {:.3}", area),
                }
            }
            Offender::Overlap {
                first,
                second,
                area,
            } => write!(f, "{} overlaps {} by {:.3}", first, second, area),
        }
    }
}

pub trait Check {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    fn category(&self) -> Category;

    /// Inspect the dataset; an empty result means the check passed.
    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Offender>;

    /// Persist a diagnostic artifact for the given offenders.
    ///
    /// Returns the artifact path when one was written.
    fn write_artifact(
        &self,
        _ctx: &CheckContext<'_>,
        _offenders: &[Offender],
    ) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

/// Build the category error for a failed check.
pub fn into_error(
    category: Category,
    offenders: &[Offender],
    artifact: Option<PathBuf>,
) -> ValidationError {
    let labels = || {
        offenders
            .iter()
            .filter_map(|o| match o {
                Offender::Feature { label, .. } => Some(label.clone()),
                Offender::Zone { zone_name } => Some(zone_name.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
    };

    match category {
        Category::NullGeometry => ValidationError::NullGeometry(labels()),
        Category::MissingProperties => ValidationError::MissingProperties(
            offenders
                .iter()
                .filter_map(|o| match o {
                    Offender::Feature { index, .. } => Some(*index),
                    _ => None,
                })
                .collect(),
        ),
        Category::ExcessiveComplexity => ValidationError::ExcessiveComplexity(labels()),
        Category::ZoneNotRegistered => ValidationError::ZoneNotRegistered(labels()),
        Category::GapDetected => ValidationError::GapDetected {
            count: offenders.len(),
            artifact,
        },
        Category::DuplicateAdjacentZone => ValidationError::DuplicateAdjacentZone(labels()),
        Category::OverlapDetected => match offenders.first() {
            Some(Offender::Overlap {
                first,
                second,
                area,
            }) => ValidationError::OverlapDetected {
                first: first.clone(),
                second: second.clone(),
                area: *area,
            },
            _ => ValidationError::OverlapDetected {
                first: String::new(),
                second: String::new(),
                area: 0.0,
            },
        },
    }
}

/// The seven checks in pipeline order.
pub fn default_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(NullGeometryCheck),
        Box::new(PropertyCompletenessCheck),
        Box::new(ComplexityCheck),
        Box::new(ZoneRegistryCheck),
        Box::new(GapDetector),
        Box::new(DuplicateNeighborDetector),
        Box::new(OverlapDetector),
    ]
}
