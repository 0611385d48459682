use super::{Check, CheckContext, Offender};
use crate::error::{Category, Result, ValidationError};
use crate::geojson::{FeatureCollection, GeoJsonFeature};
use crate::geometry;
use geo::MultiPolygon;
use serde_json::{json, Map};
use std::path::PathBuf;
use tracing::debug;

pub const GAPS_ARTIFACT: &str = "gaps.geojson";

/// Finds uncovered holes in the union of all zones.
///
/// Holes smaller than `MIN_AREA_HOLES` are ignored, as are slivers: holes
/// whose Polsby–Popper compactness `4πA/P²` falls below `SLIVER_RATIO`.
pub struct GapDetector;

impl Check for GapDetector {
    fn name(&self) -> &'static str {
        "gaps"
    }

    fn category(&self) -> Category {
        Category::GapDetected
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Offender> {
        let metric = ctx.config.area_metric;
        let polygons: Vec<MultiPolygon<f64>> = ctx
            .dataset
            .polygon_features()
            .filter_map(|f| f.polygons())
            .collect();

        let dissolved = geometry::dissolve(&polygons);
        let holes = geometry::holes(&dissolved);
        debug!(
            "Dissolved {} features into {} polygons with {} holes",
            polygons.len(),
            dissolved.0.len(),
            holes.len()
        );

        holes
            .into_iter()
            .filter_map(|hole| {
                let area = geometry::polygon_area(&hole, metric);
                if area < ctx.config.min_area_holes {
                    return None;
                }
                let compactness = geometry::compactness(&hole, metric);
                if compactness < ctx.config.sliver_ratio {
                    debug!("Ignoring sliver hole with area {} and compactness {}", area, compactness);
                    return None;
                }
                Some(Offender::Gap {
                    polygon: hole,
                    area,
                    compactness,
                })
            })
            .collect()
    }

    fn write_artifact(
        &self,
        ctx: &CheckContext<'_>,
        offenders: &[Offender],
    ) -> Result<Option<PathBuf>> {
        let Some(dir) = ctx.config.error_path.as_ref() else {
            return Ok(None);
        };

        let features = offenders
            .iter()
            .filter_map(|o| match o {
                Offender::Gap {
                    polygon,
                    area,
                    compactness,
                } => {
                    let mut properties = Map::new();
                    properties.insert("area".to_string(), json!(area));
                    properties.insert("compactness".to_string(), json!(compactness));
                    Some(GeoJsonFeature::polygon(polygon, properties))
                }
                _ => None,
            })
            .collect();

        let path = dir.join(GAPS_ARTIFACT);
        std::fs::create_dir_all(dir)
            .and_then(|_| FeatureCollection::new(features).write(&path))
            .map_err(|source| ValidationError::Artifact {
                path: path.clone(),
                source,
            })?;

        Ok(Some(path))
    }
}
