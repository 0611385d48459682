use super::{Check, CheckContext, Offender};
use crate::error::Category;
use crate::geometry;
use geo::{MultiPolygon, Polygon};
use std::collections::BTreeMap;
use tracing::debug;

/// Detects zones whose polygons touch or overlap each other.
///
/// A zone may consist of several disjoint polygons, but adjacent ones must be
/// merged before publishing. Dissolving the zone's polygons and getting fewer
/// of them back means at least two were adjacent.
pub struct DuplicateNeighborDetector;

impl Check for DuplicateNeighborDetector {
    fn name(&self) -> &'static str {
        "duplicate-neighbors"
    }

    fn category(&self) -> Category {
        Category::DuplicateAdjacentZone
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Offender> {
        let mut zones: BTreeMap<&str, Vec<Polygon<f64>>> = BTreeMap::new();
        for feature in ctx.dataset.polygon_features() {
            let (Some(zone_name), Some(polygons)) = (feature.zone_name(), feature.polygons())
            else {
                continue;
            };
            zones.entry(zone_name).or_default().extend(polygons);
        }

        zones
            .into_iter()
            .filter(|(_, polygons)| polygons.len() > 1)
            .filter_map(|(zone_name, polygons)| {
                let parts: Vec<MultiPolygon<f64>> = polygons
                    .into_iter()
                    .map(|p| MultiPolygon::new(vec![p]))
                    .collect();
                let dissolved = geometry::dissolve(&parts);
                debug!(
                    "Zone {} dissolved from {} to {} polygons",
                    zone_name,
                    parts.len(),
                    dissolved.0.len()
                );
                (dissolved.0.len() < parts.len()).then(|| Offender::Zone {
                    zone_name: zone_name.to_string(),
                })
            })
            .collect()
    }
}
