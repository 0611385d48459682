use super::{Check, CheckContext, Offender};
use crate::error::Category;
use crate::geometry;
use crate::model::Feature;
use geo::{Intersects, MultiPolygon, Polygon};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Pairwise overlap detection between zones.
///
/// Every unordered pair of candidate features is compared once. Bounding boxes
/// are tested first; the polygon intersection is only computed on a bbox hit.
/// The check stops at the first pair overlapping by at least
/// `MIN_AREA_INTERSECTION`. Pairs that only touch never fail.
///
/// Combined (aggregate) features are skipped, as is every feature belonging
/// to a country that has one: the aggregate overlaps its constituents by
/// construction.
pub struct OverlapDetector;

struct Candidate<'a> {
    feature: &'a Feature,
    polygons: MultiPolygon<f64>,
    bbox: Polygon<f64>,
}

impl OverlapDetector {
    /// Country keys of every combined feature.
    fn combined_countries<'a>(features: &'a [Feature]) -> HashSet<&'a str> {
        features
            .iter()
            .filter(|f| f.properties.is_combined)
            .filter_map(|f| f.country_key())
            .collect()
    }
}

impl Check for OverlapDetector {
    fn name(&self) -> &'static str {
        "overlaps"
    }

    fn category(&self) -> Category {
        Category::OverlapDetected
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Offender> {
        let metric = ctx.config.area_metric;
        let excluded = Self::combined_countries(ctx.dataset.features());

        let candidates: Vec<Candidate<'_>> = ctx
            .dataset
            .polygon_features()
            .filter(|f| !f.properties.is_combined)
            .filter(|f| !f.country_key().is_some_and(|key| excluded.contains(key)))
            .filter_map(|feature| {
                let polygons = feature.polygons()?;
                let bbox = geometry::bounding_box_polygon(&geometry::bounding_box(&polygons)?);
                Some(Candidate {
                    feature,
                    polygons,
                    bbox,
                })
            })
            .collect();
        debug!(
            "Comparing {} features for overlaps ({} combined countries excluded)",
            candidates.len(),
            excluded.len()
        );

        let mut bbox_hits = 0usize;
        for (i, a) in candidates.iter().enumerate() {
            for b in &candidates[i + 1..] {
                if !a.bbox.intersects(&b.bbox) {
                    continue;
                }
                bbox_hits += 1;

                let Some(shared) = geometry::intersect(&a.polygons, &b.polygons) else {
                    continue;
                };
                let area = geometry::area(&shared, metric);
                trace!(
                    "{} and {} share {}",
                    a.feature.label(),
                    b.feature.label(),
                    area
                );
                if area > 0.0 && area >= ctx.config.min_area_intersection {
                    return vec![Offender::Overlap {
                        first: a.feature.label(),
                        second: b.feature.label(),
                        area,
                    }];
                }
            }
        }

        debug!("{} bounding box hits, no overlaps", bbox_hits);
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::*;
    use crate::config::{AreaMetric, ValidationConfig};
    use crate::registry::ZoneRegistry;

    fn run(features: Vec<Feature>, min_area: f64) -> Vec<Offender> {
        let dataset = dataset(features);
        let config = ValidationConfig::default()
            .with_area_metric(AreaMetric::Planar)
            .with_min_area_intersection(min_area);
        let registry = ZoneRegistry::new();
        let ctx = CheckContext::new(&dataset, &config, &registry);
        OverlapDetector.run(&ctx)
    }

    #[test]
    fn test_half_overlap_detected() {
        let offenders = run(
            vec![
                zone("A", unit_square(0.0, 0.0)),
                zone("B", unit_square(0.5, 0.0)),
            ],
            0.1,
        );
        assert_eq!(offenders.len(), 1);
        match &offenders[0] {
            Offender::Overlap {
                first,
                second,
                area,
            } => {
                assert_eq!(first, "A");
                assert_eq!(second, "B");
                assert!((area - 0.5).abs() < 1e-6);
            }
            other => panic!("unexpected offender {other:?}"),
        }
    }

    #[test]
    fn test_overlap_below_threshold_passes() {
        let offenders = run(
            vec![
                zone("A", unit_square(0.0, 0.0)),
                zone("B", unit_square(0.95, 0.0)),
            ],
            0.1,
        );
        assert!(offenders.is_empty());
    }

    #[test]
    fn test_overlap_equal_to_threshold_fails() {
        let offenders = run(
            vec![
                zone("A", rect(0.0, 0.0, 2.0, 2.0)),
                zone("B", rect(1.0, 0.0, 3.0, 2.0)),
            ],
            2.0,
        );
        assert_eq!(offenders.len(), 1);
    }

    #[test]
    fn test_overlap_just_under_threshold_passes() {
        let offenders = run(
            vec![
                zone("A", rect(0.0, 0.0, 2.0, 2.0)),
                zone("B", rect(1.0, 0.0, 3.0, 2.0)),
            ],
            2.001,
        );
        assert!(offenders.is_empty());
    }

    #[test]
    fn test_combined_feature_without_country_key_is_exempt() {
        let offenders = run(
            vec![
                Feature::new(0, rect(0.0, 0.0, 2.0, 1.0))
                    .with_zone_name("DK")
                    .combined(),
                zone("DK-DK1", unit_square(0.0, 0.0)),
                zone("DK-DK2", unit_square(1.0, 0.0)),
            ],
            0.1,
        );
        assert!(offenders.is_empty());
    }

    #[test]
    fn test_touching_zones_pass() {
        let offenders = run(
            vec![
                zone("A", unit_square(0.0, 0.0)),
                zone("B", unit_square(1.0, 0.0)),
            ],
            0.0,
        );
        assert!(offenders.is_empty());
    }

    #[test]
    fn test_combined_country_is_exempt() {
        let offenders = run(
            vec![
                Feature::new(0, rect(0.0, 0.0, 2.0, 1.0))
                    .with_zone_name("DK")
                    .with_country_key("DK")
                    .combined(),
                Feature::new(0, unit_square(0.0, 0.0))
                    .with_zone_name("DK-DK1")
                    .with_country_key("DK"),
                Feature::new(0, unit_square(1.0, 0.0))
                    .with_zone_name("DK-DK2")
                    .with_country_key("DK"),
            ],
            0.1,
        );
        assert!(offenders.is_empty());
    }

    #[test]
    fn test_exemption_is_per_country() {
        let offenders = run(
            vec![
                Feature::new(0, rect(0.0, 0.0, 2.0, 1.0))
                    .with_zone_name("DK")
                    .with_country_key("DK")
                    .combined(),
                Feature::new(0, unit_square(5.0, 0.0))
                    .with_zone_name("SE-SE1")
                    .with_country_key("SE"),
                Feature::new(0, unit_square(5.5, 0.0))
                    .with_zone_name("SE-SE2")
                    .with_country_key("SE"),
            ],
            0.1,
        );
        assert_eq!(offenders.len(), 1);
    }

    #[test]
    fn test_stops_at_first_offending_pair() {
        let offenders = run(
            vec![
                zone("A", unit_square(0.0, 0.0)),
                zone("B", unit_square(0.5, 0.0)),
                zone("C", unit_square(10.0, 0.0)),
                zone("D", unit_square(10.5, 0.0)),
            ],
            0.1,
        );
        assert_eq!(offenders.len(), 1);
    }
}
