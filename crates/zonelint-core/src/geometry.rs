//! Geometry primitives used by the checks.
//!
//! Thin wrappers over the `geo` crate so each check reads in terms of the
//! operations it needs (area, hull, dissolve, intersection) and so the
//! planar/geodesic choice is made in one place.
//!
//! All polygonal inputs are taken as [`MultiPolygon`]; single polygons are
//! lifted by [`crate::model::Feature::polygons`].

use crate::config::AreaMetric;
use geo::{
    Area, BooleanOps, BoundingRect, ConvexHull, CoordsIter, Euclidean, Geodesic, GeodesicArea,
    Length, MultiPolygon, Polygon, Rect,
};

/// Area of a polygonal geometry, excluding its holes.
pub fn area(geometry: &MultiPolygon<f64>, metric: AreaMetric) -> f64 {
    match metric {
        AreaMetric::Planar => geometry.unsigned_area(),
        AreaMetric::Geodesic => geometry.geodesic_area_unsigned(),
    }
}

pub fn polygon_area(polygon: &Polygon<f64>, metric: AreaMetric) -> f64 {
    match metric {
        AreaMetric::Planar => polygon.unsigned_area(),
        AreaMetric::Geodesic => polygon.geodesic_area_unsigned(),
    }
}

/// Total ring length of a polygon: exterior plus every interior.
pub fn perimeter(polygon: &Polygon<f64>, metric: AreaMetric) -> f64 {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| match metric {
            AreaMetric::Planar => ring.length::<Euclidean>(),
            AreaMetric::Geodesic => ring.length::<Geodesic>(),
        })
        .sum()
}

/// Polsby–Popper compactness `4πA / P²`.
///
/// 1.0 for a circle, about 0.785 for a square, approaching 0 for thin shapes.
/// Degenerate polygons (zero perimeter) score 0.
pub fn compactness(polygon: &Polygon<f64>, metric: AreaMetric) -> f64 {
    let perimeter = perimeter(polygon, metric);
    if !(perimeter > 0.0) {
        return 0.0;
    }
    4.0 * std::f64::consts::PI * polygon_area(polygon, metric) / (perimeter * perimeter)
}

pub fn bounding_box(geometry: &MultiPolygon<f64>) -> Option<Rect<f64>> {
    geometry.bounding_rect()
}

pub fn bounding_box_polygon(rect: &Rect<f64>) -> Polygon<f64> {
    rect.to_polygon()
}

/// Convex hull of a polygonal geometry.
///
/// Returns `None` when no hull with positive area exists: empty input, or
/// collinear/duplicated points.
pub fn convex_hull(geometry: &MultiPolygon<f64>) -> Option<Polygon<f64>> {
    if geometry.coords_count() < 3 {
        return None;
    }
    let hull = geometry.convex_hull();
    let hull_area = hull.unsigned_area();
    (hull_area.is_finite() && hull_area > 0.0).then_some(hull)
}

/// Normalized concavity score `(area(H) - area(F)) / area(H)` in [0, 1).
///
/// `None` when the hull cannot be computed.
pub fn convex_hull_deviation(geometry: &MultiPolygon<f64>, metric: AreaMetric) -> Option<f64> {
    let hull = convex_hull(geometry)?;
    let hull_area = polygon_area(&hull, metric);
    if !(hull_area.is_finite() && hull_area > 0.0) {
        return None;
    }
    let deviation = (hull_area - area(geometry, metric)) / hull_area;
    // Rounding can push a convex input marginally below zero.
    Some(deviation.max(0.0))
}

/// Union of all inputs, merging adjacent and overlapping polygons.
pub fn dissolve<'a, I>(geometries: I) -> MultiPolygon<f64>
where
    I: IntoIterator<Item = &'a MultiPolygon<f64>>,
{
    geometries
        .into_iter()
        .fold(MultiPolygon::new(Vec::new()), |acc, next| {
            if acc.0.is_empty() {
                next.clone()
            } else {
                acc.union(next)
            }
        })
}

/// Intersection of two polygonal geometries, `None` when they do not share area.
pub fn intersect(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Option<MultiPolygon<f64>> {
    let shared = a.intersection(b);
    (!shared.0.is_empty()).then_some(shared)
}

/// Interior rings of a dissolved geometry, each as a standalone polygon.
pub fn holes(geometry: &MultiPolygon<f64>) -> Vec<Polygon<f64>> {
    geometry
        .iter()
        .flat_map(|polygon| polygon.interiors().iter())
        .map(|ring| Polygon::new(ring.clone(), Vec::new()))
        .collect()
}
