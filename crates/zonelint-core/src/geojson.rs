//! GeoJSON reading and writing.
//!
//! Only the subset the zone tooling produces is modelled: a FeatureCollection
//! of point, line and polygon geometries (or `null`) with free-form
//! properties. Geometries are converted to `geo` types on load.

use crate::error::LoadError;
use crate::model::{Dataset, Feature, ZoneProperties};
use geo::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// `[x, y]` or `[x, y, z]`; extra ordinates are ignored.
pub type Position = Vec<f64>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<GeoJsonFeature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
}

impl FeatureCollection {
    pub fn new(features: Vec<GeoJsonFeature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

impl GeoJsonFeature {
    pub fn polygon(polygon: &Polygon<f64>, properties: Map<String, Value>) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: Some(GeoJsonGeometry::from(polygon)),
            properties: Some(properties),
        }
    }
}

impl From<&Polygon<f64>> for GeoJsonGeometry {
    fn from(polygon: &Polygon<f64>) -> Self {
        let rings = std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(ring_positions)
            .collect();
        GeoJsonGeometry::Polygon { coordinates: rings }
    }
}

fn ring_positions(ring: &LineString<f64>) -> Vec<Position> {
    ring.coords().map(|c| vec![c.x, c.y]).collect()
}

impl TryFrom<&GeoJsonGeometry> for Geometry<f64> {
    type Error = LoadError;

    fn try_from(geometry: &GeoJsonGeometry) -> Result<Self, Self::Error> {
        let geometry = match geometry {
            // An empty position is the only way to spell an empty point.
            GeoJsonGeometry::Point { coordinates } if coordinates.is_empty() => {
                Geometry::MultiPoint(MultiPoint::new(Vec::new()))
            }
            GeoJsonGeometry::Point { coordinates } => {
                Geometry::Point(Point::from(to_coord(coordinates)?))
            }
            GeoJsonGeometry::MultiPoint { coordinates } => Geometry::MultiPoint(MultiPoint::new(
                coordinates
                    .iter()
                    .map(|p| to_coord(p).map(Point::from))
                    .collect::<Result<_, _>>()?,
            )),
            GeoJsonGeometry::LineString { coordinates } => {
                Geometry::LineString(to_line_string(coordinates)?)
            }
            GeoJsonGeometry::MultiLineString { coordinates } => {
                Geometry::MultiLineString(MultiLineString::new(
                    coordinates
                        .iter()
                        .map(|line| to_line_string(line))
                        .collect::<Result<_, _>>()?,
                ))
            }
            GeoJsonGeometry::Polygon { coordinates } => Geometry::Polygon(to_polygon(coordinates)?),
            GeoJsonGeometry::MultiPolygon { coordinates } => {
                Geometry::MultiPolygon(MultiPolygon::new(
                    coordinates
                        .iter()
                        .map(|rings| to_polygon(rings))
                        .collect::<Result<_, _>>()?,
                ))
            }
        };
        Ok(geometry)
    }
}

fn to_coord(position: &[f64]) -> Result<Coord<f64>, LoadError> {
    match position {
        [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Coord { x: *x, y: *y }),
        _ => Err(LoadError::InvalidGeoJson(format!(
            "invalid position {:?}",
            position
        ))),
    }
}

fn to_line_string(positions: &[Position]) -> Result<LineString<f64>, LoadError> {
    Ok(LineString::new(
        positions
            .iter()
            .map(|p| to_coord(p))
            .collect::<Result<_, _>>()?,
    ))
}

fn to_polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>, LoadError> {
    let mut rings = rings.iter();
    let exterior = match rings.next() {
        Some(ring) => to_line_string(ring)?,
        None => LineString::new(Vec::new()),
    };
    let interiors = rings
        .map(|ring| to_line_string(ring))
        .collect::<Result<_, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn string_property(
    properties: &Map<String, Value>,
    key: &str,
    index: usize,
) -> Result<Option<String>, LoadError> {
    match properties.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(LoadError::InvalidGeoJson(format!(
            "feature {}: property '{}' must be a string, got {}",
            index, key, other
        ))),
    }
}

fn zone_properties(
    properties: Option<&Map<String, Value>>,
    index: usize,
) -> Result<ZoneProperties, LoadError> {
    let Some(properties) = properties else {
        return Ok(ZoneProperties::default());
    };
    let is_combined = match properties.get("isCombined") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            return Err(LoadError::InvalidGeoJson(format!(
                "feature {}: property 'isCombined' must be a boolean, got {}",
                index, other
            )))
        }
    };
    Ok(ZoneProperties {
        zone_name: string_property(properties, "zoneName", index)?,
        country_key: string_property(properties, "countryKey", index)?,
        is_combined,
    })
}

impl FeatureCollection {
    /// Convert into a validation dataset, preserving feature order.
    pub fn to_dataset(&self) -> Result<Dataset, LoadError> {
        if self.kind != "FeatureCollection" {
            return Err(LoadError::InvalidGeoJson(format!(
                "expected a FeatureCollection, got '{}'",
                self.kind
            )));
        }

        let features = self
            .features
            .iter()
            .enumerate()
            .map(|(index, feature)| {
                let geometry = feature
                    .geometry
                    .as_ref()
                    .map(Geometry::try_from)
                    .transpose()?;
                Ok(Feature {
                    index,
                    geometry,
                    properties: zone_properties(feature.properties.as_ref(), index)?,
                })
            })
            .collect::<Result<Vec<_>, LoadError>>()?;

        Ok(Dataset::new(features))
    }
}

pub fn parse_dataset(content: &str) -> Result<Dataset, LoadError> {
    let collection: FeatureCollection = serde_json::from_str(content)?;
    collection.to_dataset()
}

pub fn read_dataset(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    parse_dataset(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use serde_json::json;

    #[test]
    fn test_parse_polygon_features() {
        let content = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                    },
                    "properties": {"zoneName": "DK-DK1", "countryKey": "DK", "isCombined": false}
                },
                {
                    "type": "Feature",
                    "geometry": null,
                    "properties": {"zoneName": "DK"}
                }
            ]
        })
        .to_string();

        let dataset = parse_dataset(&content).unwrap();
        assert_eq!(dataset.len(), 2);

        let first = &dataset.features()[0];
        assert!(first.is_polygonal());
        assert_eq!(first.zone_name(), Some("DK-DK1"));
        assert_eq!(first.country_key(), Some("DK"));
        assert!(!first.properties.is_combined);

        let second = &dataset.features()[1];
        assert!(second.geometry.is_none());
        assert_eq!(second.index, 1);
    }

    #[test]
    fn test_empty_polygon_coordinates_load_as_empty_geometry() {
        let content = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "MultiPolygon", "coordinates": []}, "properties": {"zoneName": "X"}}
        ]}"#;
        let dataset = parse_dataset(content).unwrap();
        assert_eq!(dataset.features()[0].coordinate_count(), 0);
    }

    #[test]
    fn test_non_string_zone_name_rejected() {
        let content = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": null, "properties": {"zoneName": 42}}
        ]}"#;
        let err = parse_dataset(content).unwrap_err();
        assert!(err.to_string().contains("zoneName"));
    }

    #[test]
    fn test_short_position_rejected() {
        let content = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1.0]}, "properties": {}}
        ]}"#;
        assert!(matches!(
            parse_dataset(content),
            Err(LoadError::InvalidGeoJson(_))
        ));
    }

    #[test]
    fn test_wrong_collection_type_rejected() {
        let content = r#"{"type": "Feature", "features": []}"#;
        assert!(parse_dataset(content).is_err());
    }

    #[test]
    fn test_polygon_serializes_as_geojson() {
        let hole = polygon![(x: 1.0, y: 1.0), (x: 2.0, y: 1.0), (x: 2.0, y: 2.0), (x: 1.0, y: 2.0)];
        let mut properties = Map::new();
        properties.insert("area".to_string(), json!(1.0));

        let collection = FeatureCollection::new(vec![GeoJsonFeature::polygon(&hole, properties)]);
        let value: Value = serde_json::from_str(&collection.to_json().unwrap()).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["geometry"]["type"], "Polygon");
        assert_eq!(value["features"][0]["properties"]["area"], 1.0);
        // geo closes rings, so 4 corners become 5 positions.
        assert_eq!(
            value["features"][0]["geometry"]["coordinates"][0]
                .as_array()
                .unwrap()
                .len(),
            5
        );
    }
}
