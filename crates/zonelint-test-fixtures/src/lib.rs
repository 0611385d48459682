//! Test fixtures for zonelint
//!
//! Provides small, hand-checkable zone worlds on disk: a `world.geojson`, a
//! planar `zonelint.toml` and a `zones/` registry directory. Every world
//! except [`FixtureType::Valid`] violates exactly one check.

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Test fixture categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureType {
    Valid,
    NullGeometry,
    MissingProperties,
    ExcessiveComplexity,
    UnregisteredZone,
    Gap,
    AdjacentDuplicate,
    Overlap,
}

/// Zone present in a world but never registered.
pub const UNREGISTERED_ZONE: &str = "XX";

/// Planar thresholds matching the unit-square geometry of the fixtures.
pub const PLANAR_CONFIG: &str = r#"MAX_CONVEX_DEVIATION = 0.708
MIN_AREA_HOLES = 0.5
SLIVER_RATIO = 0.1
MIN_AREA_INTERSECTION = 0.1
AREA_METRIC = "planar"
"#;

/// Paths of a materialized fixture world.
#[derive(Debug, Clone)]
pub struct FixtureWorld {
    pub root: PathBuf,
    pub world: PathBuf,
    pub config: PathBuf,
    pub zones: PathBuf,
    pub error_path: PathBuf,
}

/// Main test fixtures provider
pub struct TestFixtures {
    temp_dir: Option<tempfile::TempDir>,
}

impl Default for TestFixtures {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixtures {
    pub fn new() -> Self {
        Self { temp_dir: None }
    }

    /// Create a temporary directory holding the requested world.
    ///
    /// The directory lives as long as this `TestFixtures`.
    pub fn setup(&mut self, fixture_type: FixtureType) -> FixtureWorld {
        let dir = tempfile::tempdir().unwrap();
        let world = write_world(dir.path(), &world_features(fixture_type));
        self.temp_dir = Some(dir);
        world
    }
}

/// Write the given features as a complete fixture world under `base`.
///
/// Every zoneName except [`UNREGISTERED_ZONE`] gets a registry entry.
pub fn write_world(base: &Path, features: &[Value]) -> FixtureWorld {
    let world = base.join("world.geojson");
    let config = base.join("zonelint.toml");
    let zones = base.join("zones");
    let error_path = base.join("errors");

    let collection = json!({ "type": "FeatureCollection", "features": features });
    fs::write(&world, serde_json::to_string_pretty(&collection).unwrap()).unwrap();

    let config_content = format!(
        "{}ERROR_PATH = {:?}\n",
        PLANAR_CONFIG,
        error_path.display().to_string()
    );
    fs::write(&config, config_content).unwrap();

    fs::create_dir_all(&zones).unwrap();
    for feature in features {
        let Some(zone_name) = feature["properties"]["zoneName"].as_str() else {
            continue;
        };
        if zone_name.is_empty() || zone_name == UNREGISTERED_ZONE {
            continue;
        }
        let metadata = json!({
            "bounding_box": bounding_box(&feature["geometry"]),
            "timezone": "UTC",
        });
        fs::write(
            zones.join(format!("{}.yaml", zone_name)),
            serde_yaml::to_string(&metadata).unwrap(),
        )
        .unwrap();
    }

    FixtureWorld {
        root: base.to_path_buf(),
        world,
        config,
        zones,
        error_path,
    }
}

/// Closed ring for the axis-aligned rectangle `[x0, x1] × [y0, y1]`.
pub fn rect_ring(x0: f64, y0: f64, x1: f64, y1: f64) -> Value {
    json!([[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]])
}

pub fn rect_polygon(x0: f64, y0: f64, x1: f64, y1: f64) -> Value {
    json!({ "type": "Polygon", "coordinates": [rect_ring(x0, y0, x1, y1)] })
}

pub fn feature(geometry: Value, properties: Value) -> Value {
    json!({ "type": "Feature", "geometry": geometry, "properties": properties })
}

pub fn zone_feature(zone_name: &str, country_key: &str, geometry: Value) -> Value {
    feature(
        geometry,
        json!({ "zoneName": zone_name, "countryKey": country_key, "isCombined": false }),
    )
}

pub fn combined_feature(zone_name: &str, country_key: &str, geometry: Value) -> Value {
    feature(
        geometry,
        json!({ "zoneName": zone_name, "countryKey": country_key, "isCombined": true }),
    )
}

/// A valid 2x2 world: two standalone zones below a combined country.
fn valid_features() -> Vec<Value> {
    vec![
        zone_feature("A", "A", rect_polygon(0.0, 0.0, 1.0, 1.0)),
        zone_feature("B", "B", rect_polygon(1.0, 0.0, 2.0, 1.0)),
        combined_feature("DK", "DK", rect_polygon(0.0, 1.0, 2.0, 2.0)),
        zone_feature("DK-DK1", "DK", rect_polygon(0.0, 1.0, 1.0, 2.0)),
        zone_feature("DK-DK2", "DK", rect_polygon(1.0, 1.0, 2.0, 2.0)),
    ]
}

pub fn world_features(fixture_type: FixtureType) -> Vec<Value> {
    let mut features = valid_features();

    match fixture_type {
        FixtureType::Valid => {}
        FixtureType::NullGeometry => {
            features.push(feature(
                Value::Null,
                json!({ "zoneName": "C", "countryKey": "C" }),
            ));
        }
        FixtureType::MissingProperties => {
            features.push(feature(rect_polygon(5.0, 0.0, 6.0, 1.0), json!({})));
        }
        FixtureType::ExcessiveComplexity => {
            let comb = json!({
                "type": "Polygon",
                "coordinates": [[
                    [10.0, 0.0], [20.0, 0.0], [20.0, 10.0], [19.0, 10.0], [19.0, 1.0],
                    [11.0, 1.0], [11.0, 10.0], [10.0, 10.0], [10.0, 0.0]
                ]]
            });
            features.push(zone_feature("C", "C", comb));
        }
        FixtureType::UnregisteredZone => {
            features.push(zone_feature(
                UNREGISTERED_ZONE,
                UNREGISTERED_ZONE,
                rect_polygon(5.0, 0.0, 6.0, 1.0),
            ));
        }
        FixtureType::Gap => {
            // Four zones framing an uncovered 1x1 square at [6, 7] × [1, 2].
            features.push(zone_feature("S", "S", rect_polygon(5.0, 0.0, 8.0, 1.0)));
            features.push(zone_feature("N", "N", rect_polygon(5.0, 2.0, 8.0, 3.0)));
            features.push(zone_feature("W", "W", rect_polygon(5.0, 1.0, 6.0, 2.0)));
            features.push(zone_feature("E", "E", rect_polygon(7.0, 1.0, 8.0, 2.0)));
        }
        FixtureType::AdjacentDuplicate => {
            features.push(zone_feature("C", "C", rect_polygon(5.0, 0.0, 6.0, 1.0)));
            features.push(zone_feature("C", "C", rect_polygon(6.0, 0.0, 7.0, 1.0)));
        }
        FixtureType::Overlap => {
            features.push(zone_feature("C", "C", rect_polygon(5.0, 0.0, 6.0, 1.0)));
            features.push(zone_feature("D", "D", rect_polygon(5.5, 0.0, 6.5, 1.0)));
        }
    }

    features
}

fn bounding_box(geometry: &Value) -> Value {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    collect_positions(&geometry["coordinates"], &mut xs, &mut ys);
    if xs.is_empty() {
        return Value::Null;
    }
    let min = |v: &[f64]| v.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = |v: &[f64]| v.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    json!([[min(&xs), min(&ys)], [max(&xs), max(&ys)]])
}

fn collect_positions(value: &Value, xs: &mut Vec<f64>, ys: &mut Vec<f64>) {
    let Some(items) = value.as_array() else {
        return;
    };
    match (items.first().and_then(Value::as_f64), items.get(1).and_then(Value::as_f64)) {
        (Some(x), Some(y)) => {
            xs.push(x);
            ys.push(y);
        }
        _ => items.iter().for_each(|item| collect_positions(item, xs, ys)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_writes_world_files() {
        let mut fixtures = TestFixtures::new();
        let world = fixtures.setup(FixtureType::Valid);

        assert!(world.world.exists());
        assert!(world.config.exists());
        assert!(world.zones.join("DK-DK1.yaml").exists());
        assert!(!world.error_path.exists());
    }

    #[test]
    fn test_unregistered_zone_has_no_registry_entry() {
        let mut fixtures = TestFixtures::new();
        let world = fixtures.setup(FixtureType::UnregisteredZone);
        assert!(!world.zones.join(format!("{}.yaml", UNREGISTERED_ZONE)).exists());
    }

    #[test]
    fn test_registry_metadata_has_bounding_box() {
        let mut fixtures = TestFixtures::new();
        let world = fixtures.setup(FixtureType::Valid);
        let content = fs::read_to_string(world.zones.join("B.yaml")).unwrap();
        let metadata: Value = serde_yaml::from_str(&content).unwrap();
        assert_eq!(metadata["bounding_box"], json!([[1.0, 0.0], [2.0, 1.0]]));
    }
}
