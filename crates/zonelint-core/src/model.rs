//! Zone features and datasets

use geo::{CoordsIter, Geometry, MultiPolygon};

/// Properties attached to every zone feature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneProperties {
    pub zone_name: Option<String>,
    pub country_key: Option<String>,
    /// Aggregate zone expected to overlap its sibling zones.
    pub is_combined: bool,
}

#[derive(Debug, Clone)]
pub struct Feature {
    /// Position in the source dataset.
    pub index: usize,
    pub geometry: Option<Geometry<f64>>,
    pub properties: ZoneProperties,
}

impl Feature {
    pub fn new(index: usize, geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            index,
            geometry: Some(geometry.into()),
            properties: ZoneProperties::default(),
        }
    }

    /// A feature whose geometry is absent.
    pub fn without_geometry(index: usize) -> Self {
        Self {
            index,
            geometry: None,
            properties: ZoneProperties::default(),
        }
    }

    pub fn with_zone_name(mut self, zone_name: impl Into<String>) -> Self {
        self.properties.zone_name = Some(zone_name.into());
        self
    }

    pub fn with_country_key(mut self, country_key: impl Into<String>) -> Self {
        self.properties.country_key = Some(country_key.into());
        self
    }

    pub fn combined(mut self) -> Self {
        self.properties.is_combined = true;
        self
    }

    /// Non-empty zoneName.
    pub fn zone_name(&self) -> Option<&str> {
        non_empty(&self.properties.zone_name)
    }

    /// Non-empty countryKey.
    pub fn country_key(&self) -> Option<&str> {
        non_empty(&self.properties.country_key)
    }

    /// Human-readable identifier used in log lines and errors.
    pub fn label(&self) -> String {
        self.zone_name()
            .or_else(|| self.country_key())
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", self.index))
    }

    pub fn coordinate_count(&self) -> usize {
        self.geometry
            .as_ref()
            .map(|g| g.coords_count())
            .unwrap_or(0)
    }

    pub fn is_polygonal(&self) -> bool {
        matches!(
            self.geometry,
            Some(Geometry::Polygon(_)) | Some(Geometry::MultiPolygon(_))
        )
    }

    /// The geometry as a multipolygon, for Polygon and MultiPolygon features.
    pub fn polygons(&self) -> Option<MultiPolygon<f64>> {
        match self.geometry.as_ref()? {
            Geometry::Polygon(p) => Some(MultiPolygon::new(vec![p.clone()])),
            Geometry::MultiPolygon(mp) => Some(mp.clone()),
            _ => None,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Ordered, immutable collection of zone features.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    features: Vec<Feature>,
}

impl Dataset {
    /// Build a dataset, renumbering feature indices to their position.
    pub fn new(features: Vec<Feature>) -> Self {
        let features = features
            .into_iter()
            .enumerate()
            .map(|(index, mut feature)| {
                feature.index = index;
                feature
            })
            .collect();
        Self { features }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features with Polygon or MultiPolygon geometry.
    pub fn polygon_features(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter().filter(|f| f.is_polygonal())
    }
}

impl FromIterator<Feature> for Dataset {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, LineString, Point, Polygon};

    #[test]
    fn test_label_falls_back_to_country_then_index() {
        let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];

        let named = Feature::new(0, square.clone()).with_zone_name("DE");
        assert_eq!(named.label(), "DE");

        let country = Feature::new(1, square.clone())
            .with_zone_name("  ")
            .with_country_key("DK");
        assert_eq!(country.label(), "DK");

        let anonymous = Feature::new(4, square);
        assert_eq!(anonymous.label(), "#4");
    }

    #[test]
    fn test_empty_polygon_has_no_coordinates() {
        let empty = Feature::new(0, Polygon::new(LineString::new(vec![]), vec![]));
        assert_eq!(empty.coordinate_count(), 0);
        assert_eq!(Feature::without_geometry(1).coordinate_count(), 0);
    }

    #[test]
    fn test_only_polygons_are_polygonal() {
        let point = Feature::new(0, Point::new(1.0, 2.0));
        assert!(!point.is_polygonal());
        assert!(point.polygons().is_none());
    }

    #[test]
    fn test_dataset_renumbers_indices() {
        let dataset: Dataset = vec![
            Feature::without_geometry(7),
            Feature::without_geometry(7),
        ]
        .into_iter()
        .collect();
        let indices: Vec<usize> = dataset.features().iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }
}
