//! Zone registry: the set of zones known to the rest of the platform.
//!
//! The registry is either a directory of per-zone YAML files
//! (`config/zones/DE.yaml`, ...) where the file stem is the zone name, or a
//! single YAML/JSON document mapping zone names to metadata.

use crate::error::LoadError;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: BTreeMap<String, Value>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, zone_name: impl Into<String>, metadata: Value) {
        self.zones.insert(zone_name.into(), metadata);
    }

    pub fn contains(&self, zone_name: &str) -> bool {
        self.zones.contains_key(zone_name)
    }

    pub fn get(&self, zone_name: &str) -> Option<&Value> {
        self.zones.get(zone_name)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn zone_names(&self) -> impl Iterator<Item = &str> {
        self.zones.keys().map(String::as_str)
    }

    /// Load from a zone directory or a single mapping file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::from_dir(path)
        } else if path.is_file() {
            Self::from_file(path)
        } else {
            Err(LoadError::FileNotFound(path.to_path_buf()))
        }
    }

    /// One `<zoneName>.yaml` (or `.yml`) file per zone, non-recursive.
    pub fn from_dir(dir: &Path) -> Result<Self, LoadError> {
        let mut registry = Self::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                LoadError::io(path, std::io::Error::other(e.to_string()))
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            let is_yaml = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            );
            if !is_yaml {
                continue;
            }
            let Some(zone_name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
            let metadata: Value = serde_yaml::from_str(&content)?;
            registry.insert(zone_name, metadata);
        }

        debug!("Loaded {} zones from {}", registry.len(), dir.display());
        Ok(registry)
    }

    /// A single YAML (or JSON, which YAML accepts) mapping of zone name to metadata.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let registry = Self::parse(&content)?;
        debug!("Loaded {} zones from {}", registry.len(), path.display());
        Ok(registry)
    }

    pub fn parse(content: &str) -> Result<Self, LoadError> {
        let zones: BTreeMap<String, Value> = serde_yaml::from_str(content)?;
        Ok(Self { zones })
    }
}

impl<S: Into<String>> FromIterator<S> for ZoneRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut registry = Self::new();
        for zone_name in iter {
            registry.insert(zone_name, Value::Null);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_from_dir_uses_file_stems() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("DE.yaml"), "timezone: Europe/Berlin\n").unwrap();
        fs::write(temp_dir.path().join("DK-DK1.yml"), "capacity: {}\n").unwrap();
        fs::write(temp_dir.path().join("README.md"), "not a zone").unwrap();

        let registry = ZoneRegistry::load(temp_dir.path()).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("DE"));
        assert!(registry.contains("DK-DK1"));
        assert!(!registry.contains("README"));
        assert_eq!(
            registry.get("DE").and_then(|v| v.get("timezone")).and_then(|v| v.as_str()),
            Some("Europe/Berlin")
        );
    }

    #[test]
    fn test_from_mapping_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("zones.json");
        fs::write(&path, r#"{"FR": {"flag": "fr"}, "ES": {}}"#).unwrap();

        let registry = ZoneRegistry::load(&path).unwrap();
        let names: Vec<&str> = registry.zone_names().collect();
        assert_eq!(names, vec!["ES", "FR"]);
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("DE.yaml"), "key: [unclosed").unwrap();

        let err = ZoneRegistry::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::YamlParse(_)));
    }

    #[test]
    fn test_missing_path() {
        let err = ZoneRegistry::load("/nonexistent/zones").unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(_)));
    }
}
