use crate::codec::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default number of units per bulk quantity (grams per kilogram).
pub const UNITS_PER_QUANTITY: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub name: String,
    pub unit: String,
    pub price_per_unit: f64,
}

impl Material {
    pub fn new(name: impl Into<String>, unit: impl Into<String>, price_per_unit: f64) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            price_per_unit,
        }
    }

    /// Prices a material from a bulk purchase, e.g. 20.00 for one 1kg spool
    /// priced per gram is `from_bulk(.., 20.0, 1.0, 1000.0)` = 0.02 per unit.
    pub fn from_bulk(
        name: impl Into<String>,
        unit: impl Into<String>,
        total_price: f64,
        quantity: f64,
        units_per_quantity: f64,
    ) -> Self {
        Self::new(name, unit, total_price / (quantity * units_per_quantity))
    }
}

/// Every known material by name, persisted as `materials.toml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialRegistry {
    materials: BTreeMap<String, Material>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    pub fn insert(&mut self, material: Material) -> Option<Material> {
        self.materials.insert(material.name.clone(), material)
    }

    pub fn remove(&mut self, name: &str) -> Option<Material> {
        self.materials.remove(name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MaterialRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub unit: String,
    #[serde(default)]
    pub price_per_unit: f64,
}

impl Document for MaterialRegistry {
    type Record = BTreeMap<String, MaterialRecord>;

    fn decode(record: Self::Record, _path: &Path) -> Result<Self, String> {
        let mut registry = MaterialRegistry::new();
        for (key, entry) in record {
            let name = entry.name.unwrap_or_else(|| key.clone());
            if name != key {
                return Err(format!("material '{}' is stored under '{}'", name, key));
            }
            registry.insert(Material::new(name, entry.unit, entry.price_per_unit));
        }
        Ok(registry)
    }

    fn encode(&self) -> Self::Record {
        self.materials
            .iter()
            .map(|(key, material)| {
                (
                    key.clone(),
                    MaterialRecord {
                        name: Some(material.name.clone()),
                        unit: material.unit.clone(),
                        price_per_unit: material.price_per_unit,
                    },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::error::PrintedError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn from_bulk_divides_by_total_units() {
        let pla = Material::from_bulk("PLA", "g", 20.0, 1.0, UNITS_PER_QUANTITY);
        assert!((pla.price_per_unit - 0.02).abs() < 1e-12);

        let resin = Material::from_bulk("Resin", "ml", 45.0, 0.5, UNITS_PER_QUANTITY);
        assert!((resin.price_per_unit - 0.09).abs() < 1e-12);
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = MaterialRegistry::new();
        registry.insert(Material::new("PLA", "g", 0.02));
        registry.insert(Material::new("ABS", "g", 0.03));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["ABS", "PLA"]);
    }

    #[test]
    fn missing_file_is_an_empty_registry() {
        let dir = TempDir::new().unwrap();
        let registry: MaterialRegistry =
            codec::load(&dir.path().join("materials.toml"), Some(MaterialRegistry::new()))
                .unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn reads_entries_without_name_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("materials.toml");
        fs::write(&path, "[PLA]\nunit = \"g\"\nprice_per_unit = 0.02\n").unwrap();

        let registry: MaterialRegistry = codec::load(&path, None).unwrap();
        assert_eq!(registry.get("PLA"), Some(&Material::new("PLA", "g", 0.02)));
    }

    #[test]
    fn rejects_mismatched_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("materials.toml");
        fs::write(&path, "[PLA]\nname = \"ABS\"\nunit = \"g\"\n").unwrap();

        let err = codec::load::<MaterialRegistry>(&path, None).unwrap_err();
        assert!(matches!(err, PrintedError::SchemaValidation { .. }));
    }

    #[test]
    fn saves_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("materials.toml");
        let mut registry = MaterialRegistry::new();
        registry.insert(Material::new("PLA", "g", 0.02));
        registry.insert(Material::new("PETG", "g", 0.025));

        codec::save(&path, &registry).unwrap();
        let loaded: MaterialRegistry = codec::load(&path, None).unwrap();
        assert_eq!(loaded, registry);
    }
}
