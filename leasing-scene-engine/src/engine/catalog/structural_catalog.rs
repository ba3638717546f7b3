use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// One catalogued unit as it appears in the source data.
///
/// `unit` keeps its original spacing for display; `floor` may be the
/// explicit empty-floor marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogUnit {
    pub building: String,
    #[serde(default)]
    pub floor: String,
    pub unit: String,
}

impl CatalogUnit {
    pub fn new(building: &str, floor: &str, unit: &str) -> Self {
        Self {
            building: building.to_string(),
            floor: floor.to_string(),
            unit: unit.to_string(),
        }
    }
}

/// Static structural description of the scene as a Bevy asset.
/// Mirrors the `*.catalog.json` layout exactly.
#[derive(Asset, TypePath, Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuralCatalog {
    /// Overrides the default GLB root when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_root: Option<String>,
    pub units: Vec<CatalogUnit>,
}

impl StructuralCatalog {
    #[cfg(test)]
    pub fn from_units(units: impl IntoIterator<Item = CatalogUnit>) -> Self {
        Self {
            asset_root: None,
            units: units.into_iter().collect(),
        }
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}
