use bevy::prelude::*;
use constants::building::{BUILDING_RULES, BuildingRule, EMPTY_FLOOR};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::constants::path::DEFAULT_UNIT_ASSET_ROOT;

/// Canonical identifier of one addressable unit.
///
/// Only [`KeyResolver`] constructs keys; all registry and scope maps compare
/// them byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Owned form of a [`BuildingRule`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingRules {
    pub has_floors: bool,
    /// Trimmed unit identifier -> GLB file stem as it exists on disk.
    pub unit_path_quirks: HashMap<String, String>,
}

impl Default for BuildingRules {
    fn default() -> Self {
        Self {
            has_floors: true,
            unit_path_quirks: HashMap::new(),
        }
    }
}

impl From<&BuildingRule> for BuildingRules {
    fn from(rule: &BuildingRule) -> Self {
        Self {
            has_floors: rule.has_floors,
            unit_path_quirks: rule
                .unit_path_quirks
                .iter()
                .map(|quirk| (quirk.unit.to_string(), quirk.file_stem.to_string()))
                .collect(),
        }
    }
}

/// Address after the building rules have been applied.
struct Addressing<'a> {
    building: &'a str,
    floor: Option<&'a str>,
    unit: &'a str,
    rules: Option<&'a BuildingRules>,
}

/// Turns `(building, floor, unit)` into canonical keys and asset paths.
#[derive(Resource, Debug, Clone)]
pub struct KeyResolver {
    rules: HashMap<String, BuildingRules>,
    asset_root: String,
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::from_table(BUILDING_RULES, DEFAULT_UNIT_ASSET_ROOT)
    }
}

impl KeyResolver {
    pub fn new(
        rules: impl IntoIterator<Item = (String, BuildingRules)>,
        asset_root: impl Into<String>,
    ) -> Self {
        Self {
            rules: rules.into_iter().collect(),
            asset_root: asset_root.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_table(table: &[BuildingRule], asset_root: impl Into<String>) -> Self {
        Self::new(
            table
                .iter()
                .map(|rule| (rule.name.to_string(), BuildingRules::from(rule))),
            asset_root,
        )
    }

    /// Same rule table, different asset root.
    pub fn with_asset_root(mut self, asset_root: impl Into<String>) -> Self {
        self.asset_root = asset_root.into().trim_end_matches('/').to_string();
        self
    }

    pub fn asset_root(&self) -> &str {
        &self.asset_root
    }

    pub fn has_floors(&self, building: &str) -> bool {
        self.rules
            .get(building)
            .map_or(true, |rules| rules.has_floors)
    }

    /// Unit identifiers inherit stray padding from source filenames.
    pub fn normalize_unit(unit: &str) -> &str {
        unit.trim()
    }

    /// True when the floor argument takes part in addressing for this building.
    pub fn floor_is_addressed(&self, building: &str, floor: &str) -> bool {
        self.has_floors(building) && floor != EMPTY_FLOOR
    }

    fn addressing<'a>(
        &'a self,
        building: &'a str,
        floor: &'a str,
        unit: &'a str,
    ) -> Addressing<'a> {
        Addressing {
            building,
            floor: self.floor_is_addressed(building, floor).then_some(floor),
            unit: Self::normalize_unit(unit),
            rules: self.rules.get(building),
        }
    }

    /// Canonical key for a unit. Pure and deterministic.
    pub fn resolve(&self, building: &str, floor: &str, unit: &str) -> NodeKey {
        let address = self.addressing(building, floor, unit);
        match address.floor {
            Some(floor) => NodeKey(format!("{}/{}/{}", address.building, floor, address.unit)),
            None => NodeKey(format!("{}/{}", address.building, address.unit)),
        }
    }

    /// GLB location for a unit, derived through the same rules as [`Self::resolve`].
    pub fn asset_path(&self, building: &str, floor: &str, unit: &str) -> String {
        let address = self.addressing(building, floor, unit);
        let stem = address
            .rules
            .and_then(|rules| rules.unit_path_quirks.get(address.unit))
            .map_or(address.unit, String::as_str);

        match address.floor {
            Some(floor) => format!(
                "{}/{}/{}/{}.glb",
                self.asset_root, address.building, floor, stem
            ),
            None => format!("{}/{}/{}.glb", self.asset_root, address.building, stem),
        }
    }
}
