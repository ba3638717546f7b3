use bevy::prelude::*;
use serde::Serialize;

use crate::engine::catalog::key_resolver::NodeKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitLoadState {
    #[default]
    Pending,
    Loaded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityState {
    #[default]
    Invisible,
    Glowing,
}

/// One addressable unit. `object` is present only once the GLB scene is ready
/// and is owned by the registry for the rest of the process.
#[derive(Debug, Clone, Serialize)]
pub struct NodeInfo {
    pub key: NodeKey,
    pub building: String,
    pub floor: String,
    /// Display name with the catalogue's original spacing.
    pub unit_name: String,
    pub asset_path: String,
    #[serde(skip)]
    pub(super) object: Option<Entity>,
    pub(super) load_state: UnitLoadState,
    pub(super) visibility_state: VisibilityState,
}

impl NodeInfo {
    pub(super) fn pending(
        key: NodeKey,
        building: &str,
        floor: &str,
        unit_name: &str,
        asset_path: String,
    ) -> Self {
        Self {
            key,
            building: building.to_string(),
            floor: floor.to_string(),
            unit_name: unit_name.to_string(),
            asset_path,
            object: None,
            load_state: UnitLoadState::Pending,
            visibility_state: VisibilityState::Invisible,
        }
    }

    #[cfg(test)]
    pub fn object(&self) -> Option<Entity> {
        self.object
    }

    #[cfg(test)]
    pub fn load_state(&self) -> UnitLoadState {
        self.load_state
    }

    #[cfg(test)]
    pub fn visibility_state(&self) -> VisibilityState {
        self.visibility_state
    }

    pub fn is_loaded(&self) -> bool {
        self.load_state == UnitLoadState::Loaded
    }

    pub fn is_glowing(&self) -> bool {
        self.visibility_state == VisibilityState::Glowing
    }
}
