use bevy::prelude::*;
use constants::building::EMPTY_FLOOR;
use constants::floor::canonical_floor_rank;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use super::node_info::{NodeInfo, UnitLoadState, VisibilityState};
use crate::engine::catalog::key_resolver::{KeyResolver, NodeKey};
use crate::engine::catalog::structural_catalog::StructuralCatalog;
use crate::engine::scope::scope_controller::Scope;

/// Every addressable unit keyed by its canonical [`NodeKey`].
///
/// Lookups for unknown keys return `None` and are never fatal; callers treat
/// a miss as "nothing to highlight".
#[derive(Resource, Default)]
pub struct AssetRegistry {
    nodes: BTreeMap<NodeKey, NodeInfo>,
    resolver: KeyResolver,
    initialized: bool,
    loaded_count: usize,
    failed: BTreeSet<NodeKey>,
}

impl AssetRegistry {
    /// Populate one pending record per catalogued unit. Runs once; later calls
    /// are logged and ignored.
    pub fn initialize(&mut self, catalog: &StructuralCatalog, resolver: KeyResolver) -> bool {
        if self.initialized {
            warn!("Asset registry already initialised, ignoring catalog");
            return false;
        }

        let resolver = match &catalog.asset_root {
            Some(root) => resolver.with_asset_root(root.clone()),
            None => resolver,
        };

        for entry in &catalog.units {
            let key = resolver.resolve(&entry.building, &entry.floor, &entry.unit);
            if self.nodes.contains_key(&key) {
                warn!(
                    "Duplicate catalog entry {:?}/{:?}/{:?} resolves to existing key {}",
                    entry.building, entry.floor, entry.unit, key
                );
                continue;
            }

            let asset_path = resolver.asset_path(&entry.building, &entry.floor, &entry.unit);
            let node = NodeInfo::pending(
                key.clone(),
                &entry.building,
                &entry.floor,
                &entry.unit,
                asset_path,
            );
            self.nodes.insert(key, node);
        }

        self.resolver = resolver;
        self.initialized = true;
        info!(
            "Asset registry initialised: {} units across {} buildings",
            self.nodes.len(),
            self.building_list().len()
        );
        true
    }

    /// Record a finished GLB load. The caller has already hidden the object and
    /// its renderable parts.
    pub fn attach_object(&mut self, key: &NodeKey, object: Entity) -> Option<&NodeInfo> {
        let Some(node) = self.nodes.get_mut(key) else {
            warn!("Loaded asset for unknown key {}, ignoring", key);
            return None;
        };

        if node.load_state == UnitLoadState::Loaded {
            warn!("Unit {} loaded twice, replacing scene object", key);
        } else {
            self.loaded_count += 1;
        }

        node.object = Some(object);
        node.load_state = UnitLoadState::Loaded;
        self.failed.remove(key);
        Some(node)
    }

    /// Note a GLB that failed to load. The node stays `Pending` and is never an
    /// overlay candidate; there is no retry.
    pub fn record_load_failure(&mut self, key: &NodeKey) -> bool {
        if !self.nodes.contains_key(key) {
            warn!("Load failure reported for unknown key {}", key);
            return false;
        }
        self.failed.insert(key.clone())
    }

    /// Update a node's visibility state. Returns the scene object the state must
    /// be pushed to when the node is loaded.
    pub fn set_visibility_state(
        &mut self,
        key: &NodeKey,
        state: VisibilityState,
    ) -> Option<Entity> {
        let Some(node) = self.nodes.get_mut(key) else {
            warn!("Visibility change for unknown key {}", key);
            return None;
        };
        node.visibility_state = state;
        node.object
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn resolver(&self) -> &KeyResolver {
        &self.resolver
    }

    pub fn get(&self, key: &NodeKey) -> Option<&NodeInfo> {
        self.nodes.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &NodeKey> {
        self.nodes.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeInfo> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded_count
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn contains_building(&self, building: &str) -> bool {
        self.nodes.values().any(|node| node.building == building)
    }

    pub fn by_building(&self, building: &str) -> Vec<&NodeInfo> {
        self.nodes
            .values()
            .filter(|node| node.building == building)
            .collect()
    }

    /// Units on a floor. Buildings without floor subdivision ignore `floor` and
    /// return every unit they contain.
    pub fn by_floor(&self, building: &str, floor: &str) -> Vec<&NodeInfo> {
        if !self.resolver.has_floors(building) {
            return self.by_building(building);
        }
        self.nodes
            .values()
            .filter(|node| node.building == building && node.floor == floor)
            .collect()
    }

    pub fn by_unit(&self, building: &str, floor: &str, unit: &str) -> Option<&NodeInfo> {
        self.nodes.get(&self.resolver.resolve(building, floor, unit))
    }

    /// Nodes currently tagged `Glowing`, loaded or not.
    pub fn all_visible(&self) -> Vec<&NodeInfo> {
        self.nodes.values().filter(|node| node.is_glowing()).collect()
    }

    /// Buildings in lexical order.
    pub fn building_list(&self) -> Vec<String> {
        self.nodes
            .values()
            .map(|node| node.building.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Floors in canonical order (ground, first, second, third), then lexical.
    /// Flat buildings and empty-floor units contribute no floors.
    pub fn floor_list(&self, building: &str) -> Vec<String> {
        if !self.resolver.has_floors(building) {
            return Vec::new();
        }

        let mut floors: Vec<String> = self
            .nodes
            .values()
            .filter(|node| node.building == building && node.floor != EMPTY_FLOOR)
            .map(|node| node.floor.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        floors.sort_by(|a, b| compare_floors(a, b));
        floors
    }

    /// Keys belonging to a scope.
    pub fn members(&self, scope: &Scope) -> BTreeSet<NodeKey> {
        let nodes = match scope {
            Scope::None => Vec::new(),
            Scope::Building { building } => self.by_building(building),
            Scope::Floor { building, floor } => self.by_floor(building, floor),
            Scope::Unit {
                building,
                floor,
                unit,
            } => self.by_unit(building, floor, unit).into_iter().collect(),
        };
        nodes.into_iter().map(|node| node.key.clone()).collect()
    }
}

fn compare_floors(a: &str, b: &str) -> Ordering {
    match (canonical_floor_rank(a), canonical_floor_rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
