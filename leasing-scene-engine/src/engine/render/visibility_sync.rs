use bevy::prelude::*;
use std::collections::{BTreeSet, HashMap};

use super::highlight_overlay::{HighlightOverlay, HighlightOverlays};
use crate::engine::catalog::key_resolver::NodeKey;
use crate::engine::registry::asset_registry::AssetRegistry;
use crate::engine::registry::node_info::{NodeInfo, VisibilityState};
use crate::engine::scope::scope_controller::{Scope, ScopeController};

/// Applied scope state plus the side table of renderable parts per node.
#[derive(Resource, Default)]
pub struct VisibilitySync {
    applied_revision: Option<u64>,
    members: BTreeSet<NodeKey>,
    parts: HashMap<NodeKey, Vec<Entity>>,
    rebuild_requested: bool,
}

impl VisibilitySync {
    /// Record the renderable parts of a freshly loaded node. When the node is
    /// already in scope the next sync rebuilds overlays; returns that membership.
    pub fn register_parts(&mut self, key: &NodeKey, parts: Vec<Entity>) -> bool {
        self.parts.insert(key.clone(), parts);
        let member = self.members.contains(key);
        if member {
            self.rebuild_requested = true;
        }
        member
    }

    pub fn parts_of(&self, key: &NodeKey) -> &[Entity] {
        self.parts.get(key).map_or(&[], Vec::as_slice)
    }

    fn needs_apply(&self, revision: u64) -> bool {
        self.rebuild_requested || self.applied_revision != Some(revision)
    }
}

/// Emitted once per applied scope transition.
#[derive(Event, Debug, Clone)]
pub struct ScopeChanged {
    pub scope: Scope,
    pub members: Vec<NodeKey>,
    pub overlay_count: usize,
}

/// Apply the effective scope to the registry, the scene and the overlay layer.
pub fn sync_scope_highlights(
    mut commands: Commands,
    controller: Res<ScopeController>,
    mut registry: ResMut<AssetRegistry>,
    mut sync: ResMut<VisibilitySync>,
    mut overlays: ResMut<HighlightOverlays>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut visibilities: Query<&mut Visibility, Without<HighlightOverlay>>,
    parts: Query<(&Mesh3d, &GlobalTransform), Without<HighlightOverlay>>,
    mut changes: EventWriter<ScopeChanged>,
) {
    if !registry.is_initialized() || !sync.needs_apply(controller.revision()) {
        return;
    }

    let scope = controller.effective_scope();
    let members = registry.members(&scope);

    // Phase 1: tag and hide before any overlay exists.
    apply_visibility(&mut registry, &sync, &members, &mut visibilities);

    // Phase 2: full rebuild of the overlay set.
    overlays.dispose(&mut commands, &mut meshes);
    for key in &members {
        if !registry.get(key).is_some_and(NodeInfo::is_loaded) {
            continue;
        }
        for &part in sync.parts_of(key) {
            overlays.build(&mut commands, &mut meshes, key, part, &parts);
        }
    }

    info!(
        "Scope applied: {:?} -> {} members, {} overlay meshes",
        scope,
        members.len(),
        overlays.len()
    );

    changes.write(ScopeChanged {
        scope,
        members: members.iter().cloned().collect(),
        overlay_count: overlays.len(),
    });

    sync.applied_revision = Some(controller.revision());
    sync.members = members;
    sync.rebuild_requested = false;
}

/// Tag every node and push base visibility: in-scope roots stay visible so
/// their transforms stay live, renderable parts are always hidden.
fn apply_visibility(
    registry: &mut AssetRegistry,
    sync: &VisibilitySync,
    members: &BTreeSet<NodeKey>,
    visibilities: &mut Query<&mut Visibility, Without<HighlightOverlay>>,
) {
    let keys: Vec<NodeKey> = registry.keys().cloned().collect();
    for key in keys {
        let glowing = members.contains(&key);
        let state = if glowing {
            VisibilityState::Glowing
        } else {
            VisibilityState::Invisible
        };

        let Some(object) = registry.set_visibility_state(&key, state) else {
            continue;
        };

        let root_visibility = if glowing {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        set_visibility(visibilities, object, root_visibility);
        for &part in sync.parts_of(&key) {
            set_visibility(visibilities, part, Visibility::Hidden);
        }
    }
}

fn set_visibility(
    visibilities: &mut Query<&mut Visibility, Without<HighlightOverlay>>,
    entity: Entity,
    value: Visibility,
) {
    if let Ok(mut visibility) = visibilities.get_mut(entity) {
        visibility.set_if_neq(value);
    }
}
