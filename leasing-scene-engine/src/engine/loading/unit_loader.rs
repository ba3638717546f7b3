use std::sync::Arc;

use bevy::asset::{AssetLoadError, LoadState};
use bevy::gltf::Gltf;
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;

use crate::engine::catalog::key_resolver::NodeKey;
use crate::engine::registry::asset_registry::AssetRegistry;
use crate::engine::registry::node_info::NodeInfo;
use crate::engine::render::visibility_sync::VisibilitySync;

/// Tags the `SceneRoot` spawned for one catalogued unit.
#[derive(Component, Debug, Clone)]
pub struct UnitAsset {
    pub key: NodeKey,
    /// The unlabeled GLB. Read and parse errors are reported here, not on the
    /// scene handle.
    gltf: Handle<Gltf>,
}

/// Set once a failed load has been reported so it is reported only once.
#[derive(Component)]
pub struct LoadFailureRecorded;

/// A unit's GLB scene has been instantiated under `root`.
#[derive(Event, Debug, Clone)]
pub struct UnitAssetLoaded {
    pub key: NodeKey,
    pub root: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct UnitLoadFailed {
    pub key: NodeKey,
    pub asset_path: String,
}

/// Request every catalogued GLB. Roots spawn hidden so nothing flashes before
/// the scope system has positioned it.
pub fn spawn_unit_assets(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    registry: Res<AssetRegistry>,
) {
    for node in registry.iter() {
        let gltf = asset_server.load(node.asset_path.clone());
        let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(node.asset_path.clone()));
        commands.spawn((
            Name::new(node.key.to_string()),
            UnitAsset {
                key: node.key.clone(),
                gltf,
            },
            SceneRoot(scene),
            Transform::default(),
            Visibility::Hidden,
        ));
    }

    info!("Requested {} unit GLBs", registry.len());
}

/// Observer forwarding scene readiness of unit roots as [`UnitAssetLoaded`].
pub fn on_unit_scene_ready(
    trigger: Trigger<SceneInstanceReady>,
    units: Query<&UnitAsset>,
    mut loaded: EventWriter<UnitAssetLoaded>,
) {
    let root = trigger.target();
    let Ok(unit) = units.get(root) else {
        return;
    };
    loaded.write(UnitAssetLoaded {
        key: unit.key.clone(),
        root,
    });
}

/// Surface failed GLB loads. Failed nodes stay `Pending`; nothing retries them.
pub fn monitor_unit_load_failures(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    units: Query<(Entity, &UnitAsset, &SceneRoot), Without<LoadFailureRecorded>>,
    mut registry: ResMut<AssetRegistry>,
    mut failed: EventWriter<UnitLoadFailed>,
) {
    for (entity, unit, scene_root) in &units {
        if registry.get(&unit.key).is_some_and(NodeInfo::is_loaded) {
            continue;
        }
        let Some(error) = unit_load_error(
            asset_server.get_load_state(&unit.gltf),
            asset_server.get_load_state(&scene_root.0),
        ) else {
            continue;
        };

        commands.entity(entity).insert(LoadFailureRecorded);
        if let Some(failure) = record_unit_failure(&mut registry, &unit.key, &error) {
            failed.write(failure);
        }
    }
}

/// The first failure among a unit's GLB and its labeled scene.
fn unit_load_error(
    gltf: Option<LoadState>,
    scene: Option<LoadState>,
) -> Option<Arc<AssetLoadError>> {
    [gltf, scene].into_iter().find_map(|state| match state {
        Some(LoadState::Failed(error)) => Some(error),
        _ => None,
    })
}

fn record_unit_failure(
    registry: &mut AssetRegistry,
    key: &NodeKey,
    error: &AssetLoadError,
) -> Option<UnitLoadFailed> {
    let Some(asset_path) = registry.get(key).map(|node| node.asset_path.clone()) else {
        warn!("Load failure for unknown key {}: {}", key, error);
        return None;
    };
    warn!("Unit {} failed to load from {:?}: {}", key, asset_path, error);

    registry.record_load_failure(key);
    Some(UnitLoadFailed {
        key: key.clone(),
        asset_path,
    })
}

/// Attach loaded scene objects to the registry. The root and every renderable
/// descendant are hidden before the registry sees the object; if the node is
/// already in scope the next sync builds its overlays.
pub fn attach_loaded_units(
    mut loaded: EventReader<UnitAssetLoaded>,
    mut registry: ResMut<AssetRegistry>,
    mut sync: ResMut<VisibilitySync>,
    children: Query<&Children>,
    renderables: Query<(), With<Mesh3d>>,
    mut visibilities: Query<&mut Visibility>,
) {
    for event in loaded.read() {
        let mut descendants = Vec::new();
        collect_entity_and_descendants(event.root, &children, &mut descendants);

        let parts: Vec<Entity> = descendants
            .into_iter()
            .filter(|&entity| entity != event.root && renderables.contains(entity))
            .collect();

        for &entity in std::iter::once(&event.root).chain(parts.iter()) {
            if let Ok(mut visibility) = visibilities.get_mut(entity) {
                *visibility = Visibility::Hidden;
            }
        }

        if registry.attach_object(&event.key, event.root).is_none() {
            continue;
        }

        let part_count = parts.len();
        if sync.register_parts(&event.key, parts) {
            info!(
                "Unit {} loaded while in scope ({} parts), rebuilding overlays",
                event.key, part_count
            );
        } else {
            debug!("Unit {} loaded ({} parts)", event.key, part_count);
        }
    }
}

// Recursively collect an entity and all of its descendants
fn collect_entity_and_descendants(
    entity: Entity,
    children: &Query<&Children>,
    out: &mut Vec<Entity>,
) {
    out.push(entity);
    if let Ok(direct) = children.get(entity) {
        for &child in &**direct {
            collect_entity_and_descendants(child, children, out);
        }
    }
}
