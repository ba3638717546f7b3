use bevy::pbr::{NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;

use super::fresnel_material::FresnelHighlightMaterial;
use crate::engine::catalog::key_resolver::NodeKey;

/// Root of the overlay layer; every overlay mesh is parented here.
#[derive(Component)]
pub struct HighlightOverlayLayer;

/// Transient overlay mesh highlighting one renderable part of a node.
#[derive(Component)]
pub struct HighlightOverlay;

/// Owns the overlay meshes of the current scope. Geometry clones are created
/// and disposed on every transition; the material is shared and never disposed.
#[derive(Resource)]
pub struct HighlightOverlays {
    material: Handle<FresnelHighlightMaterial>,
    layer: Entity,
    live: Vec<(Entity, Handle<Mesh>)>,
}

impl HighlightOverlays {
    pub fn new(material: Handle<FresnelHighlightMaterial>, layer: Entity) -> Self {
        Self {
            material,
            layer,
            live: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn material(&self) -> &Handle<FresnelHighlightMaterial> {
        &self.material
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Despawn every overlay and drop its cloned geometry.
    pub fn dispose(&mut self, commands: &mut Commands, meshes: &mut Assets<Mesh>) {
        for (entity, mesh) in self.live.drain(..) {
            commands.entity(entity).despawn();
            meshes.remove(&mesh);
        }
    }

    /// Clone one renderable part's geometry at its world transform into the
    /// overlay layer. Parts whose mesh asset is not resident are skipped.
    pub fn build(
        &mut self,
        commands: &mut Commands,
        meshes: &mut Assets<Mesh>,
        key: &NodeKey,
        part: Entity,
        parts: &Query<(&Mesh3d, &GlobalTransform), Without<HighlightOverlay>>,
    ) -> bool {
        let Ok((mesh, world_transform)) = parts.get(part) else {
            debug!("Part {:?} of {} has no mesh, skipping overlay", part, key);
            return false;
        };
        let Some(geometry) = meshes.get(&mesh.0).cloned() else {
            debug!("Mesh for part {:?} of {} not resident, skipping overlay", part, key);
            return false;
        };

        let clone = meshes.add(geometry);
        let overlay = commands
            .spawn((
                Name::new(format!("highlight:{}", key)),
                HighlightOverlay,
                Mesh3d(clone.clone()),
                MeshMaterial3d(self.material.clone()),
                world_transform.compute_transform(),
                Visibility::Visible,
                NotShadowCaster,
                NotShadowReceiver,
                ChildOf(self.layer),
            ))
            .id();

        self.live.push((overlay, clone));
        true
    }
}

/// Create the shared highlight material and the overlay layer root.
pub fn setup_highlight_overlays(
    mut commands: Commands,
    mut materials: ResMut<Assets<FresnelHighlightMaterial>>,
) {
    let material = materials.add(FresnelHighlightMaterial::default());
    let layer = commands
        .spawn((
            Name::new("highlight_overlay_layer"),
            HighlightOverlayLayer,
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    commands.insert_resource(HighlightOverlays::new(material, layer));
}
