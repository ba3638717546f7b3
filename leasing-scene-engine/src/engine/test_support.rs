//! Headless fixtures: a sample catalog and a `World` wired with the engine's
//! resources so systems can run via `RunSystemOnce`.

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;

use crate::engine::catalog::key_resolver::{KeyResolver, NodeKey};
use crate::engine::catalog::structural_catalog::{CatalogUnit, StructuralCatalog};
use crate::engine::loading::unit_loader::{UnitAssetLoaded, attach_loaded_units};
use crate::engine::registry::asset_registry::AssetRegistry;
use crate::engine::render::fresnel_material::FresnelHighlightMaterial;
use crate::engine::render::highlight_overlay::{
    HighlightOverlay, HighlightOverlayLayer, HighlightOverlays,
};
use crate::engine::render::visibility_sync::{ScopeChanged, VisibilitySync, sync_scope_highlights};
use crate::engine::scope::commands::{ScopeCommand, apply_scope_commands};
use crate::engine::scope::scope_controller::ScopeController;

/// Tower is flat, Fifth is floored with a padded `F-180 ` filename, Maker mixes
/// empty-floor production units with a floored one.
pub fn sample_catalog() -> StructuralCatalog {
    StructuralCatalog::from_units([
        CatalogUnit::new("Tower", "", "T-100"),
        CatalogUnit::new("Tower", "", "T-110"),
        CatalogUnit::new("Fifth", "Ground", "F-001"),
        CatalogUnit::new("Fifth", "First", "F-101"),
        CatalogUnit::new("Fifth", "First", "F-180 "),
        CatalogUnit::new("Fifth", "Second", "F-201"),
        CatalogUnit::new("Fifth", "Roof", "F-R01"),
        CatalogUnit::new("Fifth", "Mezzanine", "F-M01"),
        CatalogUnit::new("Maker", "", "M-P01"),
        CatalogUnit::new("Maker", "", "M-P02  "),
        CatalogUnit::new("Maker", "Ground", "M-001"),
    ])
}

pub fn sample_registry() -> AssetRegistry {
    let mut registry = AssetRegistry::default();
    registry.initialize(&sample_catalog(), KeyResolver::default().with_asset_root("units"));
    registry
}

pub struct SceneHarness {
    pub world: World,
}

impl SceneHarness {
    pub fn new() -> Self {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        world.init_resource::<Assets<FresnelHighlightMaterial>>();
        world.init_resource::<Events<ScopeCommand>>();
        world.init_resource::<Events<UnitAssetLoaded>>();
        world.init_resource::<Events<ScopeChanged>>();
        world.init_resource::<ScopeController>();
        world.init_resource::<VisibilitySync>();
        world.insert_resource(sample_registry());

        let material = world
            .resource_mut::<Assets<FresnelHighlightMaterial>>()
            .add(FresnelHighlightMaterial::default());
        let layer = world
            .spawn((HighlightOverlayLayer, Transform::default(), Visibility::default()))
            .id();
        world.insert_resource(HighlightOverlays::new(material, layer));

        Self { world }
    }

    pub fn key(&self, building: &str, floor: &str, unit: &str) -> NodeKey {
        self.world
            .resource::<AssetRegistry>()
            .resolver()
            .resolve(building, floor, unit)
    }

    /// A visible GLB-like root with `part_count` mesh children laid out along X.
    pub fn spawn_unit_object(&mut self, part_count: usize) -> Entity {
        let mesh = self
            .world
            .resource_mut::<Assets<Mesh>>()
            .add(Cuboid::default());
        let root = self
            .world
            .spawn((Transform::default(), GlobalTransform::default(), Visibility::Visible))
            .id();
        for index in 0..part_count {
            let x = index as f32;
            self.world.spawn((
                Mesh3d(mesh.clone()),
                Transform::from_xyz(x, 0.0, 0.0),
                GlobalTransform::from_xyz(x, 0.0, 0.0),
                Visibility::Visible,
                ChildOf(root),
            ));
        }
        root
    }

    /// Adds a mesh grandchild under the first child of `root`.
    pub fn spawn_nested_part(&mut self, root: Entity) -> Entity {
        let parent = self.parts(root).first().copied().unwrap_or(root);
        let mesh = self
            .world
            .resource_mut::<Assets<Mesh>>()
            .add(Cuboid::default());
        self.world
            .spawn((
                Mesh3d(mesh),
                Transform::default(),
                GlobalTransform::default(),
                Visibility::Visible,
                ChildOf(parent),
            ))
            .id()
    }

    /// Direct children of `root`.
    pub fn parts(&self, root: Entity) -> Vec<Entity> {
        self.world
            .get::<Children>(root)
            .map(|children| children.to_vec())
            .unwrap_or_default()
    }

    pub fn load(&mut self, key: &NodeKey, root: Entity) {
        self.world.send_event(UnitAssetLoaded {
            key: key.clone(),
            root,
        });
        self.world
            .run_system_once(attach_loaded_units)
            .expect("attach system runs");
        self.world.resource_mut::<Events<UnitAssetLoaded>>().clear();
    }

    pub fn command(&mut self, command: ScopeCommand) {
        self.world.send_event(command);
        self.world
            .run_system_once(apply_scope_commands)
            .expect("command system runs");
        self.world.resource_mut::<Events<ScopeCommand>>().clear();
    }

    pub fn sync(&mut self) {
        self.world
            .run_system_once(sync_scope_highlights)
            .expect("sync system runs");
    }

    pub fn overlay_count(&mut self) -> usize {
        let live = self.world.resource::<HighlightOverlays>().len();
        let spawned = self
            .world
            .query_filtered::<(), With<HighlightOverlay>>()
            .iter(&self.world)
            .count();
        assert_eq!(live, spawned, "overlay bookkeeping out of step with the world");
        spawned
    }

    pub fn mesh_count(&self) -> usize {
        self.world.resource::<Assets<Mesh>>().len()
    }

    pub fn visibility(&self, entity: Entity) -> Option<Visibility> {
        self.world.get::<Visibility>(entity).copied()
    }

    pub fn glowing_keys(&self) -> Vec<NodeKey> {
        self.world
            .resource::<AssetRegistry>()
            .all_visible()
            .into_iter()
            .map(|node| node.key.clone())
            .collect()
    }

    pub fn drain_scope_changes(&mut self) -> Vec<ScopeChanged> {
        self.world
            .resource_mut::<Events<ScopeChanged>>()
            .drain()
            .collect()
    }
}
