use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::catalog::structural_catalog::StructuralCatalog;
use crate::engine::core::app_state::{AppState, StatusText, transition_to_running};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::catalog_loader::{CatalogLoader, ingest_catalog_system, start_loading};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::unit_loader::{
    UnitAssetLoaded, UnitLoadFailed, attach_loaded_units, monitor_unit_load_failures,
    on_unit_scene_ready, spawn_unit_assets,
};
use crate::engine::registry::asset_registry::AssetRegistry;
use crate::engine::render::fresnel_material::FresnelHighlightMaterial;
use crate::engine::render::highlight_overlay::setup_highlight_overlays;
use crate::engine::render::visibility_sync::{ScopeChanged, VisibilitySync, sync_scope_highlights};
use crate::engine::scope::commands::{
    ScopeCommand, apply_scope_commands, handle_scope_keyboard_shortcuts,
};
use crate::engine::scope::scope_controller::ScopeController;
use crate::rpc::web_rpc::{WebRpcInterface, WebRpcPlugin};

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::scope_status::scope_status_text_system;

/// Per-frame ordering. Loads attach before commands apply, and commands apply
/// before the single scope sync, so a frame never renders a half-applied scope.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeEngineSet {
    Input,
    Loading,
    Attach,
    Commands,
    Sync,
    Notify,
    Output,
}

/// Registry, scope state, loaders and the highlight pipeline.
pub struct ScopeEnginePlugin;

impl Plugin for ScopeEnginePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                ScopeEngineSet::Input,
                ScopeEngineSet::Loading,
                ScopeEngineSet::Attach,
                ScopeEngineSet::Commands,
                ScopeEngineSet::Sync,
                ScopeEngineSet::Notify,
                ScopeEngineSet::Output,
            )
                .chain(),
        );

        // Initialise resources early
        app.init_resource::<LoadingProgress>()
            .init_resource::<CatalogLoader>()
            .init_resource::<AssetRegistry>()
            .init_resource::<ScopeController>()
            .init_resource::<VisibilitySync>()
            .init_resource::<WebRpcInterface>()
            .add_event::<ScopeCommand>()
            .add_event::<UnitAssetLoaded>()
            .add_event::<UnitLoadFailed>()
            .add_event::<ScopeChanged>()
            .add_observer(on_unit_scene_ready);

        app.add_systems(Startup, (setup, setup_highlight_overlays, start_loading))
            .add_systems(OnEnter(AppState::Running), spawn_unit_assets)
            .add_systems(
                Update,
                handle_scope_keyboard_shortcuts.in_set(ScopeEngineSet::Input),
            )
            .add_systems(
                Update,
                (ingest_catalog_system, transition_to_running)
                    .chain()
                    .in_set(ScopeEngineSet::Loading)
                    .run_if(in_state(AppState::Loading)),
            )
            .add_systems(
                Update,
                monitor_unit_load_failures
                    .in_set(ScopeEngineSet::Loading)
                    .run_if(in_state(AppState::Running)),
            )
            .add_systems(Update, attach_loaded_units.in_set(ScopeEngineSet::Attach))
            .add_systems(Update, apply_scope_commands.in_set(ScopeEngineSet::Commands))
            .add_systems(Update, sync_scope_highlights.in_set(ScopeEngineSet::Sync));

        // Status readout only for native builds.
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.add_systems(
                Update,
                scope_status_text_system.in_set(ScopeEngineSet::Notify),
            );
        }
    }
}

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(MaterialPlugin::<FresnelHighlightMaterial>::default())
        // Registers StructuralCatalog as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<StructuralCatalog>::new(&["catalog.json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(ScopeEnginePlugin);

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

// Framing is owned by the host page; this is only a sensible starting view.
fn spawn_scene_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-60.0, 45.0, 90.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);
    spawn_scene_camera(&mut commands);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("Scope: none"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.25, 0.85, 1.0)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                StatusText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
