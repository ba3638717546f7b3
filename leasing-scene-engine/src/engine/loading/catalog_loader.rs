use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::constants::path::RELATIVE_CATALOG_PATH;
use crate::engine::catalog::key_resolver::KeyResolver;
use crate::engine::catalog::structural_catalog::StructuralCatalog;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::registry::asset_registry::AssetRegistry;
use crate::rpc::web_rpc::WebRpcInterface;

#[derive(Resource, Default)]
pub struct CatalogLoader {
    handle: Option<Handle<StructuralCatalog>>,
}

// Start the loading process
pub fn start_loading(mut catalog_loader: ResMut<CatalogLoader>, asset_server: Res<AssetServer>) {
    info!("Loading structural catalog from: {}", RELATIVE_CATALOG_PATH);
    catalog_loader.handle = Some(asset_server.load(RELATIVE_CATALOG_PATH));
}

// Initialise the registry once the catalog asset resolves
pub fn ingest_catalog_system(
    mut loading_progress: ResMut<LoadingProgress>,
    catalog_loader: Res<CatalogLoader>,
    asset_server: Res<AssetServer>,
    catalogs: Res<Assets<StructuralCatalog>>,
    mut registry: ResMut<AssetRegistry>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if loading_progress.catalog_loaded || loading_progress.catalog_failed {
        return;
    }

    let Some(handle) = catalog_loader.handle.as_ref() else {
        return;
    };

    if let Some(catalog) = catalogs.get(handle) {
        debug!("Structural catalog parsed: {} entries", catalog.unit_count());
        registry.initialize(catalog, KeyResolver::default());
        if registry.is_empty() {
            warn!("Structural catalog lists no units, nothing will be loaded");
        }
        info!(
            "Registry initialised: {} units under {:?}",
            registry.len(),
            registry.resolver().asset_root()
        );
        loading_progress.catalog_loaded = true;

        rpc_interface.send_notification(
            "catalog_ready",
            serde_json::json!({
                "units": registry.len(),
                "buildings": registry.building_list(),
            }),
        );
        return;
    }

    if let Some(LoadState::Failed(error)) = asset_server.get_load_state(handle) {
        error!("Structural catalog failed to load: {}", error);
        loading_progress.catalog_failed = true;
        rpc_interface.send_notification(
            "catalog_failed",
            serde_json::json!({ "message": error.to_string() }),
        );
    }
}
