use bevy::prelude::*;

use crate::engine::core::app_state::StatusText;
use crate::engine::registry::asset_registry::AssetRegistry;
use crate::engine::render::highlight_overlay::HighlightOverlays;
use crate::engine::scope::scope_controller::{Scope, ScopeController};

pub fn scope_status_text_system(
    controller: Res<ScopeController>,
    registry: Res<AssetRegistry>,
    overlays: Option<Res<HighlightOverlays>>,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    let overlay_count = overlays.map_or(0, |overlays| overlays.len());
    let mut status = format_status(&controller.effective_scope(), &registry, overlay_count);
    if controller.is_hovering() {
        status.push_str("\n(hover)");
    }
    for mut text in &mut query {
        if text.0 != status {
            text.0 = status.clone();
        }
    }
}

fn format_status(scope: &Scope, registry: &AssetRegistry, overlay_count: usize) -> String {
    let scope = match scope {
        Scope::None => "none".to_string(),
        Scope::Building { building } => format!("building {building}"),
        Scope::Floor { building, floor } => format!("floor {building} / {floor}"),
        Scope::Unit {
            building,
            floor,
            unit,
        } if floor.is_empty() => format!("unit {building} / {unit}"),
        Scope::Unit {
            building,
            floor,
            unit,
        } => format!("unit {building} / {floor} / {unit}"),
    };

    let mut status = format!(
        "Scope: {scope}\nUnits: {}/{} loaded\nOverlays: {overlay_count}",
        registry.loaded_count(),
        registry.len(),
    );
    if registry.failed_count() > 0 {
        status.push_str(&format!("\nFailed: {}", registry.failed_count()));
    }
    status
}
