use bevy::prelude::*;

use crate::engine::loading::progress::LoadingProgress;

/// `Loading` until the structural catalog has been ingested. Unit GLBs are
/// requested on entering `Running`; scope commands are accepted in both.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

/// Marker for the native scope status readout.
#[derive(Component)]
pub struct StatusText;

// Final transition to running state
pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.catalog_loaded {
        info!("→ Catalog ingested, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}
