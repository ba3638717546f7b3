use bevy::prelude::*;

#[derive(Resource, Default)]
pub struct LoadingProgress {
    pub catalog_loaded: bool,
    pub catalog_failed: bool,
}
