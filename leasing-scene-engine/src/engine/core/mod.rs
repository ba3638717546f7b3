//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, state transitions,
//! and plugin initialisation for both native and WASM targets.

/// Application setup, system ordering and the scope engine plugin.
///
/// Creates the main app with the highlight material, catalog asset loader,
/// RPC bridge and platform-specific configuration.
pub mod app_setup;

/// Application state machine and loading transitions.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
