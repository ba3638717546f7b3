//! Scope visibility and highlight overlay rendering.
//!
//! A scope transition is applied as a two-phase commit inside one system:
//!
//! ```text
//! sync_scope_highlights()
//!   ├─> Phase 1: tag every node Glowing/Invisible, hide base renderable parts
//!   └─> Phase 2: dispose previous overlays, clone member geometry with the
//!                shared Fresnel material into the overlay layer
//! ```
//!
//! Both phases run in the same tick, so the renderer never extracts a frame
//! with a solid base mesh and its translucent overlay visible together.

/// Shared translucent edge-glow material with its WGSL shader binding.
pub mod fresnel_material;

/// Overlay layer, overlay mesh ownership and disposal.
pub mod highlight_overlay;

/// Effective scope application, the renderable-part side table and the sync system.
pub mod visibility_sync;
