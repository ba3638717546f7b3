//! In-memory table of every addressable unit.
//!
//! Built once from the structural catalog, then enriched as each unit's GLB
//! finishes loading. All mutation goes through [`asset_registry::AssetRegistry`]
//! methods; no system writes [`node_info::NodeInfo`] fields directly.

/// Registry resource: initialisation, load attachment, visibility state and queries.
pub mod asset_registry;

/// Per-unit record with load and visibility state.
pub mod node_info;
