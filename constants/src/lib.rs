//! Shared project data for the leasing scene engine.
//!
//! Building addressing rules, floor ordering and highlight render settings live
//! here so key derivation and asset path derivation read one table.

/// Per-building addressing rules (floor subdivision, unit filename quirks).
pub mod building;

/// Canonical floor ordering used by the navigation queries.
pub mod floor;

/// Fresnel highlight overlay settings.
pub mod render_settings;
