//! Unit addressing and the structural catalog.
//!
//! Every addressable unit is identified by a [`key_resolver::NodeKey`] built from
//! `(building, floor, unit)` through a single rule table shared with asset path
//! derivation, so selection keys and loader keys can never drift apart.

/// Canonical key and asset path derivation from per-building rules.
pub mod key_resolver;

/// JSON catalog asset listing every building, floor and unit.
pub mod structural_catalog;
