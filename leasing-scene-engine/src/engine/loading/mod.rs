//! Catalog ingestion and per-unit GLB loading.
//!
//! The structural catalog is loaded first; once the registry is initialised the
//! app enters `Running` and every unit's GLB is requested. Scene readiness and
//! load failures flow back into the registry as events.

/// Structural catalog loading and registry initialisation.
pub mod catalog_loader;

/// Loading progress tracking resource for state transitions.
pub mod progress;

/// GLB scene spawning, readiness observer, attachment and failure monitoring.
pub mod unit_loader;
