//! Runtime diagnostics for native builds.

/// Native text readout of the effective scope and unit loading progress.
pub mod scope_status;
