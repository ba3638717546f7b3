//! Selection and hover state, resolved into one effective scope.
//!
//! ## Priority
//!
//! ```text
//! HoverFloor > HoverUnit > Unit selection > Floor selection > Building selection > None
//! ```
//!
//! Hover is a transient override held apart from the selection, so clearing it
//! always falls back to whatever selection was active underneath.
//!
//! ## Command Flow
//!
//! ```text
//! RPC / keyboard
//!   └─> ScopeCommand (event)
//!       └─> apply_scope_commands()   key-miss check against the registry
//!           └─> ScopeController      revision bump
//!               └─> sync_scope_highlights()
//! ```

/// `ScopeCommand` events, registry validation and native keyboard shortcuts.
pub mod commands;

/// Selection/hover state machine and effective scope resolution.
pub mod scope_controller;
