//! JSON-RPC 2.0 bridge between the leasing site and the scene engine.
//!
//! The site's navigation tree drives scope commands over iframe postMessage and
//! receives scope and loading notifications back.
//!
//! ## Architecture
//!
//! The RPC system uses standard JSON-RPC 2.0 protocol with:
//! - **Requests**: Expect responses with matching IDs
//! - **Notifications**: One-way messages without responses
//! - **Responses**: Reply to requests with results or errors
//!
//! ## Message Flow
//!
//! ```text
//! Site (Parent Window)  <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! ## Adding Methods
//!
//! Add a case to `handle_rpc_request()`. Navigation handlers push a
//! `ScopeCommand` into the frame's command batch and return an acknowledgement;
//! query handlers read the registry and return JSON. Push unsolicited updates
//! with `WebRpcInterface::send_notification()`.
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//! - `-32002`: Catalog not loaded yet (registry queries only)
//!
//! Navigation methods run whether or not the message carries an `id`; only
//! requests with an `id` receive a response. A `null` or missing address field
//! selects the clearing form of the command.
//!
//! ## Existing Methods
//!
//! ### Navigation
//! - `select_building`: `{building}`
//! - `select_floor`: `{building, floor}`
//! - `select_unit`: `{building, floor, unit}`
//! - `hover_unit`: `{building, floor, unit}`
//! - `hover_floor`: `{building, floor}`
//! - `clear_selection`: Drop selection and hover
//! - `clear_unit_selection`: Return to the building or floor selected before the unit
//!
//! ### Registry Queries
//! - `get_building_list`: Building names, lexical order
//! - `get_floor_list`: Floors of a building, canonical storey order first
//! - `get_glbs_by_building` / `get_glbs_by_floor` / `get_glbs_by_unit`: Unit records
//! - `get_visible_glbs`: Units currently glowing
//! - `get_load_status`: Catalog and GLB loading counters
//!
//! ### Notifications (engine to UI)
//! - `catalog_ready`, `catalog_failed`
//! - `unit_loaded`, `unit_load_failed`
//! - `scope_changed`: Effective scope, member keys and overlay count

/// JSON-RPC 2.0 bidirectional communication system for the leasing site.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
