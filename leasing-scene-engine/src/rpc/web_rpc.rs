use crate::engine::core::app_setup::ScopeEngineSet;
use crate::engine::loading::unit_loader::{UnitAssetLoaded, UnitLoadFailed};
use crate::engine::registry::asset_registry::AssetRegistry;
use crate::engine::registry::node_info::NodeInfo;
use crate::engine::render::visibility_sync::ScopeChanged;
use crate::engine::scope::commands::{FloorAddress, ScopeCommand, UnitAddress};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure. Requests without `id` are notifications.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the UI and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the UI without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    #[cfg(test)]
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    /// Queue response for transmission to the UI.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (process_incoming_messages, handle_rpc_messages)
                    .chain()
                    .in_set(ScopeEngineSet::Input),
            )
            .add_systems(
                Update,
                forward_engine_notifications.in_set(ScopeEngineSet::Notify),
            )
            .add_systems(Update, send_outgoing_messages.in_set(ScopeEngineSet::Output));

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    match window() {
        Some(window) => {
            if let Err(e) =
                window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", e);
            }
        }
        None => error!("Window object not available, RPC listener not registered"),
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the UI.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    registry: Res<AssetRegistry>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut scope_commands: EventWriter<ScopeCommand>,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);

                let mut queued = Vec::new();
                if let Some(response) = handle_rpc_request(&request, &registry, &mut queued) {
                    rpc_interface.queue_response(response);
                }
                scope_commands.write_batch(queued);
            }
            Err(parse_error) => {
                warn!("Unparseable RPC message: {}", parse_error);
                rpc_interface.send_notification(
                    "debug_message",
                    serde_json::json!({
                        "message": format!("Parse error: {}", parse_error)
                    }),
                );
            }
        }
    }
}

/// Dispatch one request. Commands are queued whether or not the request carries
/// an `id`; a response is produced only for requests with one. Addressed
/// navigation is refused with `-32002` until the catalog has been ingested.
fn handle_rpc_request(
    request: &RpcRequest,
    registry: &AssetRegistry,
    commands: &mut Vec<ScopeCommand>,
) -> Option<RpcResponse> {
    let params = &request.params;
    let result = match request.method.as_str() {
        // Navigation commands.
        "select_building" => handle_select_building(params, registry, commands),
        "select_floor" => {
            handle_floor_command(params, registry, commands, ScopeCommand::SelectFloor)
        }
        "select_unit" => handle_unit_command(params, registry, commands, ScopeCommand::SelectUnit),
        "hover_unit" => handle_unit_command(params, registry, commands, ScopeCommand::HoverUnit),
        "hover_floor" => {
            handle_floor_command(params, registry, commands, ScopeCommand::HoverFloor)
        }
        "clear_selection" => queue_command(commands, ScopeCommand::ClearSelection),
        "clear_unit_selection" => queue_command(commands, ScopeCommand::ClearUnitSelection),

        // Registry queries.
        "get_building_list" => handle_get_building_list(registry),
        "get_floor_list" => handle_get_floor_list(params, registry),
        "get_glbs_by_building" => handle_get_glbs_by_building(params, registry),
        "get_glbs_by_floor" => handle_get_glbs_by_floor(params, registry),
        "get_glbs_by_unit" => handle_get_glbs_by_unit(params, registry),
        "get_visible_glbs" => handle_get_visible_glbs(registry),
        "get_load_status" => handle_get_load_status(registry),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return request.id.clone().map(|id| {
                create_error_response(
                    id,
                    -32601,
                    "Method not found",
                    Some(serde_json::json!({"method": request.method})),
                )
            });
        }
    };

    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

/// Address fields shared by every navigation method; `null` or missing means
/// the clearing form of the command.
#[derive(Deserialize, Default, Debug)]
struct AddressParams {
    #[serde(default)]
    building: Option<String>,
    #[serde(default)]
    floor: Option<String>,
    #[serde(default)]
    unit: Option<String>,
}

impl AddressParams {
    fn parse(params: &serde_json::Value) -> Result<Self, RpcError> {
        if params.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(params.clone()).map_err(|_| {
            RpcError::invalid_params("Expected string or null 'building', 'floor', 'unit'")
        })
    }

    fn floor_address(&self) -> Option<FloorAddress> {
        match (&self.building, &self.floor) {
            (Some(building), Some(floor)) => Some(FloorAddress::new(building, floor)),
            _ => None,
        }
    }

    fn unit_address(&self) -> Option<UnitAddress> {
        match (&self.building, &self.floor, &self.unit) {
            (Some(building), Some(floor), Some(unit)) => {
                Some(UnitAddress::new(building, floor, unit))
            }
            _ => None,
        }
    }

    fn require_building(&self) -> Result<&str, RpcError> {
        self.building
            .as_deref()
            .ok_or_else(|| RpcError::invalid_params("Expected 'building' parameter"))
    }

    fn require_floor(&self) -> Result<(&str, &str), RpcError> {
        let building = self.require_building()?;
        let floor = self
            .floor
            .as_deref()
            .ok_or_else(|| RpcError::invalid_params("Expected 'floor' parameter"))?;
        Ok((building, floor))
    }

    fn require_unit(&self) -> Result<(&str, &str, &str), RpcError> {
        let (building, floor) = self.require_floor()?;
        let unit = self
            .unit
            .as_deref()
            .ok_or_else(|| RpcError::invalid_params("Expected 'unit' parameter"))?;
        Ok((building, floor, unit))
    }
}

fn queue_command(
    commands: &mut Vec<ScopeCommand>,
    command: ScopeCommand,
) -> Result<serde_json::Value, RpcError> {
    commands.push(command);
    Ok(serde_json::json!({ "success": true }))
}

/// Queue a navigation command. Targets cannot be validated before ingestion,
/// so only the clearing forms are accepted until then.
fn queue_navigation<T>(
    registry: &AssetRegistry,
    commands: &mut Vec<ScopeCommand>,
    target: Option<T>,
    command: fn(Option<T>) -> ScopeCommand,
) -> Result<serde_json::Value, RpcError> {
    if target.is_some() {
        ready_registry(registry)?;
    }
    queue_command(commands, command(target))
}

fn handle_select_building(
    params: &serde_json::Value,
    registry: &AssetRegistry,
    commands: &mut Vec<ScopeCommand>,
) -> Result<serde_json::Value, RpcError> {
    let address = AddressParams::parse(params)?;
    queue_navigation(registry, commands, address.building, ScopeCommand::SelectBuilding)
}

fn handle_floor_command(
    params: &serde_json::Value,
    registry: &AssetRegistry,
    commands: &mut Vec<ScopeCommand>,
    command: fn(Option<FloorAddress>) -> ScopeCommand,
) -> Result<serde_json::Value, RpcError> {
    let address = AddressParams::parse(params)?;
    queue_navigation(registry, commands, address.floor_address(), command)
}

fn handle_unit_command(
    params: &serde_json::Value,
    registry: &AssetRegistry,
    commands: &mut Vec<ScopeCommand>,
    command: fn(Option<UnitAddress>) -> ScopeCommand,
) -> Result<serde_json::Value, RpcError> {
    let address = AddressParams::parse(params)?;
    queue_navigation(registry, commands, address.unit_address(), command)
}

fn ready_registry(registry: &AssetRegistry) -> Result<&AssetRegistry, RpcError> {
    if registry.is_initialized() {
        Ok(registry)
    } else {
        Err(RpcError::not_ready())
    }
}

fn handle_get_building_list(registry: &AssetRegistry) -> Result<serde_json::Value, RpcError> {
    let registry = ready_registry(registry)?;
    Ok(serde_json::json!({ "buildings": registry.building_list() }))
}

fn handle_get_floor_list(
    params: &serde_json::Value,
    registry: &AssetRegistry,
) -> Result<serde_json::Value, RpcError> {
    let registry = ready_registry(registry)?;
    let address = AddressParams::parse(params)?;
    let building = address.require_building()?;
    Ok(serde_json::json!({
        "building": building,
        "floors": registry.floor_list(building),
    }))
}

fn handle_get_glbs_by_building(
    params: &serde_json::Value,
    registry: &AssetRegistry,
) -> Result<serde_json::Value, RpcError> {
    let registry = ready_registry(registry)?;
    let address = AddressParams::parse(params)?;
    let building = address.require_building()?;
    nodes_result(registry.by_building(building))
}

fn handle_get_glbs_by_floor(
    params: &serde_json::Value,
    registry: &AssetRegistry,
) -> Result<serde_json::Value, RpcError> {
    let registry = ready_registry(registry)?;
    let address = AddressParams::parse(params)?;
    let (building, floor) = address.require_floor()?;
    nodes_result(registry.by_floor(building, floor))
}

fn handle_get_glbs_by_unit(
    params: &serde_json::Value,
    registry: &AssetRegistry,
) -> Result<serde_json::Value, RpcError> {
    let registry = ready_registry(registry)?;
    let address = AddressParams::parse(params)?;
    let (building, floor, unit) = address.require_unit()?;
    let node = registry.by_unit(building, floor, unit);
    if node.is_none() {
        warn!("get_glbs_by_unit: no catalog entry for {:?}/{:?}/{:?}", building, floor, unit);
    }
    nodes_result(node.into_iter().collect())
}

fn handle_get_visible_glbs(registry: &AssetRegistry) -> Result<serde_json::Value, RpcError> {
    let registry = ready_registry(registry)?;
    nodes_result(registry.all_visible())
}

fn handle_get_load_status(registry: &AssetRegistry) -> Result<serde_json::Value, RpcError> {
    Ok(serde_json::json!({
        "initialized": registry.is_initialized(),
        "total": registry.len(),
        "loaded": registry.loaded_count(),
        "failed": registry.failed_count(),
    }))
}

fn nodes_result(nodes: Vec<&NodeInfo>) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(&nodes)
        .map(|units| serde_json::json!({ "units": units }))
        .map_err(|e| RpcError::internal_error(&format!("Failed to serialise units: {}", e)))
}

/// Push engine events to the UI as notifications.
fn forward_engine_notifications(
    mut scope_changes: EventReader<ScopeChanged>,
    mut loaded: EventReader<UnitAssetLoaded>,
    mut failed: EventReader<UnitLoadFailed>,
    registry: Res<AssetRegistry>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for change in scope_changes.read() {
        rpc_interface.send_notification(
            "scope_changed",
            serde_json::json!({
                "scope": change.scope,
                "members": change.members,
                "overlay_count": change.overlay_count,
            }),
        );
    }

    for unit in loaded.read() {
        rpc_interface.send_notification(
            "unit_loaded",
            serde_json::json!({
                "key": unit.key,
                "loaded": registry.loaded_count(),
                "total": registry.len(),
            }),
        );
    }

    for failure in failed.read() {
        rpc_interface.send_notification(
            "unit_load_failed",
            serde_json::json!({
                "key": failure.key,
                "asset_path": failure.asset_path,
                "failed": registry.failed_count(),
            }),
        );
    }
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the UI.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window (UI host).
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }

    /// Queries issued before the structural catalog has been ingested.
    pub fn not_ready() -> Self {
        Self {
            code: -32002,
            message: "Catalog not loaded".to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::sample_registry;
    use serde_json::json;

    fn request(method: &str, params: serde_json::Value, id: Option<i64>) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: id.map(|id| json!(id)),
        }
    }

    fn result_of(response: Option<RpcResponse>) -> serde_json::Value {
        let response = response.expect("request with id gets a response");
        assert!(response.error.is_none(), "unexpected error: {:?}", response.error);
        response.result.expect("successful result")
    }

    fn error_of(response: Option<RpcResponse>) -> RpcError {
        response
            .expect("request with id gets a response")
            .error
            .expect("error response")
    }

    #[test]
    fn select_unit_queues_a_command_and_acknowledges() {
        let registry = sample_registry();
        let mut commands = Vec::new();
        let response = handle_rpc_request(
            &request(
                "select_unit",
                json!({"building": "Fifth", "floor": "First", "unit": "F-180"}),
                Some(1),
            ),
            &registry,
            &mut commands,
        );

        assert_eq!(result_of(response)["success"], json!(true));
        assert_eq!(
            commands,
            vec![ScopeCommand::SelectUnit(Some(UnitAddress::new(
                "Fifth", "First", "F-180"
            )))]
        );
    }

    #[test]
    fn notifications_run_commands_without_responding() {
        let registry = sample_registry();
        let mut commands = Vec::new();
        let response = handle_rpc_request(
            &request(
                "hover_floor",
                json!({"building": "Fifth", "floor": "Second"}),
                None,
            ),
            &registry,
            &mut commands,
        );

        assert!(response.is_none());
        assert_eq!(
            commands,
            vec![ScopeCommand::HoverFloor(Some(FloorAddress::new("Fifth", "Second")))]
        );
    }

    #[test]
    fn null_addresses_become_clearing_commands() {
        let registry = sample_registry();
        let mut commands = Vec::new();
        handle_rpc_request(
            &request("hover_unit", json!({"building": null, "floor": null, "unit": null}), None),
            &registry,
            &mut commands,
        );
        for method in ["select_building", "clear_unit_selection"] {
            handle_rpc_request(&request(method, json!(null), None), &registry, &mut commands);
        }

        assert_eq!(
            commands,
            vec![
                ScopeCommand::HoverUnit(None),
                ScopeCommand::SelectBuilding(None),
                ScopeCommand::ClearUnitSelection,
            ]
        );
    }

    #[test]
    fn floor_list_is_semantically_ordered() {
        let registry = sample_registry();
        let result = result_of(handle_rpc_request(
            &request("get_floor_list", json!({"building": "Fifth"}), Some(2)),
            &registry,
            &mut Vec::new(),
        ));
        assert_eq!(
            result["floors"],
            json!(["Ground", "First", "Second", "Mezzanine", "Roof"])
        );
    }

    #[test]
    fn floor_queries_on_flat_buildings_return_every_unit() {
        let registry = sample_registry();
        let result = result_of(handle_rpc_request(
            &request(
                "get_glbs_by_floor",
                json!({"building": "Tower", "floor": "anything"}),
                Some(3),
            ),
            &registry,
            &mut Vec::new(),
        ));
        let units = result["units"].as_array().expect("unit list");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0]["key"], json!("Tower/T-100"));
        assert_eq!(units[0]["load_state"], json!("pending"));
    }

    #[test]
    fn unit_query_misses_return_an_empty_list() {
        let registry = sample_registry();
        let result = result_of(handle_rpc_request(
            &request(
                "get_glbs_by_unit",
                json!({"building": "Fifth", "floor": "First", "unit": "F-404"}),
                Some(4),
            ),
            &registry,
            &mut Vec::new(),
        ));
        assert_eq!(result["units"], json!([]));
    }

    #[test]
    fn unknown_methods_and_bad_params_are_reported() {
        let registry = sample_registry();
        let unknown = error_of(handle_rpc_request(
            &request("paint_it_red", json!({}), Some(5)),
            &registry,
            &mut Vec::new(),
        ));
        assert_eq!(unknown.code, -32601);

        let mut commands = Vec::new();
        let bad = error_of(handle_rpc_request(
            &request("select_floor", json!({"building": 12}), Some(6)),
            &registry,
            &mut commands,
        ));
        assert_eq!(bad.code, -32602);
        assert!(commands.is_empty());

        let missing = error_of(handle_rpc_request(
            &request("get_glbs_by_floor", json!({"building": "Fifth"}), Some(7)),
            &registry,
            &mut Vec::new(),
        ));
        assert_eq!(missing.code, -32602);
    }

    #[test]
    fn queries_before_catalog_ingestion_are_not_ready() {
        let registry = AssetRegistry::default();
        let error = error_of(handle_rpc_request(
            &request("get_building_list", json!(null), Some(8)),
            &registry,
            &mut Vec::new(),
        ));
        assert_eq!(error, RpcError::not_ready());

        let status = result_of(handle_rpc_request(
            &request("get_load_status", json!(null), Some(9)),
            &registry,
            &mut Vec::new(),
        ));
        assert_eq!(status["initialized"], json!(false));
    }

    #[test]
    fn navigation_before_catalog_ingestion_is_refused() {
        let registry = AssetRegistry::default();
        let mut commands = Vec::new();
        let error = error_of(handle_rpc_request(
            &request(
                "select_unit",
                json!({"building": "Fifth", "floor": "First", "unit": "F-180"}),
                Some(10),
            ),
            &registry,
            &mut commands,
        ));
        assert_eq!(error, RpcError::not_ready());

        let response = handle_rpc_request(
            &request("select_building", json!({"building": "Fifth"}), None),
            &registry,
            &mut commands,
        );
        assert!(response.is_none());
        assert!(commands.is_empty());

        for method in ["clear_selection", "hover_floor"] {
            handle_rpc_request(&request(method, json!(null), None), &registry, &mut commands);
        }
        assert_eq!(
            commands,
            vec![ScopeCommand::ClearSelection, ScopeCommand::HoverFloor(None)]
        );
    }

    #[test]
    fn requests_parse_without_params_or_id() {
        let parsed: RpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"clear_selection"}"#)
                .expect("valid request");
        assert!(parsed.params.is_null());
        assert!(parsed.id.is_none());
    }
}
