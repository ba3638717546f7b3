use bevy::prelude::*;

use super::scope_controller::ScopeController;
use crate::engine::registry::asset_registry::AssetRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorAddress {
    pub building: String,
    pub floor: String,
}

impl FloorAddress {
    pub fn new(building: &str, floor: &str) -> Self {
        Self {
            building: building.to_string(),
            floor: floor.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitAddress {
    pub building: String,
    pub floor: String,
    pub unit: String,
}

impl UnitAddress {
    pub fn new(building: &str, floor: &str, unit: &str) -> Self {
        Self {
            building: building.to_string(),
            floor: floor.to_string(),
            unit: unit.to_string(),
        }
    }
}

/// Navigation command from the UI collaborator. `None` payloads are the
/// "clear" form of the command.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum ScopeCommand {
    SelectBuilding(Option<String>),
    SelectFloor(Option<FloorAddress>),
    SelectUnit(Option<UnitAddress>),
    HoverUnit(Option<UnitAddress>),
    HoverFloor(Option<FloorAddress>),
    ClearSelection,
    ClearUnitSelection,
}

/// Apply one command. Targets with no catalog entry are logged and dropped so
/// the current scope survives a bad address. Returns whether the controller changed.
pub fn apply_scope_command(
    controller: &mut ScopeController,
    registry: &AssetRegistry,
    command: &ScopeCommand,
) -> bool {
    match command {
        ScopeCommand::SelectBuilding(Some(building)) => {
            if !building_known(registry, building) {
                return false;
            }
            controller.select_building(Some(building.as_str()));
        }
        ScopeCommand::SelectBuilding(None) => controller.select_building(None),
        ScopeCommand::SelectFloor(Some(address)) => {
            if !floor_known(registry, address) {
                return false;
            }
            controller.select_floor(Some((address.building.as_str(), address.floor.as_str())));
        }
        ScopeCommand::SelectFloor(None) => controller.select_floor(None),
        ScopeCommand::SelectUnit(Some(address)) => {
            if !unit_known(registry, address) {
                return false;
            }
            controller.select_unit(
                Some((
                    address.building.as_str(),
                    address.floor.as_str(),
                    address.unit.as_str(),
                )),
                registry.resolver(),
            );
        }
        ScopeCommand::SelectUnit(None) => controller.select_unit(None, registry.resolver()),
        ScopeCommand::HoverUnit(Some(address)) => {
            if !unit_known(registry, address) {
                return false;
            }
            controller.hover_unit(Some((
                address.building.as_str(),
                address.floor.as_str(),
                address.unit.as_str(),
            )));
        }
        ScopeCommand::HoverUnit(None) => controller.hover_unit(None),
        ScopeCommand::HoverFloor(Some(address)) => {
            if !floor_known(registry, address) {
                return false;
            }
            controller.hover_floor(Some((address.building.as_str(), address.floor.as_str())));
        }
        ScopeCommand::HoverFloor(None) => controller.hover_floor(None),
        ScopeCommand::ClearSelection => controller.clear_selection(),
        ScopeCommand::ClearUnitSelection => controller.clear_unit_selection(),
    }
    true
}

fn building_known(registry: &AssetRegistry, building: &str) -> bool {
    let known = registry.contains_building(building);
    if !known {
        warn!("No catalog entry for building {:?}, command ignored", building);
    }
    known
}

fn floor_known(registry: &AssetRegistry, address: &FloorAddress) -> bool {
    let known = !registry.by_floor(&address.building, &address.floor).is_empty();
    if !known {
        warn!(
            "No catalog entry for floor {:?}/{:?}, command ignored",
            address.building, address.floor
        );
    }
    known
}

fn unit_known(registry: &AssetRegistry, address: &UnitAddress) -> bool {
    let known = registry
        .by_unit(&address.building, &address.floor, &address.unit)
        .is_some();
    if !known {
        warn!(
            "No catalog entry for unit {:?}/{:?}/{:?}, command ignored",
            address.building, address.floor, address.unit
        );
    }
    known
}

/// Drain queued navigation commands into the scope controller.
pub fn apply_scope_commands(
    mut events: EventReader<ScopeCommand>,
    registry: Res<AssetRegistry>,
    mut controller: ResMut<ScopeController>,
) {
    for command in events.read() {
        apply_scope_command(&mut controller, &registry, command);
    }
}

/// Escape clears everything, Backspace drops the unit level (native builds only).
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_scope_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut commands: EventWriter<ScopeCommand>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        commands.write(ScopeCommand::ClearSelection);
    }

    if keyboard.just_pressed(KeyCode::Backspace) {
        commands.write(ScopeCommand::ClearUnitSelection);
    }
}

/// Navigation is driven by RPC only in WASM builds.
#[cfg(target_arch = "wasm32")]
pub fn handle_scope_keyboard_shortcuts() {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scope::scope_controller::Scope;
    use crate::engine::test_support::sample_registry;

    #[test]
    fn unknown_unit_leaves_scope_untouched() {
        let registry = sample_registry();
        let mut controller = ScopeController::default();
        controller.select_floor(Some(("Fifth", "First")));
        let revision = controller.revision();

        let applied = apply_scope_command(
            &mut controller,
            &registry,
            &ScopeCommand::SelectUnit(Some(UnitAddress::new("Fifth", "First", "F-404"))),
        );

        assert!(!applied);
        assert_eq!(controller.selection(), &Scope::floor("Fifth", "First"));
        assert_eq!(controller.revision(), revision);
    }

    #[test]
    fn unknown_floor_and_building_are_dropped() {
        let registry = sample_registry();
        let mut controller = ScopeController::default();

        assert!(!apply_scope_command(
            &mut controller,
            &registry,
            &ScopeCommand::HoverFloor(Some(FloorAddress::new("Fifth", "Basement"))),
        ));
        assert!(!apply_scope_command(
            &mut controller,
            &registry,
            &ScopeCommand::SelectBuilding(Some("Nowhere".to_string())),
        ));
        assert_eq!(controller.effective_scope(), Scope::None);
    }

    #[test]
    fn flat_building_floor_selection_accepts_any_floor() {
        let registry = sample_registry();
        let mut controller = ScopeController::default();
        assert!(apply_scope_command(
            &mut controller,
            &registry,
            &ScopeCommand::SelectFloor(Some(FloorAddress::new("Tower", "anything"))),
        ));
        assert_eq!(registry.members(&controller.effective_scope()).len(), 2);
    }

    #[test]
    fn padded_unit_commands_resolve() {
        let registry = sample_registry();
        let mut controller = ScopeController::default();
        assert!(apply_scope_command(
            &mut controller,
            &registry,
            &ScopeCommand::SelectUnit(Some(UnitAddress::new("Fifth", "First", "F-180"))),
        ));
        let members = registry.members(&controller.effective_scope());
        let expected = registry.resolver().resolve("Fifth", "First", "F-180 ");
        assert!(members.contains(&expected));
    }

    #[test]
    fn clear_commands_always_apply() {
        let registry = sample_registry();
        let mut controller = ScopeController::default();
        for command in [
            ScopeCommand::SelectBuilding(None),
            ScopeCommand::HoverUnit(None),
            ScopeCommand::ClearSelection,
            ScopeCommand::ClearUnitSelection,
        ] {
            assert!(apply_scope_command(&mut controller, &registry, &command));
        }
    }
}
