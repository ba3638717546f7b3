use bevy::prelude::*;
use serde::Serialize;

use crate::engine::catalog::key_resolver::KeyResolver;

/// A selection level, also used for the resolved effective scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum Scope {
    #[default]
    None,
    Building {
        building: String,
    },
    Floor {
        building: String,
        floor: String,
    },
    Unit {
        building: String,
        floor: String,
        unit: String,
    },
}

impl Scope {
    pub fn building(building: &str) -> Self {
        Self::Building {
            building: building.to_string(),
        }
    }

    pub fn floor(building: &str, floor: &str) -> Self {
        Self::Floor {
            building: building.to_string(),
            floor: floor.to_string(),
        }
    }

    pub fn unit(building: &str, floor: &str, unit: &str) -> Self {
        Self::Unit {
            building: building.to_string(),
            floor: floor.to_string(),
            unit: unit.to_string(),
        }
    }

    /// Whether `self` is a building or floor selection containing the unit.
    /// On buildings without floors every floor selection spans the whole building.
    fn encloses_unit(&self, building: &str, floor: &str, resolver: &KeyResolver) -> bool {
        match self {
            Self::Building { building: b } => b == building,
            Self::Floor { building: b, floor: f } => {
                b == building && (!resolver.has_floors(building) || f == floor)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Hover {
    #[default]
    None,
    Unit {
        building: String,
        floor: String,
        unit: String,
    },
    Floor {
        building: String,
        floor: String,
    },
}

impl Hover {
    fn as_scope(&self) -> Option<Scope> {
        match self {
            Self::None => None,
            Self::Unit {
                building,
                floor,
                unit,
            } => Some(Scope::unit(building, floor, unit)),
            Self::Floor { building, floor } => Some(Scope::floor(building, floor)),
        }
    }
}

/// Current selection and hover. Each setter recomputes the effective scope by
/// bumping `revision`.
#[derive(Resource, Debug, Default)]
pub struct ScopeController {
    selection: Scope,
    hover: Hover,
    /// Building/floor selection that was active when the current unit was picked.
    enclosing: Option<Scope>,
    revision: u64,
}

impl ScopeController {
    pub fn select_building(&mut self, building: Option<&str>) {
        self.set_selection(building.map_or(Scope::None, Scope::building));
    }

    pub fn select_floor(&mut self, floor: Option<(&str, &str)>) {
        self.set_selection(floor.map_or(Scope::None, |(b, f)| Scope::floor(b, f)));
    }

    /// Select a unit, remembering an enclosing building or floor selection so
    /// [`Self::clear_unit_selection`] can return to it.
    pub fn select_unit(&mut self, unit: Option<(&str, &str, &str)>, resolver: &KeyResolver) {
        let Some((building, floor, unit)) = unit else {
            self.set_selection(Scope::None);
            return;
        };

        let enclosing = match &self.selection {
            Scope::Unit { .. } => self.enclosing.take(),
            other => Some(other.clone()),
        }
        .filter(|scope| scope.encloses_unit(building, floor, resolver));

        self.selection = Scope::unit(building, floor, unit);
        self.enclosing = enclosing;
        self.bump();
    }

    /// Set or clear a unit hover. Clearing only affects a unit hover.
    pub fn hover_unit(&mut self, unit: Option<(&str, &str, &str)>) {
        match unit {
            Some((building, floor, unit)) => {
                self.hover = Hover::Unit {
                    building: building.to_string(),
                    floor: floor.to_string(),
                    unit: unit.to_string(),
                };
            }
            None if matches!(self.hover, Hover::Unit { .. }) => self.hover = Hover::None,
            None => return,
        }
        self.bump();
    }

    /// Set or clear a floor hover. Clearing only affects a floor hover.
    pub fn hover_floor(&mut self, floor: Option<(&str, &str)>) {
        match floor {
            Some((building, floor)) => {
                self.hover = Hover::Floor {
                    building: building.to_string(),
                    floor: floor.to_string(),
                };
            }
            None if matches!(self.hover, Hover::Floor { .. }) => self.hover = Hover::None,
            None => return,
        }
        self.bump();
    }

    /// Reset selection and hover to `None`.
    pub fn clear_selection(&mut self) {
        self.hover = Hover::None;
        self.set_selection(Scope::None);
    }

    /// Drop the unit level, falling back to the enclosing floor/building
    /// selection the unit was picked from, if any.
    pub fn clear_unit_selection(&mut self) {
        if !matches!(self.selection, Scope::Unit { .. }) {
            return;
        }
        let restored = self.enclosing.take().unwrap_or_default();
        self.set_selection(restored);
    }

    /// Hover when present, otherwise the selection.
    pub fn effective_scope(&self) -> Scope {
        self.hover
            .as_scope()
            .unwrap_or_else(|| self.selection.clone())
    }

    pub fn selection(&self) -> &Scope {
        &self.selection
    }

    #[cfg(test)]
    pub fn hover(&self) -> &Hover {
        &self.hover
    }

    pub fn is_hovering(&self) -> bool {
        self.hover != Hover::None
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn set_selection(&mut self, selection: Scope) {
        self.selection = selection;
        self.enclosing = None;
        self.bump();
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> KeyResolver {
        KeyResolver::default()
    }

    fn selection_levels(controller: &ScopeController) -> usize {
        match controller.selection() {
            Scope::None => 0,
            _ => 1,
        }
    }

    #[test]
    fn selection_setters_are_mutually_exclusive() {
        let mut controller = ScopeController::default();
        controller.select_building(Some("Fifth"));
        controller.select_floor(Some(("Fifth", "First")));
        controller.select_unit(Some(("Fifth", "First", "F-180")), &rules());
        assert_eq!(controller.selection(), &Scope::unit("Fifth", "First", "F-180"));
        assert_eq!(selection_levels(&controller), 1);

        controller.select_building(Some("Tower"));
        assert_eq!(controller.selection(), &Scope::building("Tower"));

        controller.select_floor(None);
        assert_eq!(controller.selection(), &Scope::None);
    }

    #[test]
    fn hover_floor_overrides_everything() {
        let mut controller = ScopeController::default();
        controller.select_unit(Some(("Fifth", "First", "F-180")), &rules());
        controller.hover_unit(Some(("Fifth", "Second", "F-201")));
        controller.hover_floor(Some(("Fifth", "Ground")));
        assert_eq!(controller.effective_scope(), Scope::floor("Fifth", "Ground"));
        assert!(matches!(controller.hover(), Hover::Floor { .. }));
    }

    #[test]
    fn hover_unit_overrides_selection() {
        let mut controller = ScopeController::default();
        controller.select_floor(Some(("Fifth", "First")));
        controller.hover_unit(Some(("Tower", "", "T-100")));
        assert_eq!(controller.effective_scope(), Scope::unit("Tower", "", "T-100"));
    }

    #[test]
    fn clearing_hover_restores_selection() {
        let mut controller = ScopeController::default();
        controller.select_unit(Some(("Fifth", "First", "F-180")), &rules());
        let before = controller.effective_scope();

        controller.hover_unit(Some(("Tower", "", "T-110")));
        controller.hover_unit(None);
        assert_eq!(controller.effective_scope(), before);
        assert_eq!(controller.selection(), &Scope::unit("Fifth", "First", "F-180"));
    }

    #[test]
    fn hover_setters_replace_each_other() {
        let mut controller = ScopeController::default();
        controller.hover_floor(Some(("Fifth", "First")));
        controller.hover_unit(Some(("Fifth", "First", "F-101")));
        assert!(matches!(controller.hover(), Hover::Unit { .. }));

        // A stale floor-leave does not cancel the unit hover.
        controller.hover_floor(None);
        assert!(matches!(controller.hover(), Hover::Unit { .. }));

        controller.hover_floor(Some(("Fifth", "Second")));
        assert!(matches!(controller.hover(), Hover::Floor { .. }));
        controller.hover_floor(None);
        assert_eq!(controller.hover(), &Hover::None);
    }

    #[test]
    fn clear_selection_resets_hover_too() {
        let mut controller = ScopeController::default();
        controller.select_building(Some("Fifth"));
        controller.hover_floor(Some(("Fifth", "First")));
        controller.clear_selection();
        assert_eq!(controller.effective_scope(), Scope::None);
        assert!(!controller.is_hovering());
    }

    #[test]
    fn clear_unit_selection_returns_to_enclosing_floor() {
        let mut controller = ScopeController::default();
        controller.select_floor(Some(("Fifth", "First")));
        controller.select_unit(Some(("Fifth", "First", "F-101")), &rules());
        controller.select_unit(Some(("Fifth", "First", "F-180")), &rules());
        controller.clear_unit_selection();
        assert_eq!(controller.selection(), &Scope::floor("Fifth", "First"));
    }

    #[test]
    fn any_floor_selection_encloses_units_of_flat_buildings() {
        let mut controller = ScopeController::default();
        controller.select_floor(Some(("Tower", "anything")));
        controller.select_unit(Some(("Tower", "", "T-100")), &rules());
        controller.clear_unit_selection();
        assert_eq!(controller.selection(), &Scope::floor("Tower", "anything"));
    }

    #[test]
    fn clear_unit_selection_returns_to_enclosing_building() {
        let mut controller = ScopeController::default();
        controller.select_building(Some("Tower"));
        controller.select_unit(Some(("Tower", "", "T-100")), &rules());
        controller.clear_unit_selection();
        assert_eq!(controller.selection(), &Scope::building("Tower"));
    }

    #[test]
    fn clear_unit_selection_without_enclosing_scope_clears() {
        let mut controller = ScopeController::default();
        controller.select_floor(Some(("Fifth", "Second")));
        controller.select_unit(Some(("Fifth", "First", "F-101")), &rules());
        controller.clear_unit_selection();
        assert_eq!(controller.selection(), &Scope::None);
    }

    #[test]
    fn clear_unit_selection_ignores_non_unit_selections() {
        let mut controller = ScopeController::default();
        controller.select_floor(Some(("Fifth", "First")));
        let revision = controller.revision();
        controller.clear_unit_selection();
        assert_eq!(controller.selection(), &Scope::floor("Fifth", "First"));
        assert_eq!(controller.revision(), revision);
    }

    #[test]
    fn every_transition_bumps_revision() {
        let mut controller = ScopeController::default();
        let start = controller.revision();
        controller.select_building(Some("Fifth"));
        controller.hover_unit(Some(("Fifth", "First", "F-101")));
        controller.hover_unit(None);
        assert_eq!(controller.revision(), start + 3);
    }
}
