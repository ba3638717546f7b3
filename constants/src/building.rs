/// Explicit marker for units catalogued without a floor level
/// (production-stage units in otherwise floored buildings).
pub const EMPTY_FLOOR: &str = "";

/// A unit whose GLB filename differs from its trimmed identifier.
pub struct UnitPathQuirk {
    pub unit: &'static str,
    pub file_stem: &'static str,
}

pub struct BuildingRule {
    pub name: &'static str,
    pub has_floors: bool,
    pub unit_path_quirks: &'static [UnitPathQuirk],
}

/// Buildings missing from this table are floored and quirk-free.
pub const BUILDING_RULES: &[BuildingRule] = &[
    BuildingRule {
        name: "Tower",
        has_floors: false,
        unit_path_quirks: &[],
    },
    BuildingRule {
        name: "Fifth",
        has_floors: true,
        unit_path_quirks: &[
            UnitPathQuirk {
                unit: "F-180",
                file_stem: "F-180 ",
            },
            UnitPathQuirk {
                unit: "F-215",
                file_stem: "F-215 ",
            },
        ],
    },
    BuildingRule {
        name: "Maker",
        has_floors: true,
        unit_path_quirks: &[UnitPathQuirk {
            unit: "M-P02",
            file_stem: "M-P02  ",
        }],
    },
];

pub fn get_building_rule(name: &str) -> Option<&'static BuildingRule> {
    BUILDING_RULES.iter().find(|rule| rule.name == name)
}
