/// Semantic floor order; anything not listed sorts lexically after these.
/// Matching is case-insensitive.
pub const CANONICAL_FLOOR_ORDER: &[&str] = &["ground", "first", "second", "third"];

/// Rank of a floor name in the canonical order, if it has one.
pub fn canonical_floor_rank(floor: &str) -> Option<usize> {
    CANONICAL_FLOOR_ORDER
        .iter()
        .position(|name| name.eq_ignore_ascii_case(floor.trim()))
}
