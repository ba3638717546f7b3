/// Asset locations for the structural catalog and unit GLBs.
pub mod path;

/// Canvas selector the engine binds to when embedded in the leasing site.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub const CANVAS_SELECTOR: &str = "#bevy";

/// Native window title.
pub const WINDOW_TITLE: &str = "Leasing Scene";
