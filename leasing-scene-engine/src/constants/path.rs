/// Structural catalog, relative to the asset directory.
pub const RELATIVE_CATALOG_PATH: &str = "catalog/scene.catalog.json";

/// Root directory for unit GLBs when the catalog does not name one.
pub const DEFAULT_UNIT_ASSET_ROOT: &str = "units";
