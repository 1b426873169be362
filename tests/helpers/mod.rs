#![allow(dead_code)]

use kioku::config::CityConfig;
use kioku::store::types::PinDraft;
use kioku::store::Store;
use std::path::Path;

/// Kyoto city center — always inside the registration boundary.
pub const IN_BOUNDS: (f64, f64) = (35.0116, 135.7681);

/// Osaka station — outside both boundaries.
pub const OUT_OF_BOUNDS: (f64, f64) = (34.7024, 135.4959);

/// Default Kyoto config pointed at a database inside `dir`.
pub fn test_config(dir: &Path) -> CityConfig {
    let mut config = CityConfig::default();
    config.storage.db_path = dir.join("pins.db").to_string_lossy().into_owned();
    config
}

/// Open a store backed by a database inside `dir`.
pub fn test_store(dir: &Path) -> Store {
    Store::open(&test_config(dir)).unwrap()
}

/// A valid glyph-pin draft at the city center.
pub fn text_draft(glyph: &str) -> PinDraft {
    PinDraft::text(IN_BOUNDS.0, IN_BOUNDS.1, glyph)
}

/// A valid photo-pin draft at the city center.
pub fn photo_draft(uri: &str) -> PinDraft {
    PinDraft::photo(IN_BOUNDS.0, IN_BOUNDS.1, uri)
}
