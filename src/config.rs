use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::geo::{BoundingBox, Geofence};

/// Per-city deployment configuration.
///
/// The app ships one of these per city; everything has a full default so a
/// missing config file yields the reference Kyoto deployment.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CityConfig {
    pub city: CitySection,
    pub bounds: BoundsSection,
    pub storage: StorageSection,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CitySection {
    pub name: String,
    pub center_lat: f64,
    pub center_lng: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BoundsSection {
    /// Strict boundary a pin must be registered inside.
    pub registration: BoundingBox,
    /// Wider boundary the map viewport is clamped to.
    pub display: BoundingBox,
    /// Maximum visible span (zoom-out cap).
    pub max_lat_delta: f64,
    pub max_lng_delta: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageSection {
    pub db_path: String,
    /// Categories created on first launch (or after a corrupt snapshot).
    pub seed_categories: Vec<String>,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            city: CitySection::default(),
            bounds: BoundsSection::default(),
            storage: StorageSection::default(),
        }
    }
}

impl Default for CitySection {
    fn default() -> Self {
        // Shijo-Kawaramachi
        Self {
            name: "Kyoto".into(),
            center_lat: 35.0116,
            center_lng: 135.7681,
        }
    }
}

impl Default for BoundsSection {
    fn default() -> Self {
        Self {
            // Main Kyoto City area: Kamigamo down to Fushimi, Arashiyama to Yamashina
            registration: BoundingBox {
                north: 35.0900,
                south: 34.9300,
                east: 135.8500,
                west: 135.6800,
            },
            // ~25 km around the center: includes Ohara, Hiei-zan, Uji; excludes Osaka
            display: BoundingBox {
                north: 35.24,
                south: 34.78,
                east: 136.04,
                west: 135.55,
            },
            max_lat_delta: 0.5,
            max_lng_delta: 0.5,
        }
    }
}

impl Default for StorageSection {
    fn default() -> Self {
        let db_path = default_kioku_dir()
            .join("pins.db")
            .to_string_lossy()
            .into_owned();
        Self {
            db_path,
            seed_categories: vec![
                "寺社".into(),
                "グルメ".into(),
                "カフェ".into(),
                "風景".into(),
            ],
        }
    }
}

/// Returns `~/.kioku/`
pub fn default_kioku_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".kioku")
}

/// Returns the default config file path: `~/.kioku/config.toml`
pub fn default_config_path() -> PathBuf {
    default_kioku_dir().join("config.toml")
}

impl CityConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            CityConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (KIOKU_DB).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("KIOKU_DB") {
            self.storage.db_path = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// The city's geofence, assembled from the bounds section.
    pub fn geofence(&self) -> Geofence {
        Geofence {
            registration: self.bounds.registration,
            display: self.bounds.display,
            max_lat_delta: self.bounds.max_lat_delta,
            max_lng_delta: self.bounds.max_lng_delta,
        }
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
