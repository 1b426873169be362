//! The local memory store — source of truth for pins, categories, their
//! links, and per-pin context metadata.
//!
//! One [`Store`] is constructed at process start and handed to the screens;
//! there is exactly one writer (the UI thread) and every operation is
//! synchronous. Mutations live in [`repo`], derived reads in [`query`], the
//! ephemeral category filter in [`selection`], and durability in [`persist`].

mod persist;
mod query;
mod repo;
mod selection;
pub mod types;

use anyhow::Result;
use rusqlite::Connection;
use thiserror::Error;
use tracing::info;

use crate::config::CityConfig;
use crate::db;
use crate::geo::Geofence;
use persist::{Collections, SnapshotWriter};
use selection::Selection;

/// Everything a store operation can fail with.
///
/// Persistence failures are deliberately absent: snapshot writes are
/// fire-and-forget and reported through the log, never through an operation's
/// return value.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The coordinate fails the registration boundary. The write is rejected,
    /// never clamped.
    #[error("coordinate ({lat}, {lng}) is outside the registration boundary")]
    OutOfBounds { lat: f64, lng: f64 },

    /// The display-determining field for the chosen pin type is missing.
    #[error("a {pin_type} pin requires {field}")]
    MissingField {
        pin_type: types::PinType,
        field: &'static str,
    },

    #[error("category name must not be empty")]
    EmptyCategoryName,

    /// Pin ids are never user-supplied, so this indicates a caller bug
    /// (typically stale UI state), not a recoverable user-facing condition.
    #[error("pin not found: {0}")]
    PinNotFound(String),

    #[error("category not found: {0}")]
    CategoryNotFound(String),
}

/// The store handle. Owns the four collections, the geofence gate, the
/// ephemeral selection state, and the background snapshot writer.
pub struct Store {
    geofence: Geofence,
    collections: Collections,
    selection: Selection,
    writer: SnapshotWriter,
}

impl Store {
    /// Open the store for the configured city: open the database, restore the
    /// last snapshot (seeding default categories when there is none or it is
    /// unreadable), and start the snapshot writer.
    pub fn open(config: &CityConfig) -> Result<Self> {
        let conn = db::open_database(config.resolved_db_path())?;
        Self::from_connection(conn, config.geofence(), &config.storage.seed_categories)
    }

    pub(crate) fn from_connection(
        conn: Connection,
        geofence: Geofence,
        seed_categories: &[String],
    ) -> Result<Self> {
        let collections = match persist::load_collections(&conn) {
            Some(collections) => {
                info!(
                    pins = collections.pins.len(),
                    categories = collections.categories.len(),
                    "snapshot restored"
                );
                collections
            }
            None => {
                info!(
                    seeds = seed_categories.len(),
                    "no usable snapshot, starting from seed state"
                );
                Collections::seeded(seed_categories)
            }
        };

        Ok(Self {
            geofence,
            collections,
            selection: Selection::default(),
            writer: SnapshotWriter::spawn(conn),
        })
    }

    /// The city geofence this store validates against.
    pub fn geofence(&self) -> &Geofence {
        &self.geofence
    }

    /// Block until every queued snapshot has reached the database. Called
    /// when the app is backgrounded; mutations themselves never wait.
    pub fn flush(&self) {
        self.writer.flush();
    }

    /// Hand the current state to the background writer. Called at the end of
    /// every successful mutation; returns immediately.
    pub(crate) fn schedule_persist(&self) {
        self.writer.submit(self.collections.clone());
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::CityConfig;

    /// An in-memory store with the default Kyoto geofence and seeds.
    pub fn memory_store() -> Store {
        let config = CityConfig::default();
        let conn = db::open_memory_database().unwrap();
        Store::from_connection(conn, config.geofence(), &config.storage.seed_categories)
            .unwrap()
    }

    /// An in-memory store with no seed categories.
    pub fn empty_store() -> Store {
        let config = CityConfig::default();
        let conn = db::open_memory_database().unwrap();
        Store::from_connection(conn, config.geofence(), &[]).unwrap()
    }
}
