//! Snapshot persistence.
//!
//! The in-memory collections are authoritative; durability is a full-state
//! snapshot written after every mutation. Each of the four collections is one
//! JSON blob in the `snapshots` table, keyed by collection name — the same
//! shape the original app kept in its device key-value storage.
//!
//! Writes are fire-and-forget: mutations publish a snapshot into a single
//! pending slot and return immediately. A dedicated writer thread owns the
//! database connection and drains the slot, coalescing bursts into the latest
//! state. At most one write is ever in flight, so snapshot records cannot
//! interleave. A failed write is logged and the session continues from
//! memory.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use tracing::{debug, warn};

use super::types::{Category, ContextMeta, Pin, PinCategory};

const COLLECTION_PINS: &str = "pins";
const COLLECTION_CATEGORIES: &str = "categories";
const COLLECTION_LINKS: &str = "pinCategories";
const COLLECTION_CONTEXT: &str = "contextMeta";

/// The four owned collections, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Collections {
    pub pins: Vec<Pin>,
    pub categories: Vec<Category>,
    pub links: Vec<PinCategory>,
    pub context: Vec<ContextMeta>,
}

impl Collections {
    /// Empty collections plus the configured seed categories — the state a
    /// fresh (or unrecoverable) install starts from.
    pub fn seeded(seed_categories: &[String]) -> Self {
        Self {
            categories: seed_categories
                .iter()
                .map(|name| Category {
                    id: uuid::Uuid::now_v7().to_string(),
                    name: name.clone(),
                })
                .collect(),
            ..Self::default()
        }
    }
}

/// Restore all four collections from the snapshot table.
///
/// Returns `None` when there is no prior data — including when any stored
/// blob fails to parse, which callers treat the same way (fall back to the
/// seed state rather than failing startup).
pub(crate) fn load_collections(conn: &Connection) -> Option<Collections> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))
        .unwrap_or(0);
    if count == 0 {
        return None;
    }

    Some(Collections {
        pins: load_blob(conn, COLLECTION_PINS)?,
        categories: load_blob(conn, COLLECTION_CATEGORIES)?,
        links: load_blob(conn, COLLECTION_LINKS)?,
        context: load_blob(conn, COLLECTION_CONTEXT)?,
    })
}

/// Read and parse one collection blob. A missing row is an empty collection;
/// an unparseable one poisons the whole restore.
fn load_blob<T: DeserializeOwned>(conn: &Connection, collection: &str) -> Option<Vec<T>> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM snapshots WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )
        .optional()
        .ok()?;

    match body {
        None => Some(Vec::new()),
        Some(json) => match serde_json::from_str(&json) {
            Ok(records) => Some(records),
            Err(err) => {
                warn!(collection, %err, "snapshot blob unreadable, discarding stored state");
                None
            }
        },
    }
}

/// Write all four collections in one transaction.
pub(crate) fn write_collections(conn: &mut Connection, collections: &Collections) -> Result<()> {
    let tx = conn.transaction().context("failed to begin snapshot write")?;

    write_blob(&tx, COLLECTION_PINS, &collections.pins)?;
    write_blob(&tx, COLLECTION_CATEGORIES, &collections.categories)?;
    write_blob(&tx, COLLECTION_LINKS, &collections.links)?;
    write_blob(&tx, COLLECTION_CONTEXT, &collections.context)?;

    tx.commit().context("failed to commit snapshot write")?;
    Ok(())
}

fn write_blob<T: Serialize>(
    conn: &Connection,
    collection: &str,
    records: &[T],
) -> Result<()> {
    let body = serde_json::to_string(records)
        .with_context(|| format!("failed to serialize {collection}"))?;
    conn.execute(
        "INSERT OR REPLACE INTO snapshots (collection, body, updated_at) VALUES (?1, ?2, ?3)",
        params![collection, body, chrono::Utc::now().to_rfc3339()],
    )
    .with_context(|| format!("failed to write {collection}"))?;
    Ok(())
}

/// Single-slot background writer.
///
/// `submit` replaces whatever snapshot was still pending (latest wins); the
/// writer thread takes the slot, writes, and goes back to sleep. `flush`
/// blocks until the slot is drained and nothing is in flight.
pub(crate) struct SnapshotWriter {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

struct Shared {
    slot: Mutex<Slot>,
    cv: Condvar,
}

#[derive(Default)]
struct Slot {
    pending: Option<Collections>,
    in_flight: bool,
    shutdown: bool,
}

impl SnapshotWriter {
    /// Spawn the writer thread. The thread takes sole ownership of the
    /// connection — nothing else touches the database after this.
    pub fn spawn(mut conn: Connection) -> Self {
        let shared = Arc::new(Shared {
            slot: Mutex::new(Slot::default()),
            cv: Condvar::new(),
        });

        let thread_shared = Arc::clone(&shared);
        let handle = std::thread::Builder::new()
            .name("kioku-snapshot".into())
            .spawn(move || writer_loop(&mut conn, &thread_shared))
            .expect("failed to spawn snapshot writer thread");

        Self {
            shared,
            handle: Some(handle),
        }
    }

    /// Queue a snapshot, replacing any not-yet-written one. Never blocks on
    /// the actual write.
    pub fn submit(&self, collections: Collections) {
        let mut slot = self.shared.slot.lock().unwrap();
        if slot.shutdown {
            warn!("snapshot writer already shut down, dropping snapshot");
            return;
        }
        slot.pending = Some(collections);
        self.shared.cv.notify_all();
    }

    /// Block until the pending slot is empty and no write is in flight.
    pub fn flush(&self) {
        let mut slot = self.shared.slot.lock().unwrap();
        while slot.pending.is_some() || slot.in_flight {
            slot = self.shared.cv.wait(slot).unwrap();
        }
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        {
            let mut slot = self.shared.slot.lock().unwrap();
            slot.shutdown = true;
            self.shared.cv.notify_all();
        }
        if let Some(handle) = self.handle.take() {
            // The loop writes any still-pending snapshot before exiting
            let _ = handle.join();
        }
    }
}

fn writer_loop(conn: &mut Connection, shared: &Shared) {
    loop {
        let snapshot = {
            let mut slot = shared.slot.lock().unwrap();
            loop {
                if let Some(snapshot) = slot.pending.take() {
                    slot.in_flight = true;
                    break snapshot;
                }
                if slot.shutdown {
                    return;
                }
                slot = shared.cv.wait(slot).unwrap();
            }
        };

        match write_collections(conn, &snapshot) {
            Ok(()) => debug!(
                pins = snapshot.pins.len(),
                categories = snapshot.categories.len(),
                "snapshot written"
            ),
            // Non-fatal: in-memory state stays authoritative for the session
            Err(err) => warn!(%err, "snapshot write failed, state kept in memory only"),
        }

        let mut slot = shared.slot.lock().unwrap();
        slot.in_flight = false;
        shared.cv.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::store::types::PinType;

    fn sample() -> Collections {
        Collections {
            pins: vec![Pin {
                id: "p1".into(),
                lat: 35.0116,
                lng: 135.7681,
                pin_type: PinType::Text,
                photo_uri: None,
                background_uri: None,
                text_char: Some("寺".into()),
                rank: 2,
                note: Some("evening walk".into()),
                visited_at: chrono::Utc::now(),
                created_at: chrono::Utc::now(),
            }],
            categories: vec![Category {
                id: "c1".into(),
                name: "寺社".into(),
            }],
            links: vec![PinCategory {
                pin_id: "p1".into(),
                category_id: "c1".into(),
            }],
            context: vec![ContextMeta {
                pin_id: "p1".into(),
                slot1: Some("快晴".into()),
                slot2: None,
                slot3: None,
                slot4: None,
            }],
        }
    }

    #[test]
    fn write_then_load_round_trips() {
        let mut conn = db::open_memory_database().unwrap();
        let before = sample();
        write_collections(&mut conn, &before).unwrap();

        let after = load_collections(&conn).expect("snapshot should load");
        assert_eq!(after, before);
    }

    #[test]
    fn empty_database_loads_as_no_prior_data() {
        let conn = db::open_memory_database().unwrap();
        assert!(load_collections(&conn).is_none());
    }

    #[test]
    fn corrupt_blob_loads_as_no_prior_data() {
        let mut conn = db::open_memory_database().unwrap();
        write_collections(&mut conn, &sample()).unwrap();
        conn.execute(
            "UPDATE snapshots SET body = 'not json' WHERE collection = 'pins'",
            [],
        )
        .unwrap();

        assert!(load_collections(&conn).is_none());
    }

    #[test]
    fn seeded_collections_carry_only_categories() {
        let seeds = vec!["寺社".to_string(), "グルメ".to_string()];
        let collections = Collections::seeded(&seeds);
        assert!(collections.pins.is_empty());
        assert!(collections.links.is_empty());
        assert!(collections.context.is_empty());
        let names: Vec<_> = collections.categories.iter().map(|c| &c.name).collect();
        assert_eq!(names, ["寺社", "グルメ"]);
    }

    #[test]
    fn writer_coalesces_and_flushes() {
        let conn = db::open_memory_database().unwrap();
        let writer = SnapshotWriter::spawn(conn);
        for _ in 0..50 {
            writer.submit(sample());
        }
        writer.flush();
        // flush returned: slot drained, nothing in flight
        writer.submit(sample());
        writer.flush();
    }
}
