//! Local memory-pin store for a single-city map journal.
//!
//! kioku is the data layer of a map app that lets one user drop "memory pins"
//! (a photo or a single glyph) inside a fixed city boundary, tag them with
//! free-form categories, and browse them on a map. The screens are thin;
//! this crate is the source of truth they all talk to.
//!
//! # Architecture
//!
//! - **State**: four in-memory collections (pins, categories, pin↔category
//!   links, per-pin context metadata) owned by one [`store::Store`], mutated
//!   only from the UI thread
//! - **Durability**: full-state JSON snapshots in SQLite, written by a
//!   background thread after every mutation — fire-and-forget, latest wins
//! - **Geofencing**: a strict registration boundary gates every pin write; a
//!   wider display boundary only clamps the map viewport
//!
//! # Modules
//!
//! - [`config`] — per-city deployment configuration (bounds, seed categories,
//!   storage path) from TOML files and environment variables
//! - [`db`] — SQLite initialization for the snapshot namespace
//! - [`geo`] — boundary containment and viewport clamping
//! - [`store`] — the store proper: repository mutations, derived queries,
//!   selection state, snapshot persistence

pub mod config;
pub mod db;
pub mod geo;
pub mod store;
