// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Covergrid Tiles: the tile state model and its persistence.
//!
//! A cover is a fixed 3×3 grid. Each [`Tile`] has a stable index, an editable
//! category label, optional content (a [`Song`] or free text) and optional
//! color overrides. The nine tiles form a [`TileCollection`].
//!
//! [`TileStore`] owns the collection:
//! - On [`load`](TileStore::load) it reads the `songs` key from a [`Storage`]
//!   backend and validates it. Anything missing or invalid falls back to the
//!   canonical defaults; the failure is logged, never surfaced.
//! - Every mutation ([`set_tile`](TileStore::set_tile),
//!   [`clear_tile`](TileStore::clear_tile), [`reset`](TileStore::reset))
//!   overwrites the stored value.
//!
//! ```rust
//! use covergrid_tiles::{MemoryStorage, TileContent, TilePatch, TileStore};
//!
//! let mut store = TileStore::open(MemoryStorage::new());
//! store
//!     .set_tile(0, TilePatch::new().content(TileContent::FreeText("Intro".into())))
//!     .unwrap();
//!
//! // Reopening over the same storage sees the edit.
//! let store = TileStore::open(store.into_storage());
//! assert_eq!(
//!     store.tile(0).unwrap().content,
//!     TileContent::FreeText("Intro".into())
//! );
//! ```
//!
//! Validation requires the stored label *set* to equal the canonical one. A
//! renamed label is kept in memory and persisted, but the next load rejects
//! the stored value and starts over from the defaults.

mod model;
mod storage;
mod store;
pub mod wire;

pub use model::{CANONICAL_LABELS, Song, TILE_COUNT, Tile, TileCollection, TileContent, TilePatch};
pub use storage::{
    FileStorage, MemoryStorage, Storage, StorageError, StorageResult, default_state_dir,
};
pub use store::{STORAGE_KEY, TileError, TileStore};
pub use wire::ValidationError;
