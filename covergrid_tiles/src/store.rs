// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;

use crate::model::{TILE_COUNT, Tile, TileCollection, TileContent, TilePatch};
use crate::storage::Storage;
use crate::wire;

/// Storage key holding the tile collection.
pub const STORAGE_KEY: &str = "songs";

/// Error returned by single-tile edits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileError {
    /// The index is not `0..9`.
    OutOfRange {
        /// The rejected index.
        index: usize,
    },
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index } => {
                write!(f, "tile index {index} is out of range 0..{TILE_COUNT}")
            }
        }
    }
}

impl std::error::Error for TileError {}

/// Owner of the tile collection and its persistence.
///
/// The in-memory collection is authoritative. Every mutation overwrites the
/// stored value; storage failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct TileStore<S> {
    storage: S,
    tiles: TileCollection,
}

impl<S: Storage> TileStore<S> {
    /// Opens a store and loads its collection from `storage`.
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            storage,
            tiles: TileCollection::canonical(),
        };
        store.load();
        store
    }

    /// Reloads the collection from storage.
    ///
    /// Missing, unreadable or invalid data yields the canonical defaults.
    /// Loading never writes.
    pub fn load(&mut self) -> &TileCollection {
        self.tiles = match self.storage.read(STORAGE_KEY) {
            Ok(Some(json)) => match wire::decode(&json) {
                Ok(tiles) => tiles,
                Err(error) => {
                    tracing::warn!(
                        key = STORAGE_KEY,
                        error = %error,
                        "stored tiles are invalid, using defaults"
                    );
                    TileCollection::canonical()
                }
            },
            Ok(None) => {
                tracing::debug!(key = STORAGE_KEY, "no stored tiles, using defaults");
                TileCollection::canonical()
            }
            Err(error) => {
                tracing::warn!(
                    backend = self.storage.name(),
                    key = STORAGE_KEY,
                    error = %error,
                    "failed to read stored tiles, using defaults"
                );
                TileCollection::canonical()
            }
        };
        &self.tiles
    }

    /// The current collection.
    #[must_use]
    pub fn tiles(&self) -> &TileCollection {
        &self.tiles
    }

    /// The tile at `index`.
    pub fn tile(&self, index: usize) -> Result<&Tile, TileError> {
        self.tiles.get(index).ok_or(TileError::OutOfRange { index })
    }

    /// Replaces every tile with its canonical default and persists.
    pub fn reset(&mut self) -> &TileCollection {
        self.tiles = TileCollection::canonical();
        self.persist();
        &self.tiles
    }

    /// Applies `patch` to the tile at `index` and persists.
    ///
    /// Other tiles are untouched. An out-of-range index changes nothing.
    pub fn set_tile(&mut self, index: usize, patch: TilePatch) -> Result<&Tile, TileError> {
        let tile = self
            .tiles
            .get_mut(index)
            .ok_or(TileError::OutOfRange { index })?;
        patch.apply(tile);
        self.persist();
        self.tile(index)
    }

    /// Empties the content of the tile at `index`, keeping label and overrides.
    pub fn clear_tile(&mut self, index: usize) -> Result<&Tile, TileError> {
        self.set_tile(index, TilePatch::new().content(TileContent::Empty))
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consumes the store and returns its backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&self) {
        let json = match wire::encode(&self.tiles) {
            Ok(json) => json,
            Err(error) => {
                tracing::warn!(error = %error, "failed to encode tiles, not persisted");
                return;
            }
        };
        if let Err(error) = self.storage.write(STORAGE_KEY, &json) {
            tracing::warn!(
                backend = self.storage.name(),
                key = STORAGE_KEY,
                error = %error,
                "failed to persist tiles"
            );
        }
    }
}
