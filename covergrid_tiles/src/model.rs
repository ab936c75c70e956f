// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::BTreeSet;

use covergrid_color::{Color, ResolvedColors, resolve};
use serde::{Deserialize, Serialize};

/// Number of tiles in a cover.
pub const TILE_COUNT: usize = 9;

/// Category labels of a fresh collection, in tile index order.
pub const CANONICAL_LABELS: [&str; TILE_COUNT] = [
    "Blue", "Yellow", "Red", "Black", "White", "Orange", "Pink", "Purple", "Green",
];

/// A song as returned by a catalog lookup.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Song {
    /// Stable catalog identifier.
    pub id: String,
    /// Song title.
    pub title: String,
    /// Performing artist.
    pub artist: String,
    /// Album name, when the catalog knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Cover art reference: an `http(s)` URL or a local path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

impl Song {
    /// Creates a song without album or cover.
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: None,
            cover: None,
        }
    }

    /// Sets the cover art reference.
    #[must_use]
    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = Some(cover.into());
        self
    }

    /// Sets the album name.
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }
}

/// What a tile shows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TileContent {
    /// Nothing assigned yet.
    #[default]
    Empty,
    /// A song picked from the catalog.
    Song(Song),
    /// Text typed by the user instead of a song.
    FreeText(String),
}

impl TileContent {
    /// Returns `true` for [`TileContent::Empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The song, if this is song content.
    #[must_use]
    pub fn song(&self) -> Option<&Song> {
        match self {
            Self::Song(song) => Some(song),
            _ => None,
        }
    }
}

/// One cell of the grid.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    /// Position in the grid, `0..9`. Never reassigned.
    pub index: usize,
    /// Category name shown above the content.
    pub label: String,
    /// Assigned content.
    pub content: TileContent,
    /// Background override; `None` uses the palette default for the index.
    pub background: Option<Color>,
    /// Text color override; `None` uses the computed contrast color.
    pub text_color: Option<Color>,
}

impl Tile {
    /// A fresh tile: canonical label, no content, no overrides.
    ///
    /// Indices past the grid wrap around the label list.
    #[must_use]
    pub fn canonical(index: usize) -> Self {
        Self {
            index,
            label: CANONICAL_LABELS[index % TILE_COUNT].to_owned(),
            content: TileContent::Empty,
            background: None,
            text_color: None,
        }
    }

    /// The colors this tile is painted with.
    #[must_use]
    pub fn colors(&self) -> ResolvedColors {
        resolve(self.index, self.background, self.text_color)
    }
}

/// The nine tiles of a cover, indexed by position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileCollection {
    tiles: [Tile; TILE_COUNT],
}

impl Default for TileCollection {
    fn default() -> Self {
        Self::canonical()
    }
}

impl TileCollection {
    /// All tiles empty, with canonical labels and no overrides.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            tiles: std::array::from_fn(Tile::canonical),
        }
    }

    /// Builds a collection from tiles already in index order.
    pub(crate) fn from_tiles(tiles: [Tile; TILE_COUNT]) -> Self {
        debug_assert!(
            tiles.iter().enumerate().all(|(i, t)| t.index == i),
            "tiles must be in index order"
        );
        Self { tiles }
    }

    /// The tiles in index order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile; TILE_COUNT] {
        &self.tiles
    }

    /// The tile at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(index)
    }

    /// Iterates over the tiles in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    /// Whether the set of labels equals the canonical set.
    ///
    /// Order is ignored and duplicates collapse.
    #[must_use]
    pub fn has_canonical_labels(&self) -> bool {
        labels_are_canonical(self.tiles.iter().map(|t| t.label.as_str()))
    }
}

impl<'a> IntoIterator for &'a TileCollection {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub(crate) fn labels_are_canonical<'a>(labels: impl IntoIterator<Item = &'a str>) -> bool {
    let found: BTreeSet<&str> = labels.into_iter().collect();
    let canonical: BTreeSet<&str> = CANONICAL_LABELS.into_iter().collect();
    found == canonical
}

/// A partial edit of one tile.
///
/// Fields left as `None` are not touched. The color fields use a nested
/// option so an override can be cleared with `Some(None)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TilePatch {
    /// New label.
    pub label: Option<String>,
    /// New content.
    pub content: Option<TileContent>,
    /// Set (`Some(Some(_))`) or clear (`Some(None)`) the background override.
    pub background: Option<Option<Color>>,
    /// Set (`Some(Some(_))`) or clear (`Some(None)`) the text color override.
    pub text_color: Option<Option<Color>>,
}

impl TilePatch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Replaces the content.
    #[must_use]
    pub fn content(mut self, content: TileContent) -> Self {
        self.content = Some(content);
        self
    }

    /// Sets or clears the background override.
    #[must_use]
    pub fn background(mut self, color: Option<Color>) -> Self {
        self.background = Some(color);
        self
    }

    /// Sets or clears the text color override.
    #[must_use]
    pub fn text_color(mut self, color: Option<Color>) -> Self {
        self.text_color = Some(color);
        self
    }

    /// Whether applying this patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.content.is_none()
            && self.background.is_none()
            && self.text_color.is_none()
    }

    pub(crate) fn apply(self, tile: &mut Tile) {
        if let Some(label) = self.label {
            tile.label = label;
        }
        if let Some(content) = self.content {
            tile.content = content;
        }
        if let Some(background) = self.background {
            tile.background = background;
        }
        if let Some(text_color) = self.text_color {
            tile.text_color = text_color;
        }
    }
}
