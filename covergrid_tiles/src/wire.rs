// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON form of a tile collection.
//!
//! The stored value is an array of nine records in index order:
//!
//! ```json
//! [{"index":0,"label":"Blue","kind":"song",
//!   "song":{"id":"42","title":"Hey","artist":"Someone","cover":"https://…"},
//!   "backgroundColor":"#112233","textColor":"text-light"}, …]
//! ```
//!
//! Unknown keys are ignored. Anything else that does not fit (a missing or
//! unknown `kind`, a missing payload, an unparseable color, a wrong count or
//! index, a label set that is not the canonical one) rejects the whole value.

use std::fmt;

use covergrid_color::Color;
use serde::{Deserialize, Serialize};

use crate::model::{Song, TILE_COUNT, Tile, TileCollection, TileContent, labels_are_canonical};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
enum Kind {
    Empty,
    Song,
    FreeText,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TileRecord {
    index: usize,
    label: String,
    kind: Kind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    song: Option<Song>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    background_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text_color: Option<Color>,
}

impl From<&Tile> for TileRecord {
    fn from(tile: &Tile) -> Self {
        let (kind, song, text) = match &tile.content {
            TileContent::Empty => (Kind::Empty, None, None),
            TileContent::Song(song) => (Kind::Song, Some(song.clone()), None),
            TileContent::FreeText(text) => (Kind::FreeText, None, Some(text.clone())),
        };
        Self {
            index: tile.index,
            label: tile.label.clone(),
            kind,
            song,
            text,
            background_color: tile.background,
            text_color: tile.text_color,
        }
    }
}

impl TileRecord {
    fn into_tile(self) -> Result<Tile, ValidationError> {
        let content = match self.kind {
            Kind::Empty => TileContent::Empty,
            Kind::Song => TileContent::Song(self.song.ok_or(ValidationError::MissingPayload {
                index: self.index,
                field: "song",
            })?),
            Kind::FreeText => {
                TileContent::FreeText(self.text.ok_or(ValidationError::MissingPayload {
                    index: self.index,
                    field: "text",
                })?)
            }
        };
        Ok(Tile {
            index: self.index,
            label: self.label,
            content,
            background: self.background_color,
            text_color: self.text_color,
        })
    }
}

/// Why a stored value was rejected.
#[derive(Debug)]
pub enum ValidationError {
    /// The value is not the expected JSON shape.
    Decode(serde_json::Error),
    /// The array does not hold exactly nine records.
    Count {
        /// Number of records found.
        found: usize,
    },
    /// A record is out of position.
    Index {
        /// Position in the array.
        position: usize,
        /// Index carried by the record.
        found: usize,
    },
    /// The label set is not the canonical one.
    Labels,
    /// A `song` or `freeText` record without its payload.
    MissingPayload {
        /// Index of the record.
        index: usize,
        /// Name of the missing field.
        field: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "malformed tile data: {e}"),
            Self::Count { found } => write!(f, "expected {TILE_COUNT} tiles, found {found}"),
            Self::Index { position, found } => {
                write!(f, "record at position {position} has index {found}")
            }
            Self::Labels => f.write_str("tile labels are not the canonical set"),
            Self::MissingPayload { index, field } => {
                write!(f, "tile {index} is missing its `{field}` field")
            }
        }
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e)
    }
}

/// Serializes a collection to its stored JSON form.
pub fn encode(tiles: &TileCollection) -> Result<String, serde_json::Error> {
    let records: Vec<TileRecord> = tiles.iter().map(TileRecord::from).collect();
    serde_json::to_string(&records)
}

/// Parses and validates a stored JSON value.
pub fn decode(json: &str) -> Result<TileCollection, ValidationError> {
    let records: Vec<TileRecord> = serde_json::from_str(json)?;
    if records.len() != TILE_COUNT {
        return Err(ValidationError::Count {
            found: records.len(),
        });
    }
    if !labels_are_canonical(records.iter().map(|r| r.label.as_str())) {
        return Err(ValidationError::Labels);
    }
    let mut tiles = Vec::with_capacity(TILE_COUNT);
    for (position, record) in records.into_iter().enumerate() {
        if record.index != position {
            return Err(ValidationError::Index {
                position,
                found: record.index,
            });
        }
        tiles.push(record.into_tile()?);
    }
    let tiles: [Tile; TILE_COUNT] = tiles
        .try_into()
        .map_err(|v: Vec<Tile>| ValidationError::Count { found: v.len() })?;
    Ok(TileCollection::from_tiles(tiles))
}
