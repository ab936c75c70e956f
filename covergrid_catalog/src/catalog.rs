// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;
use std::io;

use covergrid_tiles::Song;

use crate::search::SearchState;

/// One page of search results.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongPage {
    /// Songs on this page, in catalog order.
    pub songs: Vec<Song>,
    /// Zero-based page number.
    pub page: u32,
    /// Whether a following page has results.
    pub has_more: bool,
}

impl SongPage {
    /// A page with no results.
    #[must_use]
    pub fn empty(page: u32) -> Self {
        Self {
            songs: Vec::new(),
            page,
            has_more: false,
        }
    }

    /// Whether the page holds no songs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

/// Error returned by a [`SongCatalog`].
#[derive(Debug)]
pub enum LookupError {
    /// Catalog data could not be read.
    Io(io::Error),
    /// Catalog data is not a song list.
    Decode(serde_json::Error),
    /// The catalog cannot answer right now.
    Unavailable(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "catalog I/O error: {e}"),
            Self::Decode(e) => write!(f, "malformed catalog: {e}"),
            Self::Unavailable(msg) => write!(f, "catalog unavailable: {msg}"),
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<io::Error> for LookupError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e)
    }
}

/// A source of songs.
pub trait SongCatalog {
    /// Searches for `query` and returns page `page` of the results.
    ///
    /// `query` is already trimmed and non-empty.
    fn search(&self, query: &str, page: u32) -> Result<SongPage, LookupError>;
}

impl<C: SongCatalog + ?Sized> SongCatalog for &C {
    fn search(&self, query: &str, page: u32) -> Result<SongPage, LookupError> {
        (**self).search(query, page)
    }
}

/// Runs the search described by `state`.
///
/// An inactive search returns an empty page without asking the catalog.
/// Catalog errors are logged and also give an empty page.
pub fn lookup<C: SongCatalog + ?Sized>(catalog: &C, state: &SearchState) -> SongPage {
    if !state.is_active() {
        return SongPage::empty(state.page());
    }
    match catalog.search(state.query(), state.page()) {
        Ok(page) => page,
        Err(error) => {
            tracing::warn!(
                query = state.query(),
                page = state.page(),
                error = %error,
                "song lookup failed"
            );
            SongPage::empty(state.page())
        }
    }
}
