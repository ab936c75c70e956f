// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fs;
use std::path::Path;

use covergrid_tiles::Song;

use crate::catalog::{LookupError, SongCatalog, SongPage};

/// Results per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// A catalog backed by an in-memory song list.
///
/// The list is usually loaded from a JSON array of songs:
///
/// ```json
/// [{"id":"1","title":"Everlong","artist":"Foo Fighters","cover":"art/everlong.jpg"}]
/// ```
///
/// A song matches when its title or artist contains the query, ignoring case.
#[derive(Clone, Debug)]
pub struct JsonCatalog {
    songs: Vec<Song>,
    page_size: usize,
}

impl JsonCatalog {
    /// A catalog over `songs`.
    #[must_use]
    pub fn new(songs: Vec<Song>) -> Self {
        Self {
            songs,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Parses a JSON song list.
    pub fn from_json(json: &str) -> Result<Self, LookupError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Reads and parses a JSON song list from `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LookupError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.display(),
            songs = catalog.songs.len(),
            "loaded song catalog"
        );
        Ok(catalog)
    }

    /// Sets the number of results per page. Zero is treated as one.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Results per page.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Every song in the catalog.
    #[must_use]
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }
}

impl SongCatalog for JsonCatalog {
    fn search(&self, query: &str, page: u32) -> Result<SongPage, LookupError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(SongPage::empty(page));
        }
        let skip = usize::try_from(page)
            .unwrap_or(usize::MAX)
            .saturating_mul(self.page_size);
        let mut matches = self.songs.iter().filter(|song| {
            song.title.to_lowercase().contains(&needle)
                || song.artist.to_lowercase().contains(&needle)
        });
        let songs: Vec<Song> = matches.by_ref().skip(skip).take(self.page_size).cloned().collect();
        let has_more = matches.next().is_some();
        Ok(SongPage {
            songs,
            page,
            has_more,
        })
    }
}

#[cfg(test)]
mod tests {
    use covergrid_tiles::Song;

    use super::JsonCatalog;
    use crate::catalog::{LookupError, SongCatalog};

    fn catalog() -> JsonCatalog {
        JsonCatalog::new(vec![
            Song::new("1", "Yellow", "Coldplay"),
            Song::new("2", "Fix You", "Coldplay"),
            Song::new("3", "Yellow Submarine", "The Beatles"),
            Song::new("4", "Clocks", "Coldplay"),
            Song::new("5", "Let It Be", "The Beatles"),
        ])
        .with_page_size(2)
    }

    fn ids(catalog: &JsonCatalog, query: &str, page: u32) -> Vec<String> {
        let page = catalog.search(query, page).unwrap();
        page.songs.into_iter().map(|s| s.id).collect()
    }

    #[test]
    fn matches_title_or_artist_ignoring_case() {
        let catalog = catalog().with_page_size(10);
        assert_eq!(ids(&catalog, "YELLOW", 0), ["1", "3"]);
        assert_eq!(ids(&catalog, "beatles", 0), ["3", "5"]);
        assert!(ids(&catalog, "queen", 0).is_empty(), "no match");
    }

    #[test]
    fn pages_are_fixed_size() {
        let catalog = catalog();
        let first = catalog.search("coldplay", 0).unwrap();
        assert_eq!(first.songs.len(), 2);
        assert!(first.has_more, "a third Coldplay song follows");
        let second = catalog.search("coldplay", 1).unwrap();
        assert_eq!(second.songs.len(), 1);
        assert!(!second.has_more, "last page");
        assert!(catalog.search("coldplay", 7).unwrap().is_empty(), "far past the end");
    }

    #[test]
    fn parses_the_song_list_format() {
        let catalog = JsonCatalog::from_json(
            r#"[{"id":"9","title":"Clair de Lune","artist":"Debussy","cover":"art/clair.jpg"}]"#,
        )
        .unwrap();
        assert_eq!(catalog.songs()[0].cover.as_deref(), Some("art/clair.jpg"));
        assert!(matches!(
            JsonCatalog::from_json("{}"),
            Err(LookupError::Decode(_))
        ));
    }

    #[test]
    fn zero_page_size_is_one() {
        assert_eq!(catalog().with_page_size(0).page_size(), 1);
    }
}
