// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Covergrid Catalog: where songs come from.
//!
//! The cover core never searches for songs itself. It consumes a [`Song`]
//! picked from a [`SongPage`], which some [`SongCatalog`] produced. This crate
//! holds that seam plus the bits of search behavior every front end shares:
//!
//! - [`SearchState`] tracks the keyword and page of the search panel and
//!   decides which paging requests are allowed.
//! - [`lookup`] runs a search and turns any failure into an empty page.
//! - [`JsonCatalog`] serves songs from a local JSON file.
//!
//! ```rust
//! use covergrid_catalog::{JsonCatalog, SearchState, lookup};
//! use covergrid_tiles::Song;
//!
//! let catalog = JsonCatalog::new(vec![
//!     Song::new("1", "Everlong", "Foo Fighters"),
//!     Song::new("2", "Hey Jude", "The Beatles"),
//! ]);
//! let mut search = SearchState::new();
//! search.submit("beatles");
//! let page = lookup(&catalog, &search);
//! assert_eq!(page.songs[0].title, "Hey Jude");
//! ```
//!
//! [`Song`]: covergrid_tiles::Song

mod catalog;
mod json;
mod search;

pub use catalog::{LookupError, SongCatalog, SongPage, lookup};
pub use json::{DEFAULT_PAGE_SIZE, JsonCatalog};
pub use search::{MAX_PAGE, SearchState};
