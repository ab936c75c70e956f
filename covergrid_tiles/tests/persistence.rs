// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for loading and persisting tile collections through a [`TileStore`].

use covergrid_color::{Color, Rgb, Token};
use covergrid_tiles::{
    CANONICAL_LABELS, FileStorage, MemoryStorage, STORAGE_KEY, Song, Storage, TileCollection,
    TileContent, TilePatch, TileStore,
};

fn edited_store<S: Storage>(storage: S) -> TileStore<S> {
    let mut store = TileStore::open(storage);
    store
        .set_tile(
            0,
            TilePatch::new().content(TileContent::Song(
                Song::new("42", "Everlong", "Foo Fighters")
                    .with_album("The Colour and the Shape")
                    .with_cover("https://example.com/everlong.jpg"),
            )),
        )
        .unwrap();
    store
        .set_tile(
            4,
            TilePatch::new()
                .content(TileContent::FreeText("first dance".into()))
                .background(Some(Color::Rgb(Rgb::new(0, 0, 128))))
                .text_color(Some(Color::Token(Token::TextDark))),
        )
        .unwrap();
    store
        .set_tile(8, TilePatch::new().background(Some(Color::Token(Token::Pink200))))
        .unwrap();
    store
}

#[test]
fn reset_then_load_gives_canonical_labels() {
    let mut store = edited_store(MemoryStorage::new());
    store.reset();
    let tiles = store.load();
    let labels: Vec<&str> = tiles.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, CANONICAL_LABELS);
    assert!(tiles.iter().all(|t| t.content.is_empty()), "reset empties every tile");
}

#[test]
fn persist_then_reload_is_field_for_field() {
    let store = edited_store(MemoryStorage::new());
    let before = store.tiles().clone();
    let reopened = TileStore::open(store.into_storage());
    assert_eq!(reopened.tiles(), &before);
}

#[test]
fn persist_then_reload_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = edited_store(FileStorage::new(dir.path()));
    let before = store.tiles().clone();
    drop(store);
    let reopened = TileStore::open(FileStorage::new(dir.path()));
    assert_eq!(reopened.tiles(), &before);
}

#[test]
fn foreign_label_set_falls_back_to_defaults() {
    let records: Vec<String> = ["A", "B", "C", "D", "E", "F", "G", "H", "I"]
        .iter()
        .enumerate()
        .map(|(i, label)| {
            format!(
                r#"{{"index":{i},"label":"{label}","kind":"freeText","text":"t{i}"}}"#
            )
        })
        .collect();
    let storage = MemoryStorage::with_entry(STORAGE_KEY, format!("[{}]", records.join(",")));
    let store = TileStore::open(storage);
    assert_eq!(store.tiles(), &TileCollection::canonical());
    assert!(store.tiles().iter().all(|t| t.content.is_empty()), "all tiles empty");
}

#[test]
fn garbage_falls_back_without_writing() {
    let storage = MemoryStorage::with_entry(STORAGE_KEY, "{ definitely not tiles");
    let store = TileStore::open(storage);
    assert_eq!(store.tiles(), &TileCollection::canonical());
    assert_eq!(
        store.storage().read(STORAGE_KEY).unwrap().as_deref(),
        Some("{ definitely not tiles"),
        "loading leaves stored data alone"
    );
}

#[test]
fn renamed_label_resets_on_next_load() {
    let mut store = TileStore::open(MemoryStorage::new());
    store
        .set_tile(1, TilePatch::new().label("Mustard").content(TileContent::FreeText("x".into())))
        .unwrap();
    assert_eq!(store.tile(1).unwrap().label, "Mustard");
    let reopened = TileStore::open(store.into_storage());
    assert_eq!(reopened.tiles(), &TileCollection::canonical());
}
