// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use covergrid_imaging::Scene;
use covergrid_text::{Align, FontFace};
use covergrid_tiles::{TileCollection, TileContent};
use covergrid_view::Measure;
use kurbo::Rect;
use peniko::Color;

use crate::cover::CoverArt;
use crate::layout::{CoverLayout, cover_crop};
use crate::render::RenderError;

/// Paints the cover into a scene in unscaled page coordinates.
///
/// Draw order is: white page, heading, then for each tile its background,
/// label and content. Songs show their cropped cover art with title and
/// artist underneath; free text is wrapped and centered in the tile body.
///
/// Without a font, no text is drawn. Cover art that fails to load fails the
/// whole scene.
pub fn build_scene(
    tiles: &TileCollection,
    layout: &CoverLayout,
    heading: &str,
    font: Option<&FontFace>,
    art: &mut dyn CoverArt,
) -> Result<Scene, RenderError> {
    let metrics = layout.metrics();
    let mut scene = Scene::new(layout.natural_size());
    scene.fill_rect(layout.bounds(), Color::WHITE);
    match font {
        Some(font) => font.fill_line(
            &mut scene,
            heading,
            metrics.heading_size,
            Color::BLACK,
            layout.heading(),
            Align::Center,
        ),
        None => tracing::debug!("no font configured, drawing cover without text"),
    }

    for (tile, boxes) in tiles.iter().zip(layout.tiles()) {
        let colors = tile.colors();
        let text = colors.text.to_peniko();
        scene.fill_rect(boxes.frame, colors.background.to_peniko());
        if let Some(font) = font {
            font.fill_line(
                &mut scene,
                &tile.label,
                metrics.label_size,
                text,
                boxes.label,
                Align::Start,
            );
        }
        match &tile.content {
            TileContent::Empty => {}
            TileContent::Song(song) => {
                if let Some(reference) = &song.cover {
                    let image = art.load(reference).map_err(|source| RenderError::Cover {
                        index: tile.index,
                        reference: reference.clone(),
                        source,
                    })?;
                    let src = cover_crop(image.bounds().size(), boxes.art.size());
                    let id = scene.add_image(image);
                    scene.draw_image_rect(id, src, boxes.art);
                }
                if let Some(font) = font {
                    let caption = boxes.caption;
                    let mid = caption.center().y;
                    let title_row = Rect::new(caption.x0, caption.y0, caption.x1, mid);
                    let artist_row = Rect::new(caption.x0, mid, caption.x1, caption.y1);
                    font.fill_line(
                        &mut scene,
                        &song.title,
                        metrics.title_size,
                        text,
                        title_row,
                        Align::Center,
                    );
                    font.fill_line(
                        &mut scene,
                        &song.artist,
                        metrics.artist_size,
                        text,
                        artist_row,
                        Align::Center,
                    );
                }
            }
            TileContent::FreeText(free) => {
                if let Some(font) = font {
                    font.fill_wrapped(&mut scene, free, metrics.free_text_size, text, boxes.body);
                }
            }
        }
    }
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use covergrid_color::{Color as TileColor, Rgb};
    use covergrid_imaging::{DrawOp, RasterImage};
    use covergrid_text::FontFace;
    use covergrid_tiles::{MemoryStorage, Song, TileContent, TilePatch, TileStore};
    use peniko::Color;

    use super::build_scene;
    use crate::cover::{CoverArt, CoverError};
    use crate::layout::CoverLayout;
    use crate::render::RenderError;

    const FONT: &[u8] = include_bytes!("../../assets/fonts/dejavu/DejaVuSans.ttf");

    #[derive(Default)]
    struct Covers(HashMap<String, RasterImage>);

    impl CoverArt for Covers {
        fn load(&mut self, reference: &str) -> Result<RasterImage, CoverError> {
            self.0.get(reference).cloned().ok_or_else(|| {
                CoverError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, reference))
            })
        }
    }

    fn fills(ops: &[DrawOp]) -> Vec<Color> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn without_font_only_backgrounds_are_drawn() {
        let store = TileStore::open(MemoryStorage::new());
        let layout = CoverLayout::default();
        let scene = build_scene(store.tiles(), &layout, "Heading", None, &mut Covers::default())
            .unwrap();
        let colors = fills(scene.ops());
        assert_eq!(colors.len(), 10, "page plus nine tiles");
        assert_eq!(colors[0], Color::WHITE);
        assert_eq!(colors[4], Rgb::from_u32(0x40_40_40).to_peniko(), "tile 3 is the dark token");
        assert!(
            scene.ops().iter().all(|op| matches!(op, DrawOp::FillRect { .. })),
            "no text without a font"
        );
        assert_eq!(scene.size(), layout.bounds().size());
    }

    #[test]
    fn overrides_paint_the_tile() {
        let mut store = TileStore::open(MemoryStorage::new());
        let navy = TileColor::Rgb(Rgb::new(0, 0, 128));
        store.set_tile(2, TilePatch::new().background(Some(navy))).unwrap();
        let scene = build_scene(
            store.tiles(),
            &CoverLayout::default(),
            "",
            None,
            &mut Covers::default(),
        )
        .unwrap();
        assert_eq!(fills(scene.ops())[3], navy.to_peniko());
    }

    #[test]
    fn songs_embed_cropped_art() {
        let mut store = TileStore::open(MemoryStorage::new());
        let song = Song::new("7", "Title", "Artist").with_cover("art/7.png");
        store
            .set_tile(5, TilePatch::new().content(TileContent::Song(song)))
            .unwrap();
        let mut covers = Covers::default();
        covers.0.insert(
            "art/7.png".into(),
            RasterImage::new(4, 2, [9_u8, 9, 9, 255].repeat(8)).unwrap(),
        );
        let layout = CoverLayout::default();
        let scene = build_scene(store.tiles(), &layout, "", None, &mut covers).unwrap();
        assert_eq!(scene.images().len(), 1);
        let draws: Vec<_> = scene
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::DrawImage { src, dst, .. } => Some((*src, *dst)),
                _ => None,
            })
            .collect();
        assert_eq!(draws.len(), 1);
        let (src, dst) = draws[0];
        assert_eq!(dst, layout.tiles()[5].art);
        assert_eq!(src, kurbo::Rect::new(1.0, 0.0, 3.0, 2.0), "center square of a 4x2 image");
    }

    #[test]
    fn missing_art_fails_the_scene() {
        let mut store = TileStore::open(MemoryStorage::new());
        let song = Song::new("7", "Title", "Artist").with_cover("gone.png");
        store
            .set_tile(8, TilePatch::new().content(TileContent::Song(song)))
            .unwrap();
        let err = build_scene(
            store.tiles(),
            &CoverLayout::default(),
            "",
            None,
            &mut Covers::default(),
        )
        .unwrap_err();
        match err {
            RenderError::Cover { index, reference, .. } => {
                assert_eq!(index, 8);
                assert_eq!(reference, "gone.png");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn text_is_drawn_with_a_font() {
        let mut store = TileStore::open(MemoryStorage::new());
        store
            .set_tile(
                0,
                TilePatch::new().content(TileContent::FreeText("first dance".into())),
            )
            .unwrap();
        store
            .set_tile(
                1,
                TilePatch::new().content(TileContent::Song(Song::new("1", "Hey", "Jude"))),
            )
            .unwrap();
        let font = FontFace::new(FONT).unwrap();
        let scene = build_scene(
            store.tiles(),
            &CoverLayout::default(),
            "Heading",
            Some(&font),
            &mut Covers::default(),
        )
        .unwrap();
        let paths = scene
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::FillPath { .. }))
            .count();
        // Heading, nine labels, one free text line, a title and an artist.
        assert_eq!(paths, 13);
    }
}
