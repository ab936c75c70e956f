// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use covergrid_tiles::TILE_COUNT;
use covergrid_view::Measure;
use kurbo::{Rect, Size};

const COLUMNS: usize = 3;

/// Dimensions of the cover page, in unscaled pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutMetrics {
    /// Page width.
    pub width: f64,
    /// Padding on the left, top and right of the page.
    pub padding: f64,
    /// Padding below the grid.
    pub padding_bottom: f64,
    /// Height of the heading band above the grid.
    pub heading_height: f64,
    /// Heading font size.
    pub heading_size: f32,
    /// Gap between grid cells, both ways.
    pub gap: f64,
    /// Padding inside each tile.
    pub tile_padding: f64,
    /// Height of the label line at the top of a tile.
    pub label_height: f64,
    /// Label font size.
    pub label_size: f32,
    /// Space between the label line and the tile body.
    pub label_gap: f64,
    /// Edge of the square cover art.
    pub art_size: f64,
    /// Height of the caption under the art.
    pub caption_height: f64,
    /// Song title font size.
    pub title_size: f32,
    /// Artist font size.
    pub artist_size: f32,
    /// Free text font size.
    pub free_text_size: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            width: 790.0,
            padding: 32.0,
            padding_bottom: 16.0,
            heading_height: 80.0,
            heading_size: 32.0,
            gap: 16.0,
            tile_padding: 8.0,
            label_height: 20.0,
            label_size: 16.0,
            label_gap: 8.0,
            art_size: 200.0,
            caption_height: 40.0,
            title_size: 14.0,
            artist_size: 12.0,
            free_text_size: 18.0,
        }
    }
}

/// Boxes of one tile, in page coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TileBoxes {
    /// The whole tile, painted in its background color.
    pub frame: Rect,
    /// The label line.
    pub label: Rect,
    /// Everything under the label: art plus caption, or free text.
    pub body: Rect,
    /// The cover art square, centered at the top of the body.
    pub art: Rect,
    /// The caption under the art.
    pub caption: Rect,
}

/// Placement of everything on the cover page.
///
/// The page height is that of its content, but never less than its width.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverLayout {
    metrics: LayoutMetrics,
    size: Size,
    heading: Rect,
    tiles: [TileBoxes; TILE_COUNT],
}

impl Default for CoverLayout {
    fn default() -> Self {
        Self::new(LayoutMetrics::default())
    }
}

impl CoverLayout {
    /// Lays out a page with `metrics`.
    pub fn new(metrics: LayoutMetrics) -> Self {
        let m = &metrics;
        let inner_width = (m.width - 2.0 * m.padding).max(0.0);
        let column_width = ((inner_width - 2.0 * m.gap) / COLUMNS as f64).max(0.0);
        let content_width = (column_width - 2.0 * m.tile_padding).max(0.0);
        let art = m.art_size.min(content_width);
        let body_height = art + m.caption_height;
        let tile_height = 2.0 * m.tile_padding + m.label_height + m.label_gap + body_height;

        let heading = Rect::new(
            m.padding,
            m.padding,
            m.width - m.padding,
            m.padding + m.heading_height,
        );
        let grid_top = heading.y1;
        let tiles = core::array::from_fn(|index| {
            let row = (index / COLUMNS) as f64;
            let col = (index % COLUMNS) as f64;
            let x0 = m.padding + col * (column_width + m.gap);
            let y0 = grid_top + row * (tile_height + m.gap);
            let frame = Rect::new(x0, y0, x0 + column_width, y0 + tile_height);
            let inner = frame.inset(-m.tile_padding);
            let label = Rect::new(inner.x0, inner.y0, inner.x1, inner.y0 + m.label_height);
            let body = Rect::new(inner.x0, label.y1 + m.label_gap, inner.x1, inner.y1);
            let art_x = body.center().x - art / 2.0;
            let art_rect = Rect::new(art_x, body.y0, art_x + art, body.y0 + art);
            let caption = Rect::new(body.x0, art_rect.y1, body.x1, body.y1);
            TileBoxes {
                frame,
                label,
                body,
                art: art_rect,
                caption,
            }
        });
        let rows = TILE_COUNT.div_ceil(COLUMNS) as f64;
        let content_height =
            grid_top + rows * tile_height + (rows - 1.0) * m.gap + m.padding_bottom;
        Self {
            size: Size::new(m.width, content_height.max(m.width)),
            heading,
            tiles,
            metrics,
        }
    }

    /// The metrics this layout was built from.
    #[must_use]
    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// The heading band.
    #[must_use]
    pub fn heading(&self) -> Rect {
        self.heading
    }

    /// Boxes of every tile, in index order.
    #[must_use]
    pub fn tiles(&self) -> &[TileBoxes; TILE_COUNT] {
        &self.tiles
    }

    /// Boxes of the tile at `index`.
    #[must_use]
    pub fn tile(&self, index: usize) -> Option<&TileBoxes> {
        self.tiles.get(index)
    }

    /// The page.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.size.to_rect()
    }
}

impl Measure for CoverLayout {
    fn natural_size(&self) -> Size {
        self.size
    }
}

/// The part of an `image`-sized source that fills a `dst`-sized box.
///
/// The source is scaled to cover the box and cropped around its center, so
/// art is never stretched. Degenerate sizes give the whole image.
#[must_use]
pub fn cover_crop(image: Size, dst: Size) -> Rect {
    let whole = image.to_rect();
    if image.width <= 0.0 || image.height <= 0.0 || dst.width <= 0.0 || dst.height <= 0.0 {
        return whole;
    }
    let dst_aspect = dst.width / dst.height;
    if image.width / image.height > dst_aspect {
        let width = image.height * dst_aspect;
        let x0 = (image.width - width) / 2.0;
        Rect::new(x0, 0.0, x0 + width, image.height)
    } else {
        let height = image.width / dst_aspect;
        let y0 = (image.height - height) / 2.0;
        Rect::new(0.0, y0, image.width, y0 + height)
    }
}

#[cfg(test)]
mod tests {
    use covergrid_view::Measure;
    use kurbo::{Rect, Size};

    use super::{CoverLayout, LayoutMetrics, cover_crop};

    #[test]
    fn default_page_is_790_wide_and_at_least_square() {
        let layout = CoverLayout::default();
        let size = layout.natural_size();
        assert_eq!(size.width, 790.0);
        assert!(size.height >= size.width, "height {}", size.height);
        // 32 + 80 heading, three 284 rows, two 16 gaps, 16 bottom padding.
        assert_eq!(size.height, 1012.0);
    }

    #[test]
    fn short_content_is_padded_to_square() {
        let layout = CoverLayout::new(LayoutMetrics {
            art_size: 40.0,
            caption_height: 0.0,
            heading_height: 0.0,
            ..LayoutMetrics::default()
        });
        assert_eq!(layout.natural_size(), Size::new(790.0, 790.0));
    }

    #[test]
    fn tiles_form_a_three_by_three_grid() {
        let layout = CoverLayout::default();
        let tiles = layout.tiles();
        assert_eq!(tiles[0].frame.x0, 32.0);
        assert_eq!(tiles[0].frame.y0, layout.heading().y1);
        assert_eq!(tiles[1].frame.y0, tiles[0].frame.y0);
        assert_eq!(tiles[3].frame.x0, tiles[0].frame.x0);
        assert_eq!(tiles[1].frame.x0 - tiles[0].frame.x1, 16.0);
        assert_eq!(tiles[3].frame.y0 - tiles[0].frame.y1, 16.0);
        assert!((tiles[2].frame.x1 - 758.0).abs() < 1e-9, "right padding");
        for boxes in tiles {
            assert_eq!(boxes.art.width(), 200.0);
            assert_eq!(boxes.art.height(), 200.0);
            assert_eq!(boxes.label.height(), 20.0);
            assert_eq!(boxes.frame.union(boxes.body), boxes.frame, "body inside frame");
        }
        assert!(layout.tile(9).is_none(), "only nine tiles");
    }

    #[test]
    fn crop_keeps_the_center() {
        let wide = cover_crop(Size::new(400.0, 200.0), Size::new(100.0, 100.0));
        assert_eq!(wide, Rect::new(100.0, 0.0, 300.0, 200.0));
        let tall = cover_crop(Size::new(100.0, 300.0), Size::new(50.0, 50.0));
        assert_eq!(tall, Rect::new(0.0, 100.0, 100.0, 200.0));
        let empty = cover_crop(Size::new(10.0, 10.0), Size::ZERO);
        assert_eq!(empty, Rect::new(0.0, 0.0, 10.0, 10.0));
    }
}
