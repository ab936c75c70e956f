// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Covergrid Text: glyph outlines and simple line layout.
//!
//! [`FontFace`] wraps font bytes and turns short runs of text into filled
//! glyph paths inside a [`Scene`]. Layout is deliberately simple: one glyph
//! per character through the font's character map, advances from the
//! horizontal metrics, no shaping or kerning.
//!
//! The helpers in this crate cover what a cover needs:
//! - [`FontFace::fill_line`] draws a single line, shortened with an ellipsis
//!   when it does not fit its box.
//! - [`FontFace::fill_wrapped`] wraps a paragraph to its box and centers it.
//! - [`wrap`] and [`ellipsize`] are the measurement-driven layout rules,
//!   usable with any width function.

#![no_std]

extern crate alloc;

mod layout;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use covergrid_imaging::Scene;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{BezPath, Point, Rect};
use peniko::{Blob, Color, FontData};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::OutlinePen;
use skrifa::raw::ReadError;
use skrifa::{FontRef, GlyphId, MetadataProvider};

pub use layout::{Align, ELLIPSIS, ellipsize, wrap};

/// Error returned when font bytes cannot be used for drawing.
#[derive(Clone, Debug)]
pub enum FontError {
    /// The bytes are not a readable font.
    Parse(ReadError),
    /// The font has no scalable outlines.
    NoOutlines,
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "unreadable font: {err}"),
            Self::NoOutlines => f.write_str("font has no outline glyphs"),
        }
    }
}

impl core::error::Error for FontError {}

impl From<ReadError> for FontError {
    fn from(err: ReadError) -> Self {
        Self::Parse(err)
    }
}

/// Vertical metrics of a font at a given size, in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineMetrics {
    /// Distance from the baseline to the top of the line.
    pub ascent: f64,
    /// Distance from the baseline to the bottom of the line (positive).
    pub descent: f64,
    /// Extra spacing between lines.
    pub leading: f64,
}

impl LineMetrics {
    /// Baseline-to-baseline distance.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent + self.leading
    }
}

/// A parsed, outline-capable font.
#[derive(Clone)]
pub struct FontFace {
    font: FontData,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("index", &self.font.index)
            .field("bytes", &self.font.data.len())
            .finish_non_exhaustive()
    }
}

impl FontFace {
    /// Parses the first face in `bytes`.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, FontError> {
        Self::from_index(bytes, 0)
    }

    /// Parses face `index` of a font collection.
    pub fn from_index(bytes: impl Into<Vec<u8>>, index: u32) -> Result<Self, FontError> {
        let font = FontData::new(Blob::from(bytes.into()), index);
        let font_ref = FontRef::from_index(font.data.as_ref(), index)?;
        if font_ref.outline_glyphs().format().is_none() {
            return Err(FontError::NoOutlines);
        }
        Ok(Self { font })
    }

    fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(self.font.data.as_ref(), self.font.index).ok()
    }

    /// Vertical metrics at `size` pixels per em.
    #[must_use]
    pub fn line_metrics(&self, size: f32) -> LineMetrics {
        let Some(font) = self.font_ref() else {
            return fallback_metrics(size);
        };
        let m = font.metrics(Size::new(size), LocationRef::default());
        LineMetrics {
            ascent: f64::from(m.ascent),
            descent: f64::from(-m.descent),
            leading: f64::from(m.leading),
        }
    }

    /// Total advance of `text` at `size` pixels per em.
    #[must_use]
    pub fn advance(&self, text: &str, size: f32) -> f64 {
        let Some(font) = self.font_ref() else {
            return 0.0;
        };
        let charmap = font.charmap();
        let metrics = font.glyph_metrics(Size::new(size), LocationRef::default());
        text.chars()
            .map(|ch| {
                let gid = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
                f64::from(metrics.advance_width(gid).unwrap_or(size * 0.6))
            })
            .sum()
    }

    /// Outlines of `text` with its baseline starting at `origin`.
    #[must_use]
    pub fn glyph_path(&self, text: &str, origin: Point, size: f32) -> BezPath {
        let mut pen = FlipPen {
            path: BezPath::new(),
            origin,
        };
        let Some(font) = self.font_ref() else {
            return pen.path;
        };
        let charmap = font.charmap();
        let metrics = font.glyph_metrics(Size::new(size), LocationRef::default());
        let outlines = font.outline_glyphs();
        for ch in text.chars() {
            let gid = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
            if let Some(glyph) = outlines.get(gid) {
                // A glyph that fails to draw leaves a gap rather than aborting the run.
                let _ = glyph.draw(Size::new(size), &mut pen);
            }
            pen.origin.x += f64::from(metrics.advance_width(gid).unwrap_or(size * 0.6));
        }
        pen.path
    }

    /// Draws one line of text inside `rect`.
    ///
    /// The line is shortened with [`ELLIPSIS`] when wider than the box, aligned
    /// horizontally per `align` and centered vertically.
    pub fn fill_line(
        &self,
        scene: &mut Scene,
        text: &str,
        size: f32,
        color: Color,
        rect: Rect,
        align: Align,
    ) {
        let line = ellipsize(text, rect.width(), |s| self.advance(s, size));
        if line.is_empty() {
            return;
        }
        let metrics = self.line_metrics(size);
        let baseline = rect.center().y + (metrics.ascent - metrics.descent) / 2.0;
        let x = align.start_x(rect, self.advance(&line, size));
        scene.fill_path(self.glyph_path(&line, Point::new(x, baseline), size), color);
    }

    /// Wraps `text` to the width of `rect` and draws it centered on both axes.
    ///
    /// Lines that do not fit vertically are dropped, and the last kept line is
    /// ellipsized when text was cut.
    pub fn fill_wrapped(
        &self,
        scene: &mut Scene,
        text: &str,
        size: f32,
        color: Color,
        rect: Rect,
    ) {
        let measure = |s: &str| self.advance(s, size);
        let mut lines = wrap(text, rect.width(), measure);
        let metrics = self.line_metrics(size);
        let line_height = metrics.line_height().max(1.0);
        let capacity = line_capacity(rect.height(), line_height);
        if lines.len() > capacity {
            lines.truncate(capacity);
            if let Some(last) = lines.last_mut() {
                *last = ellipsize_forced(last, rect.width(), measure);
            }
        }
        let block = line_height * lines.len() as f64;
        let mut top = rect.center().y - block / 2.0;
        for line in &lines {
            let row = Rect::new(rect.x0, top, rect.x1, top + line_height);
            self.fill_line(scene, line, size, color, row, Align::Center);
            top += line_height;
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "a floored, non-negative line count"
)]
fn line_capacity(height: f64, line_height: f64) -> usize {
    ((height / line_height).floor().max(0.0) as usize).max(1)
}

/// Shortens `text` so that it ends in [`ELLIPSIS`] and fits `max_width`.
fn ellipsize_forced(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> String {
    let mut body = String::from(text.trim_end());
    loop {
        let mut candidate = body.clone();
        candidate.push_str(ELLIPSIS);
        if body.is_empty() || measure(&candidate) <= max_width {
            return candidate;
        }
        body.pop();
        body.truncate(body.trim_end().len());
    }
}

fn fallback_metrics(size: f32) -> LineMetrics {
    let size = f64::from(size);
    LineMetrics {
        ascent: size * 0.8,
        descent: size * 0.2,
        leading: 0.0,
    }
}

/// Pen that flips font-space y-up outlines into scene space at an origin.
struct FlipPen {
    path: BezPath,
    origin: Point,
}

impl FlipPen {
    fn map(&self, x: f32, y: f32) -> Point {
        Point::new(self.origin.x + f64::from(x), self.origin.y - f64::from(y))
    }
}

impl OutlinePen for FlipPen {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (p1, p) = (self.map(x1, y1), self.map(x, y));
        self.path.quad_to(p1, p);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (p1, p2, p) = (self.map(x1, y1), self.map(x2, y2), self.map(x, y));
        self.path.curve_to(p1, p2, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

#[cfg(test)]
mod tests {
    use covergrid_imaging::{DrawOp, Scene};
    use kurbo::{Point, Rect, Shape, Size};
    use peniko::Color;

    use super::{Align, FontError, FontFace};

    const DEJAVU: &[u8] = include_bytes!("../../assets/fonts/dejavu/DejaVuSans.ttf");

    fn face() -> FontFace {
        FontFace::new(DEJAVU).unwrap()
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = FontFace::new(&b"not a font"[..]).unwrap_err();
        assert!(matches!(err, FontError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn advance_grows_with_text_and_size() {
        let face = face();
        let a = face.advance("A", 20.0);
        let aa = face.advance("AA", 20.0);
        assert!(a > 0.0, "glyph has an advance");
        assert!((aa - 2.0 * a).abs() < 1e-6, "advances add up without kerning");
        assert!(face.advance("A", 40.0) > a, "larger size, wider glyph");
        assert_eq!(face.advance("", 20.0), 0.0);
    }

    #[test]
    fn glyphs_sit_above_the_baseline() {
        let face = face();
        let path = face.glyph_path("H", Point::new(10.0, 100.0), 32.0);
        let bbox = path.bounding_box();
        assert!(bbox.y1 <= 100.5, "H has no descender: {bbox:?}");
        assert!(bbox.y0 < 90.0, "cap height extends upward: {bbox:?}");
        assert!(bbox.x0 >= 10.0, "starts at the origin: {bbox:?}");
    }

    #[test]
    fn fill_line_stays_inside_its_box() {
        let face = face();
        let mut scene = Scene::new(Size::new(200.0, 40.0));
        let rect = Rect::new(0.0, 0.0, 60.0, 40.0);
        face.fill_line(
            &mut scene,
            "A rather long song title that cannot fit",
            20.0,
            Color::BLACK,
            rect,
            Align::Start,
        );
        let [DrawOp::FillPath { path, .. }] = scene.ops() else {
            panic!("expected a single glyph path, got {:?}", scene.ops());
        };
        let bbox = path.bounding_box();
        assert!(bbox.x1 <= 60.5, "ellipsized to the box width: {bbox:?}");
    }

    #[test]
    fn wrapped_text_is_centered() {
        let face = face();
        let mut scene = Scene::new(Size::new(200.0, 200.0));
        let rect = Rect::new(0.0, 0.0, 200.0, 200.0);
        face.fill_wrapped(&mut scene, "Hi", 24.0, Color::BLACK, rect);
        let [DrawOp::FillPath { path, .. }] = scene.ops() else {
            panic!("expected a single glyph path, got {:?}", scene.ops());
        };
        let bbox = path.bounding_box();
        let center = bbox.center();
        assert!((center.x - 100.0).abs() < 5.0, "horizontally centered: {bbox:?}");
        assert!((center.y - 100.0).abs() < 12.0, "vertically centered: {bbox:?}");
    }

    #[test]
    fn empty_text_draws_nothing() {
        let face = face();
        let mut scene = Scene::new(Size::new(10.0, 10.0));
        face.fill_line(
            &mut scene,
            "",
            12.0,
            Color::BLACK,
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Align::Center,
        );
        assert!(scene.ops().is_empty(), "nothing to draw");
    }
}
