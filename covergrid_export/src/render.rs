// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::error::Error;
use std::fmt;

use covergrid_imaging::{RasterImage, Rasterizer};
use covergrid_text::{FontError, FontFace};
use covergrid_tiles::TileCollection;
use covergrid_view::Measure;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use kurbo::Affine;

use crate::cover::{CoverArt, CoverError};
use crate::layout::{CoverLayout, LayoutMetrics};
use crate::scene::build_scene;

/// Default supersampling factor.
pub const DEFAULT_SUPERSAMPLE: f64 = 2.0;

/// Default JPEG quality, out of 100.
pub const DEFAULT_QUALITY: u8 = 95;

/// Default heading printed above the grid.
pub const DEFAULT_HEADING: &str = "Songs by Cover Color";

/// Error returned by an export.
#[derive(Debug)]
pub enum RenderError {
    /// Another export is in flight.
    Busy,
    /// The supersampling factor is not a positive finite number.
    Scale(f64),
    /// The scaled page does not fit a raster.
    Size {
        /// Requested width in pixels.
        width: f64,
        /// Requested height in pixels.
        height: f64,
    },
    /// The configured font cannot be used.
    Font(FontError),
    /// A tile's cover art cannot be embedded.
    Cover {
        /// Index of the tile.
        index: usize,
        /// The song's cover reference.
        reference: String,
        /// What went wrong.
        source: CoverError,
    },
    /// The rasterizer failed.
    Raster(Box<dyn Error + Send + Sync>),
    /// The pixels could not be encoded.
    Encode(image::ImageError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => f.write_str("an export is already in progress"),
            Self::Scale(scale) => write!(f, "invalid supersampling factor {scale}"),
            Self::Size { width, height } => {
                write!(f, "cannot rasterize a {width}×{height} page")
            }
            Self::Font(e) => write!(f, "font error: {e}"),
            Self::Cover {
                index,
                reference,
                source,
            } => write!(f, "tile {index}: cover art {reference:?}: {source}"),
            Self::Raster(e) => write!(f, "rasterization failed: {e}"),
            Self::Encode(e) => write!(f, "encoding failed: {e}"),
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Font(e) => Some(e),
            Self::Cover { source, .. } => Some(source),
            Self::Raster(e) => Some(&**e),
            Self::Encode(e) => Some(e),
            Self::Busy | Self::Scale(_) | Self::Size { .. } => None,
        }
    }
}

impl From<FontError> for RenderError {
    fn from(e: FontError) -> Self {
        Self::Font(e)
    }
}

impl From<image::ImageError> for RenderError {
    fn from(e: image::ImageError) -> Self {
        Self::Encode(e)
    }
}

/// Settings for exports.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    /// Magnification applied during capture only.
    pub supersample: f64,
    /// JPEG quality, `1..=100`.
    pub quality: u8,
    /// Heading printed above the grid.
    pub heading: String,
    /// Page geometry.
    pub metrics: LayoutMetrics,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            supersample: DEFAULT_SUPERSAMPLE,
            quality: DEFAULT_QUALITY,
            heading: DEFAULT_HEADING.to_owned(),
            metrics: LayoutMetrics::default(),
        }
    }
}

/// A finished export.
#[derive(Clone, PartialEq, Eq)]
pub struct Exported {
    /// JPEG bytes.
    pub jpeg: Vec<u8>,
    /// Width of the image in pixels.
    pub width: u32,
    /// Height of the image in pixels.
    pub height: u32,
}

impl fmt::Debug for Exported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exported")
            .field("jpeg", &self.jpeg.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Renders covers, one at a time.
///
/// An export holds an [`ExportJob`] from [`begin`](Self::begin) until it
/// finishes; any `begin` in between fails with [`RenderError::Busy`]. The
/// busy state ends when the job is dropped, whatever the outcome.
#[derive(Default)]
pub struct ExportRenderer {
    options: ExportOptions,
    font: Option<Vec<u8>>,
    busy: Cell<bool>,
}

impl fmt::Debug for ExportRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportRenderer")
            .field("options", &self.options)
            .field("font", &self.font.as_ref().map(Vec::len))
            .field("busy", &self.busy.get())
            .finish()
    }
}

impl ExportRenderer {
    /// Creates an idle renderer without a font.
    #[must_use]
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            font: None,
            busy: Cell::new(false),
        }
    }

    /// Uses the font in `bytes` for all text.
    ///
    /// The bytes are parsed when an export runs, so a bad font fails that
    /// export.
    #[must_use]
    pub fn with_font(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.font = Some(bytes.into());
        self
    }

    /// The export settings.
    #[must_use]
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Mutable export settings.
    pub fn options_mut(&mut self) -> &mut ExportOptions {
        &mut self.options
    }

    /// Whether a font is configured.
    #[must_use]
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Whether an export is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// The page as it would be laid out now.
    #[must_use]
    pub fn layout(&self) -> CoverLayout {
        CoverLayout::new(self.options.metrics.clone())
    }

    /// Enters the busy state.
    pub fn begin(&self) -> Result<ExportJob<'_>, RenderError> {
        if self.busy.replace(true) {
            tracing::debug!("export rejected, another one is in flight");
            return Err(RenderError::Busy);
        }
        Ok(ExportJob { renderer: self })
    }

    /// Runs a whole export: begin, capture, encode, finish.
    pub fn export<R: Rasterizer + ?Sized>(
        &self,
        tiles: &TileCollection,
        rasterizer: &mut R,
        art: &mut dyn CoverArt,
    ) -> Result<Exported, RenderError> {
        self.begin()?.export(tiles, rasterizer, art)
    }
}

/// An export in flight. Dropping it ends the busy state.
#[derive(Debug)]
pub struct ExportJob<'a> {
    renderer: &'a ExportRenderer,
}

impl ExportJob<'_> {
    /// Rasterizes the cover at the supersampling factor.
    ///
    /// The layout is measured at its natural size right before capture; the
    /// scene is drawn under a uniform scale about the top-left corner into a
    /// `round(w·f)` × `round(h·f)` image. A job captures once; the busy
    /// state ends when this returns.
    pub fn capture<R: Rasterizer + ?Sized>(
        self,
        tiles: &TileCollection,
        rasterizer: &mut R,
        art: &mut dyn CoverArt,
    ) -> Result<RasterImage, RenderError> {
        self.render(tiles, rasterizer, art)
    }

    /// Captures and encodes the cover, consuming the job.
    pub fn export<R: Rasterizer + ?Sized>(
        self,
        tiles: &TileCollection,
        rasterizer: &mut R,
        art: &mut dyn CoverArt,
    ) -> Result<Exported, RenderError> {
        let image = self.render(tiles, rasterizer, art)?;
        let quality = self.renderer.options.quality;
        let jpeg = encode_jpeg(&image, quality)
            .inspect_err(|error| tracing::error!(error = %error, "cover encoding failed"))?;
        tracing::info!(
            width = image.width(),
            height = image.height(),
            bytes = jpeg.len(),
            quality,
            "cover exported"
        );
        Ok(Exported {
            jpeg,
            width: image.width(),
            height: image.height(),
        })
    }

    fn render<R: Rasterizer + ?Sized>(
        &self,
        tiles: &TileCollection,
        rasterizer: &mut R,
        art: &mut dyn CoverArt,
    ) -> Result<RasterImage, RenderError> {
        self.try_capture(tiles, rasterizer, art)
            .inspect_err(|error| tracing::error!(error = %error, "cover capture failed"))
    }

    fn try_capture<R: Rasterizer + ?Sized>(
        &self,
        tiles: &TileCollection,
        rasterizer: &mut R,
        art: &mut dyn CoverArt,
    ) -> Result<RasterImage, RenderError> {
        let options = &self.renderer.options;
        let factor = options.supersample;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(RenderError::Scale(factor));
        }
        let font = match &self.renderer.font {
            Some(bytes) => Some(FontFace::new(bytes.clone())?),
            None => None,
        };
        let layout = self.renderer.layout();
        let size = layout.natural_size();
        let (width, height) = capture_size(size.width * factor, size.height * factor)?;
        let scene = build_scene(tiles, &layout, &options.heading, font.as_ref(), art)?;
        tracing::debug!(
            layout_width = size.width,
            layout_height = size.height,
            factor,
            width,
            height,
            "capturing cover"
        );
        rasterizer
            .rasterize(&scene, Affine::scale(factor), width, height)
            .map_err(|e| RenderError::Raster(Box::new(e)))
    }
}

impl Drop for ExportJob<'_> {
    fn drop(&mut self) {
        self.renderer.busy.set(false);
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "values are rounded and checked against the u32 range first"
)]
fn capture_size(width: f64, height: f64) -> Result<(u32, u32), RenderError> {
    let (w, h) = (width.round(), height.round());
    let fits = |v: f64| (1.0..=f64::from(u32::MAX)).contains(&v);
    if !fits(w) || !fits(h) {
        return Err(RenderError::Size { width, height });
    }
    Ok((w as u32, h as u32))
}

/// Encodes `image` as a baseline JPEG, dropping alpha.
pub fn encode_jpeg(image: &RasterImage, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).write_image(
        &image.to_rgb8(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(out)
}
