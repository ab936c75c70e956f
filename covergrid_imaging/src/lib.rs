// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Covergrid Imaging: display-list IR and the rasterizer trait.
//!
//! A cover is described as a [`Scene`]: an ordered list of [`DrawOp`]s in
//! unscaled layout coordinates, together with the decoded images those ops
//! reference. Backends implement [`Rasterizer`] to turn a scene into pixels
//! under a caller-provided transform.
//!
//! Keeping the scene independent of the backend lets export code be tested
//! against a recording rasterizer and rendered for real by a CPU backend.
//!
//! ```rust
//! use covergrid_imaging::{DrawOp, RasterImage, Scene};
//! use kurbo::{Rect, Size};
//! use peniko::Color;
//!
//! let mut scene = Scene::new(Size::new(100.0, 100.0));
//! scene.fill_rect(Rect::new(0.0, 0.0, 100.0, 100.0), Color::WHITE);
//! let art = scene.add_image(RasterImage::new(1, 1, vec![255, 0, 0, 255]).unwrap());
//! scene.draw_image(art, Rect::new(10.0, 10.0, 50.0, 50.0));
//! assert_eq!(scene.ops().len(), 2);
//! assert!(matches!(scene.ops()[1], DrawOp::DrawImage { .. }));
//! ```

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

pub use kurbo::{Affine, BezPath, Rect, Size};
pub use peniko::Color;

/// Identifier of an image inside a [`Scene`].
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// A drawing operation in scene coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill an axis-aligned rectangle with a solid color.
    FillRect {
        /// Rectangle to fill.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// Fill a path (non-zero winding) with a solid color.
    FillPath {
        /// Path to fill.
        path: BezPath,
        /// Fill color.
        color: Color,
    },
    /// Draw the `src` region of an image stretched into `dst`.
    DrawImage {
        /// Image to draw.
        image: ImageId,
        /// Source region in image pixels.
        src: Rect,
        /// Destination rectangle in scene coordinates.
        dst: Rect,
    },
}

/// A display list together with the images it references.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    size: Size,
    ops: Vec<DrawOp>,
    images: Vec<RasterImage>,
}

impl Scene {
    /// Creates an empty scene with the given natural size.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ops: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Natural (unscaled) size of the scene.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Draw operations in painting order.
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Images referenced by [`DrawOp::DrawImage`].
    #[must_use]
    pub fn images(&self) -> &[RasterImage] {
        &self.images
    }

    /// Looks up an image by id.
    #[must_use]
    pub fn image(&self, id: ImageId) -> Option<&RasterImage> {
        self.images.get(id.0 as usize)
    }

    /// Appends an operation.
    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    /// Appends a rectangle fill.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.push(DrawOp::FillRect { rect, color });
    }

    /// Appends a path fill. Empty paths are dropped.
    pub fn fill_path(&mut self, path: BezPath, color: Color) {
        if path.elements().is_empty() {
            return;
        }
        self.push(DrawOp::FillPath { path, color });
    }

    /// Registers an image and returns its id.
    pub fn add_image(&mut self, image: RasterImage) -> ImageId {
        let id = u32::try_from(self.images.len()).unwrap_or(u32::MAX);
        self.images.push(image);
        ImageId(id)
    }

    /// Draws a whole image stretched into `dst`.
    ///
    /// Unknown ids are ignored.
    pub fn draw_image(&mut self, image: ImageId, dst: Rect) {
        let Some(src) = self.image(image).map(RasterImage::bounds) else {
            return;
        };
        self.draw_image_rect(image, src, dst);
    }

    /// Draws the `src` region of an image stretched into `dst`.
    pub fn draw_image_rect(&mut self, image: ImageId, src: Rect, dst: Rect) {
        self.push(DrawOp::DrawImage { image, src, dst });
    }
}

/// An 8-bit RGBA image with straight (unpremultiplied) alpha.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish_non_exhaustive()
    }
}

impl RasterImage {
    /// Wraps RGBA8 pixels, row-major, top row first.
    ///
    /// Fails when the buffer length is not `width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageSizeError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(ImageSizeError {
                width,
                height,
                len: pixels.len(),
            })?;
        if pixels.len() != expected {
            return Err(ImageSizeError {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The image's own bounds, `(0, 0, width, height)`.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Raw RGBA8 bytes.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consumes the image and returns its RGBA8 bytes.
    #[must_use]
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// The RGBA value at `(x, y)`, if in bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Drops the alpha channel.
    #[must_use]
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() / 4 * 3);
        for px in self.pixels.chunks_exact(4) {
            out.extend_from_slice(&px[..3]);
        }
        out
    }
}

/// A pixel buffer whose length does not match its dimensions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImageSizeError {
    /// Declared width.
    pub width: u32,
    /// Declared height.
    pub height: u32,
    /// Actual buffer length in bytes.
    pub len: usize,
}

impl fmt::Display for ImageSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes do not hold a {}x{} RGBA8 image",
            self.len, self.width, self.height
        )
    }
}

impl core::error::Error for ImageSizeError {}

/// A backend that turns a [`Scene`] into pixels.
pub trait Rasterizer {
    /// Error reported when rasterization fails.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Renders `scene` under `transform` into a `width` × `height` image.
    ///
    /// The transform maps scene coordinates to output pixels; anything
    /// outside the output is clipped.
    fn rasterize(
        &mut self,
        scene: &Scene,
        transform: Affine,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, Self::Error>;
}

impl<R: Rasterizer + ?Sized> Rasterizer for &mut R {
    type Error = R::Error;

    fn rasterize(
        &mut self,
        scene: &Scene,
        transform: Affine,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, Self::Error> {
        (**self).rasterize(scene, transform, width, height)
    }
}
