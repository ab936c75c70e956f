// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vello CPU–backed implementation of the Covergrid rasterizer.
//!
//! [`VelloCpuRasterizer`] renders a [`Scene`] with the sparse-strips
//! [`vello_cpu::RenderContext`] into a fresh pixmap per call and returns
//! straight-alpha RGBA8 pixels.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use covergrid_imaging::{DrawOp, ImageId, ImageSizeError, RasterImage, Rasterizer, Scene};
use kurbo::Affine;
use peniko::{ImageAlphaType, ImageData, ImageFormat, ImageSampler};
use vello_cpu::kurbo::{Affine as CpuAffine, BezPath};
use vello_cpu::{
    Image as CpuImage, ImageSource, Pixmap, RenderContext, RenderMode, RenderSettings,
};

/// Errors reported by [`VelloCpuRasterizer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RasterError {
    /// The requested output does not fit the renderer's 16-bit dimensions.
    TooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The requested output has no pixels.
    Empty,
    /// A draw op referenced an image the scene does not hold.
    UnknownImage(ImageId),
    /// The rendered buffer did not match the requested size.
    Buffer(ImageSizeError),
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { width, height } => {
                write!(f, "{width}x{height} exceeds the maximum raster size")
            }
            Self::Empty => f.write_str("raster has no pixels"),
            Self::UnknownImage(id) => write!(f, "scene has no image {}", id.0),
            Self::Buffer(err) => write!(f, "rendered buffer: {err}"),
        }
    }
}

impl core::error::Error for RasterError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Buffer(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ImageSizeError> for RasterError {
    fn from(err: ImageSizeError) -> Self {
        Self::Buffer(err)
    }
}

/// CPU rasterizer built on `vello_cpu`.
#[derive(Copy, Clone, Debug, Default)]
pub struct VelloCpuRasterizer;

impl VelloCpuRasterizer {
    /// Creates a rasterizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn affine_to_cpu(xf: Affine) -> CpuAffine {
    CpuAffine::new(xf.as_coeffs())
}

fn image_source(image: &RasterImage) -> ImageSource {
    let data = ImageData {
        data: peniko::Blob::from(image.pixels().to_vec()),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width: image.width(),
        height: image.height(),
    };
    ImageSource::from_peniko_image_data(&data)
}

impl Rasterizer for VelloCpuRasterizer {
    type Error = RasterError;

    fn rasterize(
        &mut self,
        scene: &Scene,
        transform: Affine,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, Self::Error> {
        if width == 0 || height == 0 {
            return Err(RasterError::Empty);
        }
        let too_large = || RasterError::TooLarge { width, height };
        let w = u16::try_from(width).map_err(|_| too_large())?;
        let h = u16::try_from(height).map_err(|_| too_large())?;

        // The u8 pipeline samples opaque images slightly translucent.
        let settings = RenderSettings {
            render_mode: RenderMode::OptimizeQuality,
            ..RenderSettings::default()
        };
        let mut ctx = RenderContext::new_with(w, h, settings);
        let base = affine_to_cpu(transform);
        let mut sources: Vec<Option<ImageSource>> = Vec::new();
        sources.resize_with(scene.images().len(), || None);

        for op in scene.ops() {
            match op {
                DrawOp::FillRect { rect, color } => {
                    ctx.set_transform(base);
                    ctx.set_paint(*color);
                    ctx.fill_rect(rect);
                }
                DrawOp::FillPath { path, color } => {
                    ctx.set_transform(base);
                    ctx.set_paint(*color);
                    ctx.fill_path(path);
                }
                DrawOp::DrawImage { image, src, dst } => {
                    let raster = scene.image(*image).ok_or(RasterError::UnknownImage(*image))?;
                    if src.width() <= 0.0
                        || src.height() <= 0.0
                        || dst.width() <= 0.0
                        || dst.height() <= 0.0
                    {
                        continue;
                    }
                    let slot = &mut sources[image.0 as usize];
                    let source = slot.get_or_insert_with(|| image_source(raster)).clone();

                    let local = Affine::translate((dst.x0, dst.y0))
                        * Affine::scale_non_uniform(
                            dst.width() / src.width(),
                            dst.height() / src.height(),
                        )
                        * Affine::translate((-src.x0, -src.y0));

                    // Clip to the destination in scene space, then paint the
                    // image's own bounds under the image transform.
                    ctx.set_transform(base);
                    let mut clip = BezPath::new();
                    clip.move_to((dst.x0, dst.y0));
                    clip.line_to((dst.x1, dst.y0));
                    clip.line_to((dst.x1, dst.y1));
                    clip.line_to((dst.x0, dst.y1));
                    clip.close_path();
                    ctx.push_clip_layer(&clip);

                    ctx.set_paint(CpuImage {
                        image: source,
                        sampler: ImageSampler::default(),
                    });
                    ctx.set_transform(affine_to_cpu(transform * local));
                    ctx.fill_rect(&raster.bounds());
                    ctx.pop_layer();
                }
            }
        }

        let mut pixmap = Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        let unpremul = pixmap.take_unpremultiplied();
        let mut bytes = Vec::with_capacity(unpremul.len() * 4);
        for p in unpremul {
            bytes.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
        Ok(RasterImage::new(width, height, bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use covergrid_imaging::{Affine, Color, RasterImage, Rasterizer, Rect, Scene, Size};

    use super::{RasterError, VelloCpuRasterizer};

    #[test]
    fn solid_fill_covers_whole_pixels() {
        let mut scene = Scene::new(Size::new(4.0, 4.0));
        scene.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::from_rgb8(255, 0, 0));
        let img = VelloCpuRasterizer::new()
            .rasterize(&scene, Affine::IDENTITY, 4, 4)
            .unwrap();
        assert_eq!(img.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(img.pixel(3, 3), Some([255, 0, 0, 255]));
    }

    #[test]
    fn transform_scales_about_the_origin() {
        let mut scene = Scene::new(Size::new(2.0, 2.0));
        scene.fill_rect(Rect::new(1.0, 1.0, 2.0, 2.0), Color::from_rgb8(0, 0, 255));
        let img = VelloCpuRasterizer::new()
            .rasterize(&scene, Affine::scale(2.0), 4, 4)
            .unwrap();
        assert_eq!(img.pixel(3, 3), Some([0, 0, 255, 255]));
        assert_eq!(img.pixel(2, 2), Some([0, 0, 255, 255]));
        assert_eq!(img.pixel(1, 1).map(|p| p[3]), Some(0));
    }

    #[test]
    fn images_are_stretched_into_their_destination() {
        let mut scene = Scene::new(Size::new(4.0, 4.0));
        let id = scene.add_image(RasterImage::new(1, 1, vec![0, 200, 0, 255]).unwrap());
        scene.draw_image(id, Rect::new(0.0, 0.0, 4.0, 4.0));
        let img = VelloCpuRasterizer::new()
            .rasterize(&scene, Affine::IDENTITY, 4, 4)
            .unwrap();
        assert_eq!(img.pixel(2, 2), Some([0, 200, 0, 255]));
    }

    #[test]
    fn opaque_art_stays_opaque_over_a_colored_tile() {
        let mut scene = Scene::new(Size::new(200.0, 200.0));
        scene.fill_rect(Rect::new(0.0, 0.0, 200.0, 200.0), Color::from_rgb8(0, 0, 128));
        let art = RasterImage::new(8, 8, [0, 200, 0, 255].repeat(64)).unwrap();
        let id = scene.add_image(art);
        scene.draw_image(id, Rect::new(0.0, 0.0, 200.0, 200.0));
        let img = VelloCpuRasterizer::new()
            .rasterize(&scene, Affine::IDENTITY, 200, 200)
            .unwrap();
        assert_eq!(img.pixel(100, 100), Some([0, 200, 0, 255]));
        let translucent = img.pixels().chunks_exact(4).filter(|p| p[3] != 255).count();
        assert_eq!(translucent, 0, "every pixel is opaque");
        let tinted = img.pixels().chunks_exact(4).filter(|p| p[..3] != [0, 200, 0]).count();
        assert_eq!(tinted, 0, "no tile color bleeds through");
    }

    #[test]
    fn oversized_and_empty_outputs_are_rejected() {
        let scene = Scene::new(Size::new(1.0, 1.0));
        let mut r = VelloCpuRasterizer::new();
        assert_eq!(
            r.rasterize(&scene, Affine::IDENTITY, 70_000, 10).unwrap_err(),
            RasterError::TooLarge {
                width: 70_000,
                height: 10
            }
        );
        assert_eq!(
            r.rasterize(&scene, Affine::IDENTITY, 0, 10).unwrap_err(),
            RasterError::Empty
        );
    }
}
