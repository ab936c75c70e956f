// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Covergrid Imaging Reference Rasterizer.
//!
//! [`RecordingRasterizer`] implements [`Rasterizer`] for tests that want to
//! assert on *what was asked* rather than on exact pixels:
//! - every call is recorded with its transform, output size and ops;
//! - rectangle fills are painted (by transformed bounding box, no
//!   antialiasing) onto an opaque white canvas so simple color checks work;
//! - paths and images are recorded but not painted;
//! - it can be told to fail, to exercise error paths.

#![no_std]

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use covergrid_imaging::{Affine, DrawOp, RasterImage, Rasterizer, Scene};

/// One recorded [`Rasterizer::rasterize`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterCall {
    /// Transform from scene to output pixels.
    pub transform: Affine,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Natural size of the scene, as `(width, height)`.
    pub scene_size: (f64, f64),
    /// The scene's ops at the time of the call.
    pub ops: Vec<DrawOp>,
    /// Number of images registered in the scene.
    pub image_count: usize,
}

/// Error returned by a [`RecordingRasterizer`] configured to fail.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InjectedFailure(pub &'static str);

impl fmt::Display for InjectedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl core::error::Error for InjectedFailure {}

/// A rasterizer that records calls and paints only rectangle fills.
#[derive(Clone, Debug, Default)]
pub struct RecordingRasterizer {
    calls: Vec<RasterCall>,
    fail_with: Option<&'static str>,
}

impl RecordingRasterizer {
    /// Creates a rasterizer that succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a rasterizer whose every call fails with `message`.
    ///
    /// Calls are still recorded.
    #[must_use]
    pub fn failing(message: &'static str) -> Self {
        Self {
            calls: Vec::new(),
            fail_with: Some(message),
        }
    }

    /// Recorded calls, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[RasterCall] {
        &self.calls
    }

    /// The most recent call.
    #[must_use]
    pub fn last(&self) -> Option<&RasterCall> {
        self.calls.last()
    }

    /// Forgets recorded calls.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Rasterizer for RecordingRasterizer {
    type Error = InjectedFailure;

    fn rasterize(
        &mut self,
        scene: &Scene,
        transform: Affine,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, Self::Error> {
        let size = scene.size();
        self.calls.push(RasterCall {
            transform,
            width,
            height,
            scene_size: (size.width, size.height),
            ops: scene.ops().to_vec(),
            image_count: scene.images().len(),
        });
        if let Some(message) = self.fail_with {
            return Err(InjectedFailure(message));
        }

        let mut pixels = vec![255_u8; width as usize * height as usize * 4];
        for op in scene.ops() {
            if let DrawOp::FillRect { rect, color } = op {
                let rgba = color.to_rgba8();
                let px = [rgba.r, rgba.g, rgba.b, rgba.a];
                let bbox = transform.transform_rect_bbox(*rect).round();
                let x0 = clamp_to(bbox.x0, width);
                let x1 = clamp_to(bbox.x1, width);
                let y0 = clamp_to(bbox.y0, height);
                let y1 = clamp_to(bbox.y1, height);
                for y in y0..y1 {
                    let row = y * width as usize;
                    for x in x0..x1 {
                        let i = (row + x) * 4;
                        pixels[i..i + 4].copy_from_slice(&px);
                    }
                }
            }
        }
        RasterImage::new(width, height, pixels).map_err(|_| InjectedFailure("buffer size"))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value is clamped to [0, limit] first"
)]
fn clamp_to(v: f64, limit: u32) -> usize {
    v.clamp(0.0, f64::from(limit)) as usize
}
