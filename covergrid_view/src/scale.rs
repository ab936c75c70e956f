// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Size};

/// Content that can report its natural (unscaled) size.
pub trait Measure {
    /// The size the content occupies at scale 1.
    fn natural_size(&self) -> Size;
}

impl Measure for Size {
    fn natural_size(&self) -> Size {
        *self
    }
}

impl<T: Measure + ?Sized> Measure for &T {
    fn natural_size(&self) -> Size {
        (**self).natural_size()
    }
}

/// The uniform scale that fits `content` inside `viewport`, never above 1.
///
/// Content with a non-positive extent has nothing to shrink and yields 1.
/// A degenerate viewport yields 0; the result is never negative.
#[must_use]
pub fn fit_scale(viewport: Size, content: Size) -> f64 {
    if !(content.width > 0.0 && content.height > 0.0) {
        return 1.0;
    }
    let sx = viewport.width / content.width;
    let sy = viewport.height / content.height;
    // `f64::min` skips a NaN operand; only two NaN ratios leave NaN.
    let scale = sx.min(sy);
    if scale.is_nan() {
        return 1.0;
    }
    scale.clamp(0.0, 1.0)
}

/// Tracks the presentation scale of a cover inside a viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleCalculator {
    viewport: Option<Size>,
    content: Size,
    scale: f64,
}

impl Default for ScaleCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScaleCalculator {
    /// Creates an unmounted calculator at scale 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            viewport: None,
            content: Size::ZERO,
            scale: 1.0,
        }
    }

    /// Computes the initial scale when the view is first shown.
    pub fn mount<M: Measure + ?Sized>(&mut self, viewport: Size, content: &M) -> f64 {
        self.recompute(viewport, content)
    }

    /// Recomputes the scale after the viewport changed size.
    pub fn resize<M: Measure + ?Sized>(&mut self, viewport: Size, content: &M) -> f64 {
        self.recompute(viewport, content)
    }

    /// Returns to the unmounted state at scale 1.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Current presentation scale in `[0, 1]`.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Whether a viewport has been seen yet.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.viewport.is_some()
    }

    /// Uniform scale about the content's top-left corner.
    ///
    /// Applies to the displayed copy only.
    #[must_use]
    pub fn presentation_transform(&self) -> Affine {
        Affine::scale(self.scale)
    }

    /// The on-screen footprint of the content at the current scale.
    #[must_use]
    pub fn presented_size(&self) -> Size {
        self.content * self.scale
    }

    /// Snapshot of the inputs and output of the last recomputation.
    #[must_use]
    pub fn debug_info(&self) -> ScaleDebugInfo {
        ScaleDebugInfo {
            viewport: self.viewport,
            content: self.content,
            scale: self.scale,
            presented: self.presented_size(),
        }
    }

    fn recompute<M: Measure + ?Sized>(&mut self, viewport: Size, content: &M) -> f64 {
        let content = content.natural_size();
        self.viewport = Some(viewport);
        self.content = content;
        self.scale = fit_scale(viewport, content);
        self.scale
    }
}

/// Debug snapshot of a [`ScaleCalculator`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleDebugInfo {
    /// Last viewport size, if mounted.
    pub viewport: Option<Size>,
    /// Last measured natural content size.
    pub content: Size,
    /// Current presentation scale.
    pub scale: f64,
    /// Content size after scaling.
    pub presented: Size,
}
