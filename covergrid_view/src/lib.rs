// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Covergrid View: fit-to-viewport presentation scale.
//!
//! A cover is laid out at a fixed natural size. When the window is smaller
//! than that, the *displayed* copy is shrunk uniformly so that it fits; the
//! layout itself is never changed, and exports always capture the unscaled
//! layout.
//!
//! - [`fit_scale`] is the pure rule: `min(vw / cw, vh / ch, 1)`.
//! - [`Measure`] is how content reports its natural size. Content is always
//!   measured, never assumed.
//! - [`ScaleCalculator`] keeps the current scale and recomputes it on mount and
//!   on every viewport resize.
//!
//! ```rust
//! use kurbo::Size;
//! use covergrid_view::ScaleCalculator;
//!
//! let content = Size::new(790.0, 900.0);
//! let mut calc = ScaleCalculator::new();
//! calc.mount(Size::new(1280.0, 450.0), &content);
//! assert_eq!(calc.scale(), 0.5);
//!
//! // Growing the window never scales above 1.
//! calc.resize(Size::new(4000.0, 4000.0), &content);
//! assert_eq!(calc.scale(), 1.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod scale;

pub use scale::{Measure, ScaleCalculator, ScaleDebugInfo, fit_scale};
