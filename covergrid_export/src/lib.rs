// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Covergrid Export: from tiles to a shareable cover image.
//!
//! Exporting a cover runs in four steps:
//!
//! 1. [`CoverLayout`] places the heading and the nine tiles on a fixed-width
//!    page. The layout is always measured at its natural, unscaled size,
//!    whatever scale the cover is currently displayed at.
//! 2. [`build_scene`] paints tiles in their resolved colors into a
//!    [`Scene`](covergrid_imaging::Scene), loading cover art through a
//!    [`CoverArt`] source.
//! 3. A [`Rasterizer`](covergrid_imaging::Rasterizer) renders the scene at a
//!    supersampling factor.
//! 4. [`encode_jpeg`] turns the pixels into the file handed to the user.
//!
//! [`ExportRenderer`] drives these steps and refuses a second export while
//! one is in flight:
//!
//! ```rust
//! use covergrid_export::{ExportOptions, ExportRenderer, RenderError};
//!
//! let renderer = ExportRenderer::new(ExportOptions::default());
//! let job = renderer.begin().unwrap();
//! assert!(matches!(renderer.begin(), Err(RenderError::Busy)));
//! drop(job);
//! assert!(!renderer.is_busy());
//! ```

mod cover;
mod layout;
mod render;
mod scene;

pub use cover::{CoverArt, CoverError, CoverLoader, decode_cover};
pub use layout::{CoverLayout, LayoutMetrics, TileBoxes, cover_crop};
pub use render::{
    DEFAULT_HEADING, DEFAULT_QUALITY, DEFAULT_SUPERSAMPLE, ExportJob, ExportOptions,
    ExportRenderer, Exported, RenderError, encode_jpeg,
};
pub use scene::build_scene;
