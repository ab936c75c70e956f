// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::any::Any;
use std::fmt;
use std::io;
use std::panic::{AssertUnwindSafe, catch_unwind};

use covergrid_color::Color;
use covergrid_export::{
    CoverArt, CoverLayout, ExportOptions, ExportRenderer, Exported, RenderError,
};
use covergrid_imaging::Rasterizer;
use covergrid_tiles::{
    Song, Storage, Tile, TileCollection, TileContent, TileError, TilePatch, TileStore,
};
use covergrid_view::ScaleCalculator;
use kurbo::Size;

use crate::sink::DownloadSink;

/// A panic caught by [`Session::guarded`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fault {
    /// Message extracted from the panic payload.
    pub message: String,
}

impl Fault {
    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_owned()
        };
        Self { message }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected failure: {}", self.message)
    }
}

impl std::error::Error for Fault {}

/// Error returned by [`Session::export`].
#[derive(Debug)]
pub enum ExportError {
    /// The cover could not be rendered.
    Render(RenderError),
    /// The cover was rendered but not delivered.
    Deliver(io::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(e) => write!(f, "export failed: {e}"),
            Self::Deliver(e) => write!(f, "cannot save cover: {e}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(e) => Some(e),
            Self::Deliver(e) => Some(e),
        }
    }
}

impl From<RenderError> for ExportError {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

/// Everything a front end needs to edit and export one cover.
///
/// The session is the single owner of the tiles, the display scale and the
/// export busy state. Edits go straight to the [`TileStore`], which persists
/// them; the scale only changes on [`mount`](Self::mount) and
/// [`resize`](Self::resize).
///
/// Selecting a tile opens it for editing. Picking a song, filling in text or
/// clearing the tile closes it again; label and color edits keep it open.
#[derive(Debug)]
pub struct Session<S> {
    store: TileStore<S>,
    scale: ScaleCalculator,
    renderer: ExportRenderer,
    selected: Option<usize>,
}

impl<S: Storage> Session<S> {
    /// Opens a session over `storage`, loading any saved tiles.
    pub fn new(storage: S, options: ExportOptions) -> Self {
        Self {
            store: TileStore::open(storage),
            scale: ScaleCalculator::new(),
            renderer: ExportRenderer::new(options),
            selected: None,
        }
    }

    /// Draws text with the font in `bytes`.
    #[must_use]
    pub fn with_font(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.renderer = std::mem::take(&mut self.renderer).with_font(bytes);
        self
    }

    /// The current tiles.
    #[must_use]
    pub fn tiles(&self) -> &TileCollection {
        self.store.tiles()
    }

    /// The tile at `index`.
    pub fn tile(&self, index: usize) -> Result<&Tile, TileError> {
        self.store.tile(index)
    }

    /// The tile store.
    #[must_use]
    pub fn store(&self) -> &TileStore<S> {
        &self.store
    }

    /// The export renderer.
    #[must_use]
    pub fn renderer(&self) -> &ExportRenderer {
        &self.renderer
    }

    /// The cover page at its natural size.
    #[must_use]
    pub fn layout(&self) -> CoverLayout {
        self.renderer.layout()
    }

    /// The display scale state.
    #[must_use]
    pub fn scale(&self) -> &ScaleCalculator {
        &self.scale
    }

    /// Shows the cover in `viewport` for the first time. Returns the scale.
    pub fn mount(&mut self, viewport: Size) -> f64 {
        let layout = self.layout();
        self.scale.mount(viewport, &layout)
    }

    /// Refits the cover after the viewport changed. Returns the scale.
    pub fn resize(&mut self, viewport: Size) -> f64 {
        let layout = self.layout();
        self.scale.resize(viewport, &layout)
    }

    /// Opens the tile at `index` for editing.
    pub fn select(&mut self, index: usize) -> Result<&Tile, TileError> {
        let tile = self.store.tile(index)?;
        self.selected = Some(index);
        Ok(tile)
    }

    /// The index of the tile open for editing.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Closes the open tile, if any.
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Applies an arbitrary edit to one tile.
    pub fn edit(&mut self, index: usize, patch: TilePatch) -> Result<&Tile, TileError> {
        self.store.set_tile(index, patch)
    }

    /// Renames a tile.
    pub fn set_label(
        &mut self,
        index: usize,
        label: impl Into<String>,
    ) -> Result<&Tile, TileError> {
        self.edit(index, TilePatch::new().label(label))
    }

    /// Sets or clears a tile's background override.
    pub fn set_background(
        &mut self,
        index: usize,
        color: Option<Color>,
    ) -> Result<&Tile, TileError> {
        self.edit(index, TilePatch::new().background(color))
    }

    /// Sets or clears a tile's text color override.
    pub fn set_text_color(
        &mut self,
        index: usize,
        color: Option<Color>,
    ) -> Result<&Tile, TileError> {
        self.edit(index, TilePatch::new().text_color(color))
    }

    /// Puts a song from the catalog into a tile and closes it.
    pub fn pick_song(&mut self, index: usize, song: Song) -> Result<&Tile, TileError> {
        self.close_after(index, TilePatch::new().content(TileContent::Song(song)))
    }

    /// Puts free text into a tile and closes it.
    pub fn fill_text(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Result<&Tile, TileError> {
        self.close_after(index, TilePatch::new().content(TileContent::FreeText(text.into())))
    }

    /// Empties a tile, keeping its label and colors, and closes it.
    pub fn clear_tile(&mut self, index: usize) -> Result<&Tile, TileError> {
        self.close_after(index, TilePatch::new().content(TileContent::Empty))
    }

    /// Returns every tile to its default.
    pub fn reset(&mut self) -> &TileCollection {
        self.selected = None;
        self.store.reset()
    }

    fn close_after(&mut self, index: usize, patch: TilePatch) -> Result<&Tile, TileError> {
        let tile = self.store.set_tile(index, patch)?;
        if self.selected == Some(index) {
            self.selected = None;
        }
        Ok(tile)
    }

    /// Renders the cover and hands it to `sink`.
    ///
    /// Tiles are never modified, whether the export succeeds or not.
    pub fn export<R: Rasterizer + ?Sized>(
        &self,
        rasterizer: &mut R,
        art: &mut dyn CoverArt,
        sink: &mut dyn DownloadSink,
    ) -> Result<Exported, ExportError> {
        let cover = self.renderer.export(self.store.tiles(), rasterizer, art)?;
        sink.deliver(&cover).map_err(|e| {
            tracing::error!(error = %e, "failed to deliver exported cover");
            ExportError::Deliver(e)
        })?;
        Ok(cover)
    }

    /// Runs `op`, turning a panic inside it into a [`Fault`].
    ///
    /// The session stays usable after a fault; call
    /// [`recover`](Self::recover) to return to a known state.
    pub fn guarded<T>(&mut self, op: impl FnOnce(&mut Self) -> T) -> Result<T, Fault> {
        catch_unwind(AssertUnwindSafe(|| op(self))).map_err(|payload| {
            let fault = Fault::from_panic(payload);
            tracing::error!(message = %fault.message, "session operation panicked");
            fault
        })
    }

    /// Reinitializes the session after a fault.
    ///
    /// Tiles go back to their defaults (and are persisted), the display
    /// scale is forgotten and no tile stays selected.
    pub fn recover(&mut self) {
        tracing::info!("recovering session from defaults");
        self.store.reset();
        self.scale.reset();
        self.selected = None;
    }
}
