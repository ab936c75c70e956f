// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session export plumbing with a recording rasterizer.

use std::io;

use covergrid::{DownloadSink, ExportError, MemorySink, Session};
use covergrid_export::{CoverArt, CoverError, ExportOptions, Exported, RenderError};
use covergrid_imaging::RasterImage;
use covergrid_imaging_ref::RecordingRasterizer;
use covergrid_tiles::{MemoryStorage, Song};
use kurbo::Size;

struct NoCovers;

impl CoverArt for NoCovers {
    fn load(&mut self, reference: &str) -> Result<RasterImage, CoverError> {
        Err(CoverError::Io(io::Error::new(io::ErrorKind::NotFound, reference)))
    }
}

struct FullDisk;

impl DownloadSink for FullDisk {
    fn deliver(&mut self, _cover: &Exported) -> io::Result<()> {
        Err(io::Error::other("disk full"))
    }
}

fn session() -> Session<MemoryStorage> {
    Session::new(MemoryStorage::new(), ExportOptions::default())
}

#[test]
fn export_ignores_the_display_scale() {
    let mut session = session();
    session.mount(Size::new(300.0, 300.0));
    assert!(session.scale().scale() < 1.0, "shrunk for display");

    let mut raster = RecordingRasterizer::new();
    let mut sink = MemorySink::default();
    let cover = session.export(&mut raster, &mut NoCovers, &mut sink).unwrap();
    assert_eq!((cover.width, cover.height), (1580, 2024));
    assert_eq!(sink.covers, [cover]);
    assert!(!session.renderer().is_busy(), "idle after export");
}

#[test]
fn failures_leave_the_session_idle_and_tiles_untouched() {
    let mut session = session();
    session
        .pick_song(0, Song::new("1", "T", "A").with_cover("missing.png"))
        .unwrap();
    let before = session.tiles().clone();

    let err = session
        .export(&mut RecordingRasterizer::new(), &mut NoCovers, &mut MemorySink::default())
        .unwrap_err();
    assert!(matches!(err, ExportError::Render(RenderError::Cover { .. })), "got {err}");
    assert!(!session.renderer().is_busy(), "idle after a render failure");
    assert_eq!(session.tiles(), &before);

    session.clear_tile(0).unwrap();
    let err = session
        .export(&mut RecordingRasterizer::new(), &mut NoCovers, &mut FullDisk)
        .unwrap_err();
    assert!(matches!(err, ExportError::Deliver(_)), "got {err}");
    assert!(!session.renderer().is_busy(), "idle after a delivery failure");
}

#[test]
fn a_panicking_operation_is_contained() {
    let mut session = session();
    let fault = session
        .guarded(|s| {
            s.fill_text(1, "about to fail").unwrap();
            s.fill_text(99, "out of range").unwrap();
        })
        .unwrap_err();
    assert!(fault.message.contains("OutOfRange"), "message: {}", fault.message);
    // The first edit landed before the panic.
    assert!(!session.tile(1).unwrap().content.is_empty(), "edit kept");
    session.recover();
    assert!(session.tile(1).unwrap().content.is_empty(), "recovered to defaults");
}
