// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::error::Error;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use covergrid_catalog::{JsonCatalog, SearchState, SongPage, lookup};
use covergrid_export::{CoverLoader, ExportOptions};
use covergrid_imaging_vello_cpu::VelloCpuRasterizer;
use covergrid_tiles::{FileStorage, Storage, Tile, TileContent};
use kurbo::Size;

use crate::config::{Cli, Command};
use crate::session::Session;
use crate::sink::FileSink;

/// Errors from the command-line front end itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// `search` or `pick` without a catalog.
    NoCatalog,
    /// `pick` asked for a result that is not on the page.
    NoSuchResult {
        /// Requested result number, starting at 1.
        n: usize,
        /// Results on the page.
        found: usize,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCatalog => {
                f.write_str("no song catalog configured (use --catalog or COVERGRID_CATALOG)")
            }
            Self::NoSuchResult { n, found } => {
                write!(f, "result {n} does not exist, the page has {found}")
            }
        }
    }
}

impl Error for CliError {}

/// Runs one CLI command, writing human-readable output to `out`.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
    let state_dir = cli.state_dir();
    tracing::debug!(state_dir = %state_dir.display(), "opening session");
    let mut options = ExportOptions::default();
    if let Command::Export {
        scale,
        quality,
        heading,
        ..
    } = &cli.command
    {
        options.supersample = *scale;
        options.quality = *quality;
        if let Some(heading) = heading {
            options.heading.clone_from(heading);
        }
    }
    let mut session = Session::new(FileStorage::new(&state_dir), options);
    if let Some(font) = &cli.font {
        session = session.with_font(fs::read(font)?);
    }
    match session.guarded(|session| execute(session, &cli, out)) {
        Ok(result) => result,
        Err(fault) => {
            writeln!(out, "{fault}; run `covergrid reset` if the saved tiles are damaged")?;
            Err(fault.into())
        }
    }
}

fn execute<S: Storage>(
    session: &mut Session<S>,
    cli: &Cli,
    out: &mut dyn Write,
) -> Result<(), Box<dyn Error>> {
    match &cli.command {
        Command::Show => {
            for tile in session.tiles() {
                write_tile(out, tile)?;
            }
        }
        Command::Label { index, text } => write_tile(out, session.set_label(*index, text)?)?,
        Command::Background { index, color } => {
            write_tile(out, session.set_background(*index, color.0)?)?;
        }
        Command::TextColor { index, color } => {
            write_tile(out, session.set_text_color(*index, color.0)?)?;
        }
        Command::Fill { index, text } => write_tile(out, session.fill_text(*index, text)?)?,
        Command::Search { query, page } => {
            let results = search(cli, query, *page)?;
            write_page(out, &results)?;
        }
        Command::Pick {
            index,
            query,
            n,
            page,
        } => {
            let results = search(cli, query, *page)?;
            let song = n
                .checked_sub(1)
                .and_then(|i| results.songs.get(i))
                .cloned()
                .ok_or(CliError::NoSuchResult {
                    n: *n,
                    found: results.songs.len(),
                })?;
            session.select(*index)?;
            write_tile(out, session.pick_song(*index, song)?)?;
        }
        Command::Clear { index } => write_tile(out, session.clear_tile(*index)?)?,
        Command::Reset => {
            session.reset();
            writeln!(out, "all tiles reset")?;
        }
        Command::Fit { width, height } => {
            let scale = session.mount(Size::new(*width, *height));
            let shown = session.scale().presented_size();
            let natural = session.layout().bounds().size();
            writeln!(
                out,
                "scale {scale:.3}: {:.0}x{:.0} cover shown at {:.0}x{:.0}",
                natural.width, natural.height, shown.width, shown.height
            )?;
        }
        Command::Export { out: path, .. } => {
            let mut art = CoverLoader::new();
            if let Some(dir) = cli.catalog.as_deref().and_then(Path::parent) {
                art = art.with_base_dir(dir);
            }
            let mut sink = FileSink::new(path);
            let cover = session.export(&mut VelloCpuRasterizer::new(), &mut art, &mut sink)?;
            writeln!(
                out,
                "wrote {} ({}x{}, {} bytes)",
                path.display(),
                cover.width,
                cover.height,
                cover.jpeg.len()
            )?;
        }
    }
    Ok(())
}

fn search(cli: &Cli, query: &str, page: u32) -> Result<SongPage, Box<dyn Error>> {
    let path = cli.catalog.as_deref().ok_or(CliError::NoCatalog)?;
    let catalog = JsonCatalog::open(path)?;
    let mut state = SearchState::new();
    state.submit(query);
    // Paging past the allowed range is ignored and stays on the first page.
    state.turn_page(i64::from(page));
    Ok(lookup(&catalog, &state))
}

fn write_tile(out: &mut dyn Write, tile: &Tile) -> std::io::Result<()> {
    let colors = tile.colors();
    let content = match &tile.content {
        TileContent::Empty => String::from("(empty)"),
        TileContent::Song(song) => format!("{} / {}", song.title, song.artist),
        TileContent::FreeText(text) => format!("{text:?}"),
    };
    writeln!(
        out,
        "{} {:<8} {:<40} bg {} text {}",
        tile.index, tile.label, content, colors.background, colors.text
    )
}

fn write_page(out: &mut dyn Write, page: &SongPage) -> std::io::Result<()> {
    if page.is_empty() {
        return writeln!(out, "no results on page {}", page.page);
    }
    for (i, song) in page.songs.iter().enumerate() {
        write!(out, "{:>2}. {} / {}", i + 1, song.title, song.artist)?;
        if let Some(album) = &song.album {
            write!(out, " ({album})")?;
        }
        writeln!(out)?;
    }
    if page.has_more {
        writeln!(out, "more on page {}", page.page + 1)?;
    }
    Ok(())
}
