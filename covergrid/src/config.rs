// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line and environment configuration.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use covergrid_color::{Color, ParseColorError};
use covergrid_export::{DEFAULT_QUALITY, DEFAULT_SUPERSAMPLE};
use covergrid_tiles::default_state_dir;

/// Application name, used for the default state directory.
pub const APP_NAME: &str = "covergrid";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "COVERGRID_LOG";

/// Log filter used when [`LOG_ENV`] is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Make a 3×3 song cover from the command line.
#[derive(Debug, Parser)]
#[command(name = "covergrid", version, about)]
pub struct Cli {
    /// Directory holding saved tiles.
    #[arg(long, global = true, env = "COVERGRID_STATE_DIR", value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// JSON song list used by `search` and `pick`.
    #[arg(long, global = true, env = "COVERGRID_CATALOG", value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Font file for text on exported covers.
    #[arg(long, global = true, env = "COVERGRID_FONT", value_name = "FILE")]
    pub font: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The state directory: `--state-dir`, or the per-user default.
    #[must_use]
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir
            .clone()
            .unwrap_or_else(|| default_state_dir(APP_NAME))
    }
}

/// A CLI command.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the nine tiles with their content and colors.
    Show,
    /// Rename a tile.
    Label {
        /// Tile index, 0 to 8.
        index: usize,
        /// New label.
        text: String,
    },
    /// Set a tile's background, or `none` for the palette default.
    Background {
        /// Tile index, 0 to 8.
        index: usize,
        /// `#rrggbb`, a palette token such as `bg-blue-200`, or `none`.
        color: ColorChoice,
    },
    /// Set a tile's text color, or `none` for automatic contrast.
    TextColor {
        /// Tile index, 0 to 8.
        index: usize,
        /// `#rrggbb`, `text-dark`, `text-light`, or `none`.
        color: ColorChoice,
    },
    /// Put free text into a tile.
    Fill {
        /// Tile index, 0 to 8.
        index: usize,
        /// Text to show.
        text: String,
    },
    /// Search the song catalog.
    Search {
        /// Title or artist to look for.
        query: String,
        /// Result page, starting at 0.
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Put the n-th search result into a tile.
    Pick {
        /// Tile index, 0 to 8.
        index: usize,
        /// Title or artist to look for.
        query: String,
        /// Result number on the page, starting at 1.
        n: usize,
        /// Result page, starting at 0.
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Empty a tile, keeping its label and colors.
    Clear {
        /// Tile index, 0 to 8.
        index: usize,
    },
    /// Return every tile to its default.
    Reset,
    /// Print the scale the cover would be shown at in a viewport.
    Fit {
        /// Viewport width in pixels.
        width: f64,
        /// Viewport height in pixels.
        height: f64,
    },
    /// Render the cover to a JPEG file.
    Export {
        /// Output file.
        out: PathBuf,
        /// Supersampling factor.
        #[arg(long, default_value_t = DEFAULT_SUPERSAMPLE)]
        scale: f64,
        /// JPEG quality, 1 to 100.
        #[arg(long, default_value_t = DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,
        /// Heading printed above the grid.
        #[arg(long)]
        heading: Option<String>,
    },
}

/// A color argument: a color, or `none` to remove an override.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColorChoice(pub Option<Color>);

impl FromStr for ColorChoice {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("none") {
            return Ok(Self(None));
        }
        s.parse().map(|color| Self(Some(color)))
    }
}
