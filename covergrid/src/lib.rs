// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Covergrid: a 3×3 grid of songs, exported as an album-style cover.
//!
//! [`Session`] is the context object a front end drives. It owns the tile
//! store, the fit-to-viewport scale and the export renderer, and wraps
//! operations in a fault boundary ([`Session::guarded`]) so an unexpected
//! panic leaves the session recoverable rather than crashing the front end.
//!
//! The `covergrid` binary is a command-line front end over the same session;
//! see [`config::Cli`] for its commands and [`run`] for how they map onto the
//! session.

pub mod config;

mod app;
mod session;
mod sink;

pub use app::{CliError, run};
pub use session::{ExportError, Fault, Session};
pub use sink::{DownloadSink, FileSink, MemorySink};
