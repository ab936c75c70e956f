// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `covergrid` command-line tool.

use std::error::Error;

use clap::Parser;
use covergrid::config::{Cli, DEFAULT_LOG_FILTER, LOG_ENV};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    covergrid::run(cli, &mut std::io::stdout().lock())
}
