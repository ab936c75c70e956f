// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use covergrid_export::Exported;

/// Where finished covers go.
pub trait DownloadSink {
    /// Hands `cover` to the user.
    fn deliver(&mut self, cover: &Exported) -> io::Result<()>;
}

/// Writes each cover to one file path, replacing what was there.
#[derive(Clone, Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// A sink writing to `path`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DownloadSink for FileSink {
    fn deliver(&mut self, cover: &Exported) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, &cover.jpeg)
    }
}

/// Keeps delivered covers in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    /// Covers in delivery order.
    pub covers: Vec<Exported>,
}

impl DownloadSink for MemorySink {
    fn deliver(&mut self, cover: &Exported) -> io::Result<()> {
        self.covers.push(cover.clone());
        Ok(())
    }
}
