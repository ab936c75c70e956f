// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cover art sources.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use covergrid_imaging::{ImageSizeError, RasterImage};

/// Error raised while loading cover art.
#[derive(Debug)]
pub enum CoverError {
    /// A local file could not be read.
    Io(io::Error),
    /// A remote image could not be fetched.
    Fetch(ureq::Error),
    /// The bytes are not a supported image.
    Decode(image::ImageError),
    /// The decoded image has inconsistent dimensions.
    Size(ImageSizeError),
}

impl fmt::Display for CoverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read cover art: {e}"),
            Self::Fetch(e) => write!(f, "cannot fetch cover art: {e}"),
            Self::Decode(e) => write!(f, "cannot decode cover art: {e}"),
            Self::Size(e) => write!(f, "bad cover art buffer: {e}"),
        }
    }
}

impl std::error::Error for CoverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Fetch(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Size(e) => Some(e),
        }
    }
}

impl From<io::Error> for CoverError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ureq::Error> for CoverError {
    fn from(e: ureq::Error) -> Self {
        Self::Fetch(e)
    }
}

impl From<image::ImageError> for CoverError {
    fn from(e: image::ImageError) -> Self {
        Self::Decode(e)
    }
}

impl From<ImageSizeError> for CoverError {
    fn from(e: ImageSizeError) -> Self {
        Self::Size(e)
    }
}

/// Something that turns a song's cover reference into pixels.
pub trait CoverArt {
    /// Loads the image named by `reference`.
    fn load(&mut self, reference: &str) -> Result<RasterImage, CoverError>;
}

impl<C: CoverArt + ?Sized> CoverArt for &mut C {
    fn load(&mut self, reference: &str) -> Result<RasterImage, CoverError> {
        (**self).load(reference)
    }
}

/// Loads cover art from local files and `http(s)` URLs.
///
/// Relative paths resolve against the base directory when one is set.
#[derive(Clone, Debug, Default)]
pub struct CoverLoader {
    base_dir: Option<PathBuf>,
}

impl CoverLoader {
    /// A loader resolving relative paths against the working directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative paths against `dir`.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.base_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    fn resolve(&self, reference: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(reference),
            None => PathBuf::from(reference),
        }
    }
}

fn is_remote(reference: &str) -> bool {
    let lower = reference.get(..8).unwrap_or(reference).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl CoverArt for CoverLoader {
    fn load(&mut self, reference: &str) -> Result<RasterImage, CoverError> {
        let bytes = if is_remote(reference) {
            tracing::debug!(url = reference, "fetching cover art");
            ureq::get(reference).call()?.body_mut().read_to_vec()?
        } else {
            fs::read(self.resolve(reference))?
        };
        decode_cover(&bytes)
    }
}

/// Decodes PNG or JPEG bytes into an RGBA8 image.
pub fn decode_cover(bytes: &[u8]) -> Result<RasterImage, CoverError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(RasterImage::new(width, height, rgba.into_raw())?)
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::{CoverArt, CoverError, CoverLoader, decode_cover, is_remote};

    #[test]
    fn remote_references_are_urls() {
        assert!(is_remote("https://example.com/a.jpg"), "https");
        assert!(is_remote("HTTP://example.com/a.jpg"), "case-insensitive scheme");
        assert!(!is_remote("art/http.jpg"), "relative path");
        assert!(!is_remote("ftp://x"), "other scheme");
        assert!(!is_remote(""), "empty");
    }

    #[test]
    fn loads_relative_paths_from_the_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]))
            .save(dir.path().join("art.png"))
            .unwrap();
        let image = CoverLoader::new().with_base_dir(dir.path()).load("art.png").unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.pixel(2, 1), Some([10, 20, 30, 255]));
    }

    #[test]
    fn missing_and_garbage_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = CoverLoader::new().with_base_dir(dir.path());
        assert!(matches!(loader.load("absent.png"), Err(CoverError::Io(_))));
        assert!(matches!(decode_cover(b"not an image"), Err(CoverError::Decode(_))));
    }
}
