// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image probe — reads the byte size and pixel dimensions of an uploaded
// image without decoding its pixel data. Dimensions come from the image
// header via the `image` crate.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use ::image::ImageReader;
use landreg_core::error::LandregError;
use tracing::{debug, instrument};

/// Anything the classifier can query for size and dimensions.
///
/// Every call reads the underlying resource again; implementations must not
/// cache answers between calls.
pub trait ImageSource: Send + Sync {
    /// Short human-readable label used in logs.
    fn describe(&self) -> String;

    /// Size of the encoded image in bytes.
    fn byte_len(&self) -> Result<u64, LandregError>;

    /// Pixel `(width, height)`. Both are guaranteed non-zero on success.
    fn dimensions(&self) -> Result<(u32, u32), LandregError>;
}

/// An image stored in a file on this device.
#[derive(Debug, Clone)]
pub struct FileImage {
    path: PathBuf,
}

impl FileImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for FileImage {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn byte_len(&self) -> Result<u64, LandregError> {
        // Any metadata failure means there is no readable image at this path.
        let metadata = std::fs::metadata(&self.path).map_err(|err| {
            LandregError::ResourceMissing(format!("{}: {}", self.path.display(), err))
        })?;
        if !metadata.is_file() {
            return Err(LandregError::ResourceMissing(format!(
                "{} is not a file",
                self.path.display()
            )));
        }
        debug!(bytes = metadata.len(), "Image size read");
        Ok(metadata.len())
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn dimensions(&self) -> Result<(u32, u32), LandregError> {
        let reader = ImageReader::open(&self.path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|err| {
                LandregError::DimensionDecode(format!(
                    "failed to open {}: {}",
                    self.path.display(),
                    err
                ))
            })?;
        let dims = reader.into_dimensions().map_err(|err| {
            LandregError::DimensionDecode(format!(
                "failed to read header of {}: {}",
                self.path.display(),
                err
            ))
        })?;
        ensure_non_zero(dims)
    }
}

/// An encoded image already held in memory, e.g. a freshly picked upload.
#[derive(Debug, Clone, Copy)]
pub struct MemoryImage<'a> {
    data: &'a [u8],
}

impl<'a> MemoryImage<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl ImageSource for MemoryImage<'_> {
    fn describe(&self) -> String {
        format!("<{} bytes in memory>", self.data.len())
    }

    fn byte_len(&self) -> Result<u64, LandregError> {
        if self.data.is_empty() {
            return Err(LandregError::ResourceMissing("empty image buffer".into()));
        }
        Ok(self.data.len() as u64)
    }

    #[instrument(skip(self), fields(data_len = self.data.len()))]
    fn dimensions(&self) -> Result<(u32, u32), LandregError> {
        let dims = ImageReader::new(Cursor::new(self.data))
            .with_guessed_format()
            .map_err(|err| LandregError::DimensionDecode(err.to_string()))?
            .into_dimensions()
            .map_err(|err| {
                LandregError::DimensionDecode(format!("failed to decode image header: {}", err))
            })?;
        ensure_non_zero(dims)
    }
}

fn ensure_non_zero((width, height): (u32, u32)) -> Result<(u32, u32), LandregError> {
    if width == 0 || height == 0 {
        return Err(LandregError::DimensionDecode(format!(
            "degenerate image {width}x{height}"
        )));
    }
    debug!(width, height, "Image dimensions read");
    Ok((width, height))
}
