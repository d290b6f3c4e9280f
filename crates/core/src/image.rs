//! Raw image access: an owned byte buffer with bounded reads.
//!
//! Firmware images in this family are small (a few megabytes at most), so the
//! whole file is held in memory. All reads are bounds-checked and return
//! [`ImageError`] rather than panicking; the loading pipeline depends on
//! out-of-range reads being an ordinary, reportable condition.

use std::fs;
use std::path::Path;

use thiserror::Error;

/// Error type for raw image access.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The image file could not be read from disk.
    #[error("Failed to read image file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A read fell outside the image bounds.
    #[error("Read of {len:#x} bytes at offset {offset:#x} is outside the {image_len:#x}-byte image")]
    OutOfBounds { offset: u64, len: u64, image_len: u64 },
}

/// A raw firmware image: byte-addressable, read-only.
#[derive(Debug, Clone)]
pub struct RawImage {
    bytes: Vec<u8>,
}

impl RawImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Read the whole file at `path` into memory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ImageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(bytes))
    }

    /// Total image length in bytes.
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The full image contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bounded read of `len` bytes starting at `offset`.
    pub fn read(&self, offset: u64, len: u64) -> Result<&[u8], ImageError> {
        let end = offset.checked_add(len).filter(|end| *end <= self.len()).ok_or(
            ImageError::OutOfBounds { offset, len, image_len: self.len() },
        )?;
        Ok(&self.bytes[offset as usize..end as usize])
    }

    /// Read a little-endian 64-bit integer at `offset`.
    pub fn read_u64_le(&self, offset: u64) -> Result<u64, ImageError> {
        let bytes = self.read(offset, 8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(raw))
    }
}
