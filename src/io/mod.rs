//! Bounded and safe I/O utilities for reading the input binary.
//!
//! This module provides a `SafeReader` for accessing file contents in a safe,
//! efficient, and ergonomic way. It uses memory-mapping for performance and
//! enforces resource limits so a hostile program header cannot make the tool
//! read unbounded amounts of data.

pub mod error;

use crate::io::error::{IoError, Result};
use bytes::Bytes;
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Defines the resource limits for I/O operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IOLimits {
    /// The absolute maximum file size that can be opened.
    pub max_file_size: u64,
    /// The maximum total number of bytes that can be read from the file across all operations.
    pub max_read_bytes: u64,
}

impl Default for IOLimits {
    fn default() -> Self {
        Self {
            max_file_size: 256 * 1024 * 1024, // 256MB
            max_read_bytes: 1024 * 1024 * 1024, // 1GB
        }
    }
}

/// A safe, bounded file reader that uses memory-mapping for efficient access.
///
/// The mapping is released when the reader is dropped.
pub struct SafeReader {
    path: PathBuf,
    // None when the file size is zero; memmap cannot map empty files.
    mmap: Option<Mmap>,
    limits: IOLimits,
    bytes_read: Cell<u64>,
    file_size: u64,
}

impl SafeReader {
    /// Opens a file, memory-maps it, and wraps it in a `SafeReader`.
    ///
    /// This function will fail if the file size exceeds `limits.max_file_size`.
    pub fn open<P: AsRef<Path>>(path: P, limits: IOLimits) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();

        debug!(
            path = %path.display(),
            size = file_size,
            limits.max_file_size = limits.max_file_size,
            "Opening file for safe reading"
        );

        if file_size > limits.max_file_size {
            debug!(
                path = %path.display(),
                size = file_size,
                limit = limits.max_file_size,
                "File is too large"
            );
            return Err(IoError::FileTooLarge {
                limit: limits.max_file_size,
                found: file_size,
            });
        }

        let mmap = if file_size == 0 {
            None
        } else {
            // Safety: The file is backed by a real file on disk and we only request a read-only map.
            Some(unsafe { Mmap::map(&file)? })
        };

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
            limits,
            bytes_read: Cell::new(0),
            file_size,
        })
    }

    /// Path the reader was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the total size of the underlying file in bytes.
    pub fn size(&self) -> u64 {
        self.file_size
    }

    /// Returns the total number of bytes read so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read.get()
    }

    /// Returns the `IOLimits` enforced by this reader.
    pub fn limits(&self) -> &IOLimits {
        &self.limits
    }

    /// Borrow the whole mapping without charging the read budget.
    ///
    /// Used for header parsing, which only touches a small prefix of the file.
    pub fn as_slice(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    /// Check that `offset..offset + len` lies entirely within the file.
    pub fn check_range(&self, offset: u64, len: u64) -> Result<()> {
        match offset.checked_add(len) {
            Some(end) if end <= self.file_size => Ok(()),
            _ => Err(IoError::OutOfBounds {
                offset,
                len,
                file_size: self.file_size,
            }),
        }
    }

    /// Reads exactly `len` bytes starting at `offset`.
    ///
    /// Unlike a plain positional read, a range that runs past the end of the
    /// file is an error rather than a short read.
    ///
    /// # Errors
    ///
    /// Returns `IoError::OutOfBounds` for a range outside the file and
    /// `IoError::ReadLimitExceeded` if the read would push the total past
    /// `limits.max_read_bytes`.
    pub fn read_exact_at(&self, offset: u64, len: u64) -> Result<Bytes> {
        self.check_range(offset, len)?;

        let current = self.bytes_read.get();
        if current.saturating_add(len) > self.limits.max_read_bytes {
            debug!(
                path = %self.path.display(),
                current_read = current,
                requested = len,
                limit = self.limits.max_read_bytes,
                "Read limit exceeded"
            );
            return Err(IoError::ReadLimitExceeded {
                limit: self.limits.max_read_bytes,
                current,
                requested: len,
            });
        }

        if len == 0 {
            return Ok(Bytes::new());
        }

        // check_range guarantees both ends fit in the mapped length.
        let start = offset as usize;
        let end = start + len as usize;
        let out = Bytes::copy_from_slice(&self.as_slice()[start..end]);
        self.bytes_read.set(current + len);

        trace!(
            path = %self.path.display(),
            offset = offset,
            len = len,
            total_read = current + len,
            "Performed read"
        );

        Ok(out)
    }
}

impl Drop for SafeReader {
    fn drop(&mut self) {
        trace!(path = %self.path.display(), "Releasing file mapping");
    }
}
