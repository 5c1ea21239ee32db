//! ELF (Executable and Linkable Format) loading
//!
//! Only the program header table is interpreted; header validation and
//! table decoding are delegated to the `object` crate.

pub mod segments;
pub mod types;

#[doc(hidden)]
pub mod testing;

use crate::io::{IOLimits, SafeReader};
use segments::{parse_program_headers, SegmentReader};
use std::path::Path;
use tracing::debug;
pub use types::*;

/// An opened ELF file and its program header table.
///
/// Owns the file mapping. Dropping the image (or calling [`ElfImage::close`])
/// releases it.
pub struct ElfImage {
    reader: SafeReader,
    headers: Vec<ProgramHeaderEntry>,
}

impl ElfImage {
    /// Open and parse the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P, limits: IOLimits) -> crate::Result<Self> {
        let reader = SafeReader::open(path, limits)?;
        let headers = parse_program_headers(reader.as_slice())?;

        debug!(
            path = %reader.path().display(),
            program_headers = headers.len(),
            "Parsed ELF program headers"
        );

        Ok(Self { reader, headers })
    }

    /// Program headers in table order.
    pub fn program_headers(&self) -> &[ProgramHeaderEntry] {
        &self.headers
    }

    /// Reader bound to `entry`'s file range.
    pub fn segment_reader(&self, entry: &ProgramHeaderEntry) -> SegmentReader<'_> {
        SegmentReader::new(*entry, &self.reader)
    }

    pub fn path(&self) -> &Path {
        self.reader.path()
    }

    pub fn limits(&self) -> &IOLimits {
        self.reader.limits()
    }

    /// Total segment bytes read so far.
    pub fn bytes_read(&self) -> u64 {
        self.reader.bytes_read()
    }

    /// Release the file mapping.
    pub fn close(self) {
        debug!(path = %self.reader.path().display(), "Closing ELF image");
    }
}
