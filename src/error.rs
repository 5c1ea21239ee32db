//! Error types for segdump.
//!
//! Lower layers keep their own error enums (`IoError`, `ElfError`); this
//! module wraps them into the single error returned by the public API.

use crate::formats::elf::types::ElfError;
use crate::io::error::IoError;
use thiserror::Error;

/// Main error type for segdump operations.
#[derive(Debug, Error)]
pub enum SegdumpError {
    /// Opening, mapping or reading the input file failed
    #[error(transparent)]
    Io(#[from] IoError),

    /// The input is not an ELF object or its program header table is unreadable
    #[error(transparent)]
    Elf(#[from] ElfError),

    /// A qualifying segment's bytes could not be read
    #[error("segment {index} at {vaddr:#x}")]
    Segment {
        index: usize,
        vaddr: u64,
        #[source]
        source: Box<SegdumpError>,
    },

    /// Writing the dump to the output stream failed
    #[error("writing output")]
    Output(#[source] std::io::Error),
}

impl SegdumpError {
    pub(crate) fn segment(index: usize, vaddr: u64, source: impl Into<SegdumpError>) -> Self {
        SegdumpError::Segment {
            index,
            vaddr,
            source: Box::new(source.into()),
        }
    }
}

/// Result type alias for segdump operations
pub type Result<T> = std::result::Result<T, SegdumpError>;
