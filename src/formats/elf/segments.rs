//! Program header table access

use crate::formats::elf::types::*;
use crate::io::error::Result as IoResult;
use crate::io::SafeReader;
use bytes::Bytes;
use object::elf::{FileHeader32, FileHeader64};
use object::read::elf::{FileHeader, ProgramHeader};
use object::{Endianness, FileKind};
use tracing::trace;

/// Parse the program header table from a complete ELF image.
///
/// Entries come back in table order; callers rely on that order for output.
pub fn parse_program_headers(data: &[u8]) -> Result<Vec<ProgramHeaderEntry>> {
    match FileKind::parse(data)? {
        FileKind::Elf32 => collect::<FileHeader32<Endianness>>(data),
        FileKind::Elf64 => collect::<FileHeader64<Endianness>>(data),
        other => Err(ElfError::NotElf {
            kind: format!("{:?}", other),
        }),
    }
}

fn collect<Elf>(data: &[u8]) -> Result<Vec<ProgramHeaderEntry>>
where
    Elf: FileHeader<Endian = Endianness>,
{
    let header = Elf::parse(data)?;
    let endian = header.endian()?;
    let headers = header.program_headers(endian, data)?;

    let entries = headers
        .iter()
        .enumerate()
        .map(|(index, ph)| ProgramHeaderEntry {
            index,
            p_type: ph.p_type(endian),
            p_flags: ph.p_flags(endian),
            offset: ph.p_offset(endian).into(),
            vaddr: ph.p_vaddr(endian).into(),
            filesz: ph.p_filesz(endian).into(),
            memsz: ph.p_memsz(endian).into(),
        })
        .collect();

    Ok(entries)
}

/// Byte-range reader bound to one segment's file offset and size.
pub struct SegmentReader<'a> {
    entry: ProgramHeaderEntry,
    source: &'a SafeReader,
}

impl<'a> SegmentReader<'a> {
    pub(crate) fn new(entry: ProgramHeaderEntry, source: &'a SafeReader) -> Self {
        Self { entry, source }
    }

    /// Fails if the segment's file range runs past the end of the file.
    pub fn ensure_in_file(&self) -> IoResult<()> {
        self.source.check_range(self.entry.offset, self.entry.filesz)
    }

    /// Read into `buf` starting `offset` bytes into the segment.
    ///
    /// Reads at most `filesz - offset` bytes and returns the count copied.
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> crate::Result<usize> {
        if offset > self.entry.filesz {
            return Err(ElfError::OffsetOutOfRange {
                offset,
                filesz: self.entry.filesz,
            }
            .into());
        }
        let len = (self.entry.filesz - offset).min(buf.len() as u64);
        let bytes = self.source.read_exact_at(self.entry.offset + offset, len)?;
        buf[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    /// Read exactly `filesz` bytes.
    pub fn read_all(&self) -> IoResult<Bytes> {
        trace!(
            index = self.entry.index,
            offset = self.entry.offset,
            filesz = self.entry.filesz,
            "Reading segment"
        );
        self.source.read_exact_at(self.entry.offset, self.entry.filesz)
    }
}
