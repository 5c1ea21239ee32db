//! Segment selection and hex rendering.
//!
//! A program header qualifies when it is `PT_LOAD` and its virtual address is
//! at least the configured floor. Each qualifying segment's file-backed bytes
//! become one line of `0x..,` tokens.

use crate::config::{DumpConfig, EmptySegmentPolicy};
use crate::error::{Result, SegdumpError};
use crate::formats::elf::{ElfImage, ProgramHeaderEntry};
use crate::io::error::IoError;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info_span, trace};

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Whether `entry` is dumped under the given address floor.
pub fn qualifies(entry: &ProgramHeaderEntry, min_vaddr: u64) -> bool {
    entry.is_load() && entry.vaddr >= min_vaddr
}

/// Render `bytes` as one output line, trailing newline included.
///
/// `[0xde, 0xad]` becomes `"0xde, 0xad, \n"`.
pub fn format_line(bytes: &[u8]) -> String {
    let mut line = String::with_capacity(bytes.len() * 6 + 1);
    for &b in bytes {
        line.extend(token(b).iter().map(|&c| c as char));
    }
    line.push('\n');
    line
}

/// Write the line for `bytes` to `out`, one token at a time.
///
/// Nothing proportional to the segment size is allocated; wrap `out` in a
/// `BufWriter` when it is unbuffered.
pub fn write_line<W: Write>(out: &mut W, bytes: &[u8]) -> std::io::Result<()> {
    for &b in bytes {
        out.write_all(&token(b))?;
    }
    out.write_all(b"\n")
}

fn token(b: u8) -> [u8; 6] {
    [
        b'0',
        b'x',
        HEX_DIGITS[(b >> 4) as usize],
        HEX_DIGITS[(b & 0x0f) as usize],
        b',',
        b' ',
    ]
}

/// Counters describing a finished dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpSummary {
    /// Entries in the program header table.
    pub segments_total: usize,
    /// Lines written, blank lines for empty segments included.
    pub segments_dumped: usize,
    pub segments_skipped_empty: usize,
    pub bytes_dumped: u64,
}

/// Dumps the qualifying segments of one image.
pub struct SegmentDumper<'a> {
    image: &'a ElfImage,
    config: &'a DumpConfig,
}

impl<'a> SegmentDumper<'a> {
    pub fn new(image: &'a ElfImage, config: &'a DumpConfig) -> Self {
        Self { image, config }
    }

    /// Qualifying entries in table order.
    pub fn qualifying(&self) -> impl Iterator<Item = &'a ProgramHeaderEntry> + 'a {
        let min_vaddr = self.config.min_vaddr;
        self.image
            .program_headers()
            .iter()
            .filter(move |entry| qualifies(entry, min_vaddr))
    }

    /// Lazily read and render each qualifying segment.
    ///
    /// The sequence ends after the first error.
    pub fn lines(&self) -> Lines<'a> {
        Lines {
            image: self.image,
            config: self.config,
            entries: self.image.program_headers().iter(),
        }
    }

    /// Check every qualifying segment before anything is printed.
    ///
    /// Catches ranges past the end of the file and dumps that would overrun
    /// the read budget, so a failing run leaves the output empty.
    pub fn validate(&self) -> Result<()> {
        let mut total: u64 = 0;
        for entry in self.qualifying() {
            self.image
                .segment_reader(entry)
                .ensure_in_file()
                .map_err(|e| SegdumpError::segment(entry.index, entry.vaddr, e))?;
            total = total.saturating_add(entry.filesz);
        }

        let limit = self.image.limits().max_read_bytes;
        let current = self.image.bytes_read();
        if current.saturating_add(total) > limit {
            return Err(IoError::ReadLimitExceeded {
                limit,
                current,
                requested: total,
            }
            .into());
        }
        Ok(())
    }

    /// Validate, then stream every line to `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<DumpSummary> {
        let span = info_span!("dump", path = %self.image.path().display());
        let _guard = span.enter();

        self.validate()?;

        let mut summary = DumpSummary {
            segments_total: self.image.program_headers().len(),
            ..DumpSummary::default()
        };

        for entry in self.image.program_headers() {
            if !qualifies(entry, self.config.min_vaddr) {
                trace!(
                    index = entry.index,
                    kind = entry.type_name(),
                    vaddr = entry.vaddr,
                    "Skipping segment"
                );
                continue;
            }

            let bytes = self
                .image
                .segment_reader(entry)
                .read_all()
                .map_err(|e| SegdumpError::segment(entry.index, entry.vaddr, e))?;

            if bytes.is_empty() && self.config.empty_segments == EmptySegmentPolicy::Skip {
                debug!(index = entry.index, vaddr = entry.vaddr, "Empty segment, no line");
                summary.segments_skipped_empty += 1;
                continue;
            }

            write_line(out, &bytes).map_err(SegdumpError::Output)?;
            summary.segments_dumped += 1;
            summary.bytes_dumped += bytes.len() as u64;
        }

        out.flush().map_err(SegdumpError::Output)?;

        debug!(
            segments_total = summary.segments_total,
            segments_dumped = summary.segments_dumped,
            bytes = summary.bytes_dumped,
            "Dump complete"
        );
        Ok(summary)
    }
}

/// Iterator returned by [`SegmentDumper::lines`].
pub struct Lines<'a> {
    image: &'a ElfImage,
    config: &'a DumpConfig,
    entries: std::slice::Iter<'a, ProgramHeaderEntry>,
}

impl Iterator for Lines<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = self.entries.next()?;
            if !qualifies(entry, self.config.min_vaddr) {
                continue;
            }
            match self.image.segment_reader(entry).read_all() {
                Ok(bytes) => {
                    if bytes.is_empty() && self.config.empty_segments == EmptySegmentPolicy::Skip {
                        continue;
                    }
                    return Some(Ok(format_line(&bytes)));
                }
                Err(e) => {
                    self.entries = Default::default();
                    return Some(Err(SegdumpError::segment(entry.index, entry.vaddr, e)));
                }
            }
        }
    }
}

/// Open `path`, dump its qualifying segments to `out` and close it.
pub fn dump_path<P: AsRef<Path>, W: Write>(
    path: P,
    config: &DumpConfig,
    out: &mut W,
) -> Result<DumpSummary> {
    let image = ElfImage::open(path, config.io.clone())?;
    let summary = SegmentDumper::new(&image, config).write_to(out)?;
    image.close();
    Ok(summary)
}
