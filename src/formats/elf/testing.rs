//! Hand-assembled ELF images for the unit and integration tests.

use crate::formats::elf::types::PF_R;

struct PendingSegment {
    p_type: u32,
    p_flags: u32,
    vaddr: u64,
    // None: place `data` after the header table.
    range: Option<(u64, u64)>,
    data: Vec<u8>,
}

/// Builds a minimal executable: ELF header, program header table, then
/// segment payloads in declaration order.
pub struct ElfBuilder {
    is_64: bool,
    big_endian: bool,
    segments: Vec<PendingSegment>,
}

impl ElfBuilder {
    pub fn new() -> Self {
        Self {
            is_64: true,
            big_endian: false,
            segments: Vec::new(),
        }
    }

    pub fn elf32(mut self) -> Self {
        self.is_64 = false;
        self
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    pub fn segment(mut self, p_type: u32, vaddr: u64, data: &[u8]) -> Self {
        self.segments.push(PendingSegment {
            p_type,
            p_flags: PF_R,
            vaddr,
            range: None,
            data: data.to_vec(),
        });
        self
    }

    /// Segment with an explicit file range and no payload of its own.
    pub fn raw_segment(mut self, p_type: u32, vaddr: u64, offset: u64, filesz: u64) -> Self {
        self.segments.push(PendingSegment {
            p_type,
            p_flags: PF_R,
            vaddr,
            range: Some((offset, filesz)),
            data: Vec::new(),
        });
        self
    }

    fn header_size(&self) -> usize {
        if self.is_64 {
            64
        } else {
            52
        }
    }

    fn phent_size(&self) -> usize {
        if self.is_64 {
            56
        } else {
            32
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let table_end = self.header_size() + self.phent_size() * self.segments.len();
        let mut out = vec![0u8; table_end];

        let mut ranges = Vec::with_capacity(self.segments.len());
        for seg in &self.segments {
            match seg.range {
                Some(range) => ranges.push(range),
                None => {
                    ranges.push((out.len() as u64, seg.data.len() as u64));
                    out.extend_from_slice(&seg.data);
                }
            }
        }

        let mut w = FieldWriter {
            buf: &mut out,
            big_endian: self.big_endian,
        };

        w.bytes(0, b"\x7fELF");
        w.bytes(4, &[if self.is_64 { 2 } else { 1 }]);
        w.bytes(5, &[if self.big_endian { 2 } else { 1 }]);
        w.bytes(6, &[1]);
        w.u16(16, 2); // ET_EXEC
        w.u16(18, 0xf3); // EM_RISCV
        w.u32(20, 1);

        let phnum = self.segments.len() as u16;
        let phoff = self.header_size() as u64;
        if self.is_64 {
            w.u64(24, 0x400);
            w.u64(32, if phnum == 0 { 0 } else { phoff });
            w.u16(52, 64);
            w.u16(54, 56);
            w.u16(56, phnum);
            w.u16(58, 64);
        } else {
            w.u32(24, 0x400);
            w.u32(28, if phnum == 0 { 0 } else { phoff as u32 });
            w.u16(40, 52);
            w.u16(42, 32);
            w.u16(44, phnum);
            w.u16(46, 40);
        }

        for (i, (seg, (offset, filesz))) in self.segments.iter().zip(ranges).enumerate() {
            let at = self.header_size() + i * self.phent_size();
            if self.is_64 {
                w.u32(at, seg.p_type);
                w.u32(at + 4, seg.p_flags);
                w.u64(at + 8, offset);
                w.u64(at + 16, seg.vaddr);
                w.u64(at + 24, seg.vaddr);
                w.u64(at + 32, filesz);
                w.u64(at + 40, filesz);
                w.u64(at + 48, 1);
            } else {
                w.u32(at, seg.p_type);
                w.u32(at + 4, offset as u32);
                w.u32(at + 8, seg.vaddr as u32);
                w.u32(at + 12, seg.vaddr as u32);
                w.u32(at + 16, filesz as u32);
                w.u32(at + 20, filesz as u32);
                w.u32(at + 24, seg.p_flags);
                w.u32(at + 28, 1);
            }
        }

        out
    }
}

impl Default for ElfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl ElfBuilder {
    pub fn write_temp(&self) -> tempfile::NamedTempFile {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&self.build()).unwrap();
        file
    }
}

struct FieldWriter<'a> {
    buf: &'a mut Vec<u8>,
    big_endian: bool,
}

impl FieldWriter<'_> {
    fn bytes(&mut self, at: usize, value: &[u8]) {
        self.buf[at..at + value.len()].copy_from_slice(value);
    }

    fn u16(&mut self, at: usize, value: u16) {
        let b = if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        };
        self.bytes(at, &b);
    }

    fn u32(&mut self, at: usize, value: u32) {
        let b = if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        };
        self.bytes(at, &b);
    }

    fn u64(&mut self, at: usize, value: u64) {
        let b = if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        };
        self.bytes(at, &b);
    }
}
