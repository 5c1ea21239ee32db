//! Core ELF types and constants

use std::fmt;

/// ELF loading errors
#[derive(Debug, Clone)]
pub enum ElfError {
    NotElf { kind: String },
    Malformed(String),
    OffsetOutOfRange { offset: u64, filesz: u64 },
}

impl fmt::Display for ElfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotElf { kind } => write!(f, "not an ELF object (detected {})", kind),
            Self::Malformed(msg) => write!(f, "malformed ELF: {}", msg),
            Self::OffsetOutOfRange { offset, filesz } => write!(
                f,
                "offset {:#x} is past the segment file size {:#x}",
                offset, filesz
            ),
        }
    }
}

impl std::error::Error for ElfError {}

impl From<object::read::Error> for ElfError {
    fn from(err: object::read::Error) -> Self {
        ElfError::Malformed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ElfError>;

/// Program header types
pub const PT_NULL: u32 = 0;
pub const PT_LOAD: u32 = 1;
pub const PT_DYNAMIC: u32 = 2;
pub const PT_INTERP: u32 = 3;
pub const PT_NOTE: u32 = 4;
pub const PT_SHLIB: u32 = 5;
pub const PT_PHDR: u32 = 6;
pub const PT_TLS: u32 = 7;
pub const PT_GNU_EH_FRAME: u32 = 0x6474e550;
pub const PT_GNU_STACK: u32 = 0x6474e551;
pub const PT_GNU_RELRO: u32 = 0x6474e552;
pub const PT_GNU_PROPERTY: u32 = 0x6474e553;

/// Readable segment flag
pub const PF_R: u32 = 0x4;

/// Short name of a program header type, for diagnostics.
pub fn segment_type_name(p_type: u32) -> &'static str {
    match p_type {
        PT_NULL => "NULL",
        PT_LOAD => "LOAD",
        PT_DYNAMIC => "DYNAMIC",
        PT_INTERP => "INTERP",
        PT_NOTE => "NOTE",
        PT_SHLIB => "SHLIB",
        PT_PHDR => "PHDR",
        PT_TLS => "TLS",
        PT_GNU_EH_FRAME => "GNU_EH_FRAME",
        PT_GNU_STACK => "GNU_STACK",
        PT_GNU_RELRO => "GNU_RELRO",
        PT_GNU_PROPERTY => "GNU_PROPERTY",
        _ => "OTHER",
    }
}

/// One entry of the program header table, widened to 64-bit fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramHeaderEntry {
    /// Position in the program header table.
    pub index: usize,
    pub p_type: u32,
    pub p_flags: u32,
    pub offset: u64,
    pub vaddr: u64,
    pub filesz: u64,
    pub memsz: u64,
}

impl ProgramHeaderEntry {
    pub fn is_load(&self) -> bool {
        self.p_type == PT_LOAD
    }

    pub fn type_name(&self) -> &'static str {
        segment_type_name(self.p_type)
    }
}
