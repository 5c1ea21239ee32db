//! Dump the file-backed bytes of an ELF executable's loadable segments.
//!
//! Every `PT_LOAD` program header whose virtual address is at or above a
//! floor (default [`config::DEFAULT_MIN_VADDR`]) becomes one line of
//! comma-separated `0x..` byte tokens.

pub mod config;
pub mod dump;
pub mod error;
pub mod formats;
pub mod io;
pub mod logging;

pub use config::{DumpConfig, EmptySegmentPolicy, DEFAULT_MIN_VADDR};
pub use dump::{dump_path, format_line, DumpSummary, SegmentDumper};
pub use error::{Result, SegdumpError};
pub use formats::elf::ElfImage;
