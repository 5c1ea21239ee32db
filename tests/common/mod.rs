//! Common test utilities and helpers.
//!
//! Images from the crate's `ElfBuilder`, written to temporary files.

#![allow(dead_code, unused_imports)]

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub use segdump::formats::elf::testing::ElfBuilder;
pub use segdump::formats::elf::{PT_DYNAMIC, PT_GNU_STACK, PT_LOAD, PT_NOTE};

/// Creates a temporary file with the given content.
pub fn create_temp_file(content: &[u8]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content).unwrap();
    temp_file
}

pub fn write_elf(builder: ElfBuilder) -> NamedTempFile {
    create_temp_file(&builder.build())
}

/// Parse a dump line back into bytes, checking the token format on the way.
pub fn parse_line(line: &str) -> Vec<u8> {
    let body = line.strip_suffix(", ").unwrap_or(line);
    if body.is_empty() {
        return Vec::new();
    }
    body.split(", ")
        .map(|token| {
            assert_eq!(token.len(), 4, "token {:?}", token);
            let hex = token.strip_prefix("0x").expect("0x prefix");
            assert!(
                hex.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)),
                "token {:?} is not lowercase hex",
                token
            );
            u8::from_str_radix(hex, 16).unwrap()
        })
        .collect()
}

/// System binaries commonly present on Linux hosts; tests skip when absent.
pub fn system_binary() -> Option<&'static Path> {
    ["/bin/true", "/usr/bin/true", "/bin/ls", "/usr/bin/env"]
        .iter()
        .map(Path::new)
        .find(|p| {
            std::fs::read(p)
                .map(|d| d.starts_with(b"\x7fELF"))
                .unwrap_or(false)
        })
}
