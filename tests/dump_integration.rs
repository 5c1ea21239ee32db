//! End-to-end tests of the library API against on-disk ELF files.

mod common;

use common::*;
use segdump::formats::elf::segments::parse_program_headers;
use segdump::io::error::IoError;
use segdump::{dump_path, DumpConfig, EmptySegmentPolicy, SegdumpError};

fn dump(path: &std::path::Path, config: &DumpConfig) -> segdump::Result<String> {
    let mut out = Vec::new();
    dump_path(path, config, &mut out)?;
    Ok(String::from_utf8(out).expect("dump output is ASCII"))
}

#[test]
fn minimal_executable_dumps_exact_bytes() {
    let file = write_elf(
        ElfBuilder::new()
            .segment(PT_LOAD, 0x400078, &[0xde, 0xad, 0xbe, 0xef]),
    );
    let out = dump(file.path(), &DumpConfig::default()).unwrap();
    assert_eq!(out, "0xde, 0xad, 0xbe, 0xef, \n");
}

#[test]
fn only_load_segments_above_floor_are_printed() {
    let file = write_elf(
        ElfBuilder::new()
            .segment(PT_LOAD, 0x100, &[0x01, 0x02, 0x03])
            .segment(PT_NOTE, 0x7fff_0000, &[0x04])
            .segment(PT_LOAD, 0x10000, &[0x05, 0x06])
            .segment(PT_DYNAMIC, 0x20000, &[0x07])
            .segment(PT_GNU_STACK, 0x30000, &[]),
    );
    let out = dump(file.path(), &DumpConfig::default()).unwrap();
    assert_eq!(out, "0x05, 0x06, \n");
}

#[test]
fn token_counts_and_values_match_file() {
    let payload_a: Vec<u8> = (0..=255u8).collect();
    let payload_b: Vec<u8> = (0..300u32).map(|i| (i * 7 % 256) as u8).collect();
    let file = write_elf(
        ElfBuilder::new()
            .segment(PT_LOAD, 0x400000, &payload_a)
            .segment(PT_LOAD, 0x500000, &payload_b),
    );

    let out = dump(file.path(), &DumpConfig::default()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(parse_line(lines[0]), payload_a);
    assert_eq!(parse_line(lines[1]), payload_b);
}

#[test]
fn repeated_runs_are_identical() {
    let file = write_elf(
        ElfBuilder::new()
            .segment(PT_LOAD, 0x400000, &[0xaa; 64])
            .segment(PT_LOAD, 0x401000, &[0x55; 17]),
    );
    let first = dump(file.path(), &DumpConfig::default()).unwrap();
    let second = dump(file.path(), &DumpConfig::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn elf32_big_endian_file() {
    let file = write_elf(
        ElfBuilder::new()
            .elf32()
            .big_endian()
            .segment(PT_LOAD, 0x200, &[0x99])
            .segment(PT_LOAD, 0x10400, &[0x13, 0x05, 0x00, 0x00])
            .segment(PT_LOAD, 0x10800, &[0xff, 0x7f]),
    );
    let out = dump(file.path(), &DumpConfig::default()).unwrap();
    assert_eq!(out, "0x13, 0x05, 0x00, 0x00, \n0xff, 0x7f, \n");
}

#[test]
fn empty_segment_produces_no_line_by_default() {
    let file = write_elf(ElfBuilder::new().segment(PT_LOAD, 0x400000, &[]));
    assert_eq!(dump(file.path(), &DumpConfig::default()).unwrap(), "");

    let config = DumpConfig::default().with_empty_segments(EmptySegmentPolicy::BlankLine);
    assert_eq!(dump(file.path(), &config).unwrap(), "\n");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = dump(std::path::Path::new("/no/such/file"), &DumpConfig::default()).unwrap_err();
    assert!(matches!(err, SegdumpError::Io(IoError::StdIo(_))));
}

#[test]
fn non_elf_input_is_rejected() {
    let file = create_temp_file(b"MZ\x90\x00 definitely not an ELF image, just bytes");
    let err = dump(file.path(), &DumpConfig::default()).unwrap_err();
    assert!(matches!(err, SegdumpError::Elf(_)));
}

#[test]
fn truncated_segment_leaves_output_empty() {
    let file = write_elf(
        ElfBuilder::new()
            .segment(PT_LOAD, 0x400000, &[0x01])
            .raw_segment(PT_LOAD, 0x401000, 0x40, 0x100000),
    );
    let mut out = Vec::new();
    let err = dump_path(file.path(), &DumpConfig::default(), &mut out).unwrap_err();
    assert!(matches!(err, SegdumpError::Segment { index: 1, .. }));
    assert!(out.is_empty());
}

#[test]
fn oversized_input_is_refused() {
    let file = write_elf(ElfBuilder::new().segment(PT_LOAD, 0x400000, &[0u8; 4096]));
    let mut config = DumpConfig::default();
    config.io.max_file_size = 1024;
    let err = dump(file.path(), &config).unwrap_err();
    assert!(matches!(err, SegdumpError::Io(IoError::FileTooLarge { .. })));
}

#[test]
fn system_binary_lines_match_program_headers() {
    let Some(path) = system_binary() else { return }; // skip if missing
    let data = std::fs::read(path).unwrap();
    let headers = parse_program_headers(&data).unwrap();
    let config = DumpConfig::default();

    let expected: Vec<&[u8]> = headers
        .iter()
        .filter(|h| h.is_load() && h.vaddr >= config.min_vaddr && h.filesz > 0)
        .map(|h| &data[h.offset as usize..(h.offset + h.filesz) as usize])
        .collect();

    let out = dump(path, &config).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), expected.len());
    for (line, bytes) in lines.iter().zip(expected) {
        assert_eq!(parse_line(line), bytes);
    }
}
