use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use segdump::io::IOLimits;
use segdump::{DumpConfig, EmptySegmentPolicy, DEFAULT_MIN_VADDR};

/// Print the file-backed bytes of each loadable ELF segment as comma-separated hex.
#[derive(Parser, Debug)]
#[command(name = "segdump", version, about)]
pub struct Cli {
    /// ELF file to read.
    pub path: PathBuf,

    /// Skip LOAD segments whose virtual address is below this (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_address, default_value_t = DEFAULT_MIN_VADDR)]
    pub min_vaddr: u64,

    /// What to print for a segment with no bytes in the file.
    #[arg(long, value_enum, default_value = "skip")]
    pub empty_segments: EmptySegments,

    /// Refuse inputs larger than this many bytes.
    #[arg(long, default_value_t = IOLimits::default().max_file_size)]
    pub max_file_size: u64,

    /// Increase log verbosity (repeatable). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON.
    #[arg(long)]
    pub log_json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptySegments {
    Skip,
    Blank,
}

impl From<EmptySegments> for EmptySegmentPolicy {
    fn from(value: EmptySegments) -> Self {
        match value {
            EmptySegments::Skip => EmptySegmentPolicy::Skip,
            EmptySegments::Blank => EmptySegmentPolicy::BlankLine,
        }
    }
}

impl Cli {
    pub fn dump_config(&self) -> DumpConfig {
        let mut config = DumpConfig::default()
            .with_min_vaddr(self.min_vaddr)
            .with_empty_segments(self.empty_segments.into());
        config.io.max_file_size = self.max_file_size;
        config
    }
}

fn parse_address(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid address {:?}: {}", s, e))
}
