//! Configuration for a dump run.
//!
//! Provides the address floor, the empty-segment policy and the I/O limits
//! with defaults matching the tool's historical behavior.

use crate::io::IOLimits;
use serde::{Deserialize, Serialize};

/// Lowest virtual address a LOAD segment may have and still be dumped.
///
/// Matches the load base of the emulator RAM image the output is meant for.
pub const DEFAULT_MIN_VADDR: u64 = 0x400;

/// What to print for a qualifying segment with no file-backed bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySegmentPolicy {
    /// Print nothing.
    #[default]
    Skip,
    /// Print an empty line.
    BlankLine,
}

/// Master configuration for the segment dumper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Segments whose virtual address is below this are skipped.
    pub min_vaddr: u64,
    pub empty_segments: EmptySegmentPolicy,
    /// Bounds on file size and total bytes read.
    pub io: IOLimits,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            min_vaddr: DEFAULT_MIN_VADDR,
            empty_segments: EmptySegmentPolicy::default(),
            io: IOLimits::default(),
        }
    }
}

impl DumpConfig {
    pub fn with_min_vaddr(mut self, min_vaddr: u64) -> Self {
        self.min_vaddr = min_vaddr;
        self
    }

    pub fn with_empty_segments(mut self, policy: EmptySegmentPolicy) -> Self {
        self.empty_segments = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DumpConfig::default();
        assert_eq!(config.min_vaddr, 0x400);
        assert_eq!(config.empty_segments, EmptySegmentPolicy::Skip);
        assert_eq!(config.io, IOLimits::default());
    }

    #[test]
    fn test_builder_overrides() {
        let config = DumpConfig::default()
            .with_min_vaddr(0)
            .with_empty_segments(EmptySegmentPolicy::BlankLine);
        assert_eq!(config.min_vaddr, 0);
        assert_eq!(config.empty_segments, EmptySegmentPolicy::BlankLine);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(DumpConfig::default()).unwrap();
        assert_eq!(json["min_vaddr"], 1024);
        assert_eq!(json["empty_segments"], "skip");

        let parsed: DumpConfig = serde_json::from_str(
            r#"{"min_vaddr":0,"empty_segments":"blank_line","io":{"max_file_size":10,"max_read_bytes":20}}"#,
        )
        .unwrap();
        assert_eq!(parsed.empty_segments, EmptySegmentPolicy::BlankLine);
        assert_eq!(parsed.io.max_read_bytes, 20);
    }
}
