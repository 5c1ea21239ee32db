//! Custom error types for the I/O module.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("file size of {found} bytes exceeds the maximum allowed size of {limit} bytes")]
    FileTooLarge { limit: u64, found: u64 },

    #[error(
        "a read of {requested} bytes would exceed the total read limit of {limit} bytes (already read: {current})"
    )]
    ReadLimitExceeded {
        limit: u64,
        current: u64,
        requested: u64,
    },

    #[error("range {offset:#x}+{len:#x} runs past the end of the file ({file_size} bytes)")]
    OutOfBounds {
        offset: u64,
        len: u64,
        file_size: u64,
    },

    #[error(transparent)]
    StdIo(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IoError>;
