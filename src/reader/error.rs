use std::path::PathBuf;

use crate::error::ErrorCode;
use crate::metadata::MetadataError;
use crate::mmap::MmapError;
use crate::stride::StrideError;

/// Errors that can occur during reading
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Mapping a window of the file failed
    #[error("Mapping error: {0}")]
    MmapError(#[from] MmapError),

    /// Metadata document could not be parsed
    #[error("Metadata error: {0}")]
    MetadataError(#[from] MetadataError),

    /// Strided copy failed
    #[error("Copy error: {0}")]
    StrideError(#[from] StrideError),

    /// The container file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The tar structure is unreadable
    #[error("Invalid tar archive: {0}")]
    InvalidTarArchive(String),

    /// No entry ending in `.xml`
    #[error("Archive does not contain a metadata document")]
    NoXmlFound,

    /// No array with this name
    #[error("Unknown array name: {0}")]
    InvalidArrayName(String),

    /// The data entry holds less than one sample
    #[error("Data entry holds no samples")]
    NoDataFound,

    /// Offset at or past the end of the data
    #[error("Offset {offset} out of range, {available} samples available")]
    StartIndexOutOfRange {
        /// Requested offset
        offset: u64,
        /// Samples per channel in the data entry
        available: u64,
    },

    /// The interval `[offset, offset + count)` cannot be read
    #[error("Cannot read {count} samples at offset {offset}, {available} samples available")]
    InvalidDataInterval {
        /// Requested offset
        offset: u64,
        /// Requested sample count
        count: u64,
        /// Samples per channel in the data entry
        available: u64,
    },

    /// Interleaved I/Q reads need an even number of values
    #[error("Value count {0} must be even")]
    InvalidArraySize(usize),
}

impl ReaderError {
    /// Integer code reported at the container boundary
    pub fn code(&self) -> ErrorCode {
        match self {
            ReaderError::IoError(_) | ReaderError::InvalidTarArchive(_) => ErrorCode::InvalidTarArchive,
            ReaderError::MmapError(_) | ReaderError::StrideError(_) => ErrorCode::InternalError,
            ReaderError::MetadataError(e) => e.code(),
            ReaderError::NotFound(_) => ErrorCode::FileNotFound,
            ReaderError::NoXmlFound => ErrorCode::InvalidFormatNoXmlFoundInTar,
            ReaderError::InvalidArrayName(_) => ErrorCode::InvalidArrayName,
            ReaderError::NoDataFound => ErrorCode::NoDataFoundInFile,
            ReaderError::StartIndexOutOfRange { .. } => ErrorCode::StartIndexOutOfRange,
            ReaderError::InvalidDataInterval { .. } => ErrorCode::InvalidDataInterval,
            ReaderError::InvalidArraySize(_) => ErrorCode::InvalidArraySize,
        }
    }
}
