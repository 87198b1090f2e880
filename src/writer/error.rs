use std::path::PathBuf;

use crate::error::ErrorCode;
use crate::metadata::IqDataType;

/// Errors that can occur during writing
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Mapping a window of the staging file failed
    #[error("Mapping error: {0}")]
    MmapError(#[from] crate::mmap::MmapError),

    /// Error building the metadata document
    #[error("Metadata error: {0}")]
    MetadataError(#[from] crate::metadata::MetadataError),

    /// Error computing the preview
    #[error("Preview error: {0}")]
    PreviewError(#[from] crate::preview::PreviewError),

    /// The destination or staging file could not be created
    #[error("Cannot create {}: {source}", path.display())]
    FileOpen {
        /// File that failed to open
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The temp directory does not exist
    #[error("Folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    /// Channel description or appended data do not fit together
    #[error("Inconsistent input data: {0}")]
    InconsistentInput(String),

    /// The element type differs from the one already written
    #[error("Data type {found} does not match {expected} already written")]
    WrongDataType {
        /// Locked element type
        expected: IqDataType,
        /// Type of the rejected block
        found: IqDataType,
    },

    /// A block would exceed the declared data size
    #[error("Writing {attempted} bytes exceeds the declared {declared} bytes")]
    DataOverflow {
        /// Declared size of the data entry
        declared: u64,
        /// Size the data entry would have reached
        attempted: u64,
    },

    /// The data entry did not reach its declared size
    #[error("Wrote {written} of {declared} declared bytes, archive is incomplete")]
    SizeMismatch {
        /// Declared size of the data entry
        declared: u64,
        /// Bytes actually written
        written: u64,
    },

    /// Writer was not opened
    #[error("Writer not initialized")]
    NotInitialized,

    /// Writer is already open or closed
    #[error("Writer already initialized")]
    AlreadyInitialized,
}

impl WriterError {
    /// Integer code reported at the container boundary
    pub fn code(&self) -> ErrorCode {
        match self {
            WriterError::IoError(_) | WriterError::MmapError(_) => ErrorCode::InternalError,
            WriterError::MetadataError(e) => e.code(),
            WriterError::PreviewError(e) => e.code(),
            WriterError::FileOpen { .. } => ErrorCode::FileOpenError,
            WriterError::FolderNotFound(_) => ErrorCode::FolderNotFound,
            WriterError::InconsistentInput(_) => ErrorCode::InconsistentInputData,
            WriterError::WrongDataType { .. } => ErrorCode::WrongDataType,
            WriterError::DataOverflow { .. } => ErrorCode::DataOverflow,
            WriterError::SizeMismatch { .. } => ErrorCode::InvalidTarArchive,
            WriterError::NotInitialized => ErrorCode::FileWriterUninitialized,
            WriterError::AlreadyInitialized => ErrorCode::WriterAlreadyInitialized,
        }
    }
}
