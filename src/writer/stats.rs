use std::fmt;

use serde::Serialize;

/// How sample data reaches the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum WriteMode {
    /// Buffered in a temp file, copied into the archive on close
    #[default]
    Staged,
    /// Streamed into the archive behind a header of declared size
    Direct,
}

/// Statistics from a completed write operation
#[derive(Debug, Clone, Default, Serialize)]
pub struct WriterStats {
    /// Samples written per channel
    pub samples_written: u64,
    /// Bytes in the data entry
    pub bytes_written: u64,
    /// Name of the data entry
    pub data_filename: String,
    /// Total archive size in bytes
    pub file_size_bytes: u64,
    /// Staged or direct
    pub mode: WriteMode,
    /// Whether a preview section was written
    pub preview: bool,
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} samples ({} bytes) to {} [{:?}{}], archive {} bytes",
            self.samples_written,
            self.bytes_written,
            self.data_filename,
            self.mode,
            if self.preview { ", preview" } else { "" },
            self.file_size_bytes
        )
    }
}
