/// Errors raised while mapping file windows
#[derive(Debug, thiserror::Error)]
pub enum MmapError {
    /// I/O error while opening, resizing or mapping the file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The requested window reaches past the end of the file
    #[error("window [{offset}, {offset}+{len}) exceeds file size {file_len}")]
    OutOfBounds {
        /// Requested start offset
        offset: u64,
        /// Requested window length
        len: u64,
        /// Current file length
        file_len: u64,
    },

    /// A writable window was requested on a read-only file
    #[error("file was opened read-only")]
    ReadOnly,
}
