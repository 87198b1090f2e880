use crate::error::ErrorCode;

/// Errors raised by the preview estimators
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreviewError {
    /// An estimator was configured with a zero size
    #[error("Invalid preview configuration: {0}")]
    InvalidConfig(String),

    /// A fed block is not a whole number of multi-channel samples
    #[error("Block of {len} values is not a multiple of {channels} channels")]
    BlockNotMultiple {
        /// Values in the block
        len: usize,
        /// Configured channel count
        channels: usize,
    },

    /// A channel index outside of the configured range
    #[error("Invalid channel number {0}")]
    InvalidChannel(usize),

    /// Min and max traces of different lengths were combined
    #[error("Min trace has {min} points, max trace has {max}")]
    TraceLengthMismatch {
        /// Length of the min trace
        min: usize,
        /// Length of the max trace
        max: usize,
    },
}

impl PreviewError {
    /// Integer code reported at the container boundary
    pub fn code(&self) -> ErrorCode {
        match self {
            PreviewError::TraceLengthMismatch { .. } => ErrorCode::InconsistentInputData,
            _ => ErrorCode::IqPreviewError,
        }
    }
}
